//! Binary workbook reading (calamine) and xlsx writing (rust_xlsxwriter)

use std::io::Cursor;

use calamine::{open_workbook_auto_from_rs, Data, Reader};
use rust_xlsxwriter::Workbook as XlsxWorkbook;

use crate::types::*;
use crate::workbook::{CellValue, Sheet, Workbook};

/// Decode every sheet of an xlsx/xlsb/xls/ods file
///
/// calamine anchors each range at the first non-empty cell, so leading blank
/// rows and columns are dropped and the first populated row becomes the
/// header row.
pub fn read_workbook(bytes: &[u8]) -> InventoryResult<Workbook> {
    let mut sheets_reader = open_workbook_auto_from_rs(Cursor::new(bytes.to_vec()))?;

    let mut sheets = Vec::new();
    for name in sheets_reader.sheet_names() {
        let range = sheets_reader.worksheet_range(&name)?;
        let cells = range
            .rows()
            .map(|row| row.iter().map(cell_value).collect())
            .collect();
        sheets.push(Sheet::new(name, cells));
    }

    Ok(Workbook::new(sheets))
}

fn cell_value(data: &Data) -> CellValue {
    match data {
        Data::Empty => CellValue::Empty,
        Data::Bool(b) => CellValue::Bool(*b),
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Float(f) => CellValue::Number(*f),
        Data::String(s) => CellValue::Text(s.clone()),
        other => CellValue::Text(other.to_string()),
    }
}

/// Write a header and records to a single-sheet xlsx file
///
/// Each cell keeps its own type: text is never reinterpreted as a number
/// and empty cells are left unwritten.
pub fn write_xlsx(
    sheet_name: &str,
    header: &[&str],
    records: &[Vec<CellValue>],
) -> InventoryResult<Vec<u8>> {
    let mut workbook = XlsxWorkbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(sheet_name)?;

    for (col, title) in header.iter().enumerate() {
        worksheet.write_string(0, col as u16, *title)?;
    }

    for (r, record) in records.iter().enumerate() {
        let row = (r + 1) as u32;
        for (col, value) in record.iter().enumerate() {
            let col = col as u16;
            match value {
                CellValue::Empty => {}
                CellValue::Bool(b) => {
                    worksheet.write_boolean(row, col, *b)?;
                }
                CellValue::Number(n) => {
                    worksheet.write_number(row, col, *n)?;
                }
                CellValue::Text(s) => {
                    worksheet.write_string(row, col, s.as_str())?;
                }
            }
        }
    }

    Ok(workbook.save_to_buffer()?)
}
