//! CSV reading and writing

use crate::types::*;
use crate::workbook::{CellValue, Sheet};

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Read CSV bytes into a single sheet, every non-empty cell kept as text
pub fn read_sheet(name: &str, bytes: &[u8]) -> InventoryResult<Sheet> {
    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(bytes);

    let mut cells = Vec::new();
    for record in reader.records() {
        let record = record?;
        cells.push(
            record
                .iter()
                .map(|field| {
                    if field.is_empty() {
                        CellValue::Empty
                    } else {
                        CellValue::Text(field.to_string())
                    }
                })
                .collect(),
        );
    }

    Ok(Sheet::new(name, cells))
}

/// Write a header and records as UTF-8 CSV, prefixed with a BOM so
/// spreadsheet applications pick the right encoding
pub fn write_csv(header: &[&str], records: &[Vec<String>]) -> InventoryResult<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(UTF8_BOM.to_vec());

    writer
        .write_record(header)
        .map_err(|e| InventoryError::Export(e.to_string()))?;
    for record in records {
        writer
            .write_record(record)
            .map_err(|e| InventoryError::Export(e.to_string()))?;
    }

    writer
        .into_inner()
        .map_err(|e| InventoryError::Export(e.to_string()))
}
