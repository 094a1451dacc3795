//! Spreadsheet codec boundary
//!
//! Uploaded files arrive as raw bytes and leave this module as a [`Workbook`]
//! of named sheets. Each sheet converts to a sequence of [`Row`] mappings keyed
//! by the text of its header row, which is all the reconciliation step sees.
//!
//! Binary workbooks (xlsx, xlsb, ods, legacy xls) are read with `calamine`;
//! anything else is treated as UTF-8 CSV and read with the `csv` crate.
//! Writing goes the other way through `csv` and `rust_xlsxwriter`.

pub mod delimited;
pub mod excel;

use std::collections::HashMap;
use std::str::FromStr;

use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};

use crate::types::*;

pub use delimited::write_csv;
pub use excel::write_xlsx;

/// Sheet name given to CSV input, which has no sheet names of its own
pub const CSV_SHEET_NAME: &str = "Sheet1";

/// Header used for header cells that are blank
const EMPTY_HEADER: &str = "__EMPTY";

const ZIP_MAGIC: &[u8] = b"PK\x03\x04";
const OLE_MAGIC: &[u8] = &[0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1];

/// A single decoded cell
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub enum CellValue {
    #[default]
    Empty,
    Bool(bool),
    Number(f64),
    Text(String),
}

impl CellValue {
    /// Whether the cell carries no value at all
    pub fn is_empty(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(s) => s.is_empty(),
            _ => false,
        }
    }

    /// Whether the cell would satisfy a `value || fallback` lookup
    ///
    /// Blank text, `false`, zero and NaN all defer to the next column alias.
    /// Numeric text counts by its value, since CSV cells arrive as text.
    pub fn is_truthy(&self) -> bool {
        match self {
            CellValue::Empty => false,
            CellValue::Bool(b) => *b,
            CellValue::Number(n) => *n != 0.0 && !n.is_nan(),
            CellValue::Text(s) => match s.trim().parse::<f64>() {
                Ok(n) => n != 0.0 && !n.is_nan(),
                Err(_) => !s.is_empty(),
            },
        }
    }

    /// Render the cell as text, the way a header or product name is read
    pub fn as_text(&self) -> String {
        match self {
            CellValue::Empty => String::new(),
            CellValue::Bool(b) => b.to_string(),
            CellValue::Number(n) => format_number(*n),
            CellValue::Text(s) => s.clone(),
        }
    }

    /// Coerce the cell to a quantity without losing fractions or magnitude
    ///
    /// Text is trimmed and parsed; booleans count as 1 or 0. Anything that is
    /// not a finite number becomes 0.
    pub fn as_quantity(&self) -> BigDecimal {
        let parsed = match self {
            CellValue::Empty => None,
            CellValue::Bool(b) => Some(BigDecimal::from(u8::from(*b))),
            CellValue::Number(n) if n.is_finite() => BigDecimal::from_str(&n.to_string()).ok(),
            CellValue::Number(_) => None,
            CellValue::Text(s) => BigDecimal::from_str(s.trim()).ok(),
        };
        parsed.unwrap_or_else(|| BigDecimal::from(0))
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Number(value)
    }
}

impl From<i64> for CellValue {
    fn from(value: i64) -> Self {
        CellValue::Number(value as f64)
    }
}

fn format_number(n: f64) -> String {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

/// One spreadsheet row keyed by header text. Empty cells are absent.
pub type Row = HashMap<String, CellValue>;

/// A named grid of cells, first row being the header
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Sheet {
    pub name: String,
    pub cells: Vec<Vec<CellValue>>,
}

impl Sheet {
    /// Create a sheet from a grid of cells
    pub fn new(name: impl Into<String>, cells: Vec<Vec<CellValue>>) -> Self {
        Self {
            name: name.into(),
            cells,
        }
    }

    /// Header names after blank and duplicate headers have been disambiguated
    pub fn headers(&self) -> Vec<String> {
        let Some(header_row) = self.cells.first() else {
            return Vec::new();
        };

        let mut seen: HashMap<String, usize> = HashMap::new();
        header_row
            .iter()
            .map(|cell| {
                let base = if cell.is_empty() {
                    EMPTY_HEADER.to_string()
                } else {
                    cell.as_text()
                };
                let count = seen.entry(base.clone()).or_insert(0);
                let name = if *count == 0 {
                    base
                } else {
                    format!("{}_{}", base, count)
                };
                *count += 1;
                name
            })
            .collect()
    }

    /// Convert the data rows into header-keyed mappings
    ///
    /// Rows with no non-empty cell are skipped, as are cells beyond the
    /// header's width.
    pub fn rows(&self) -> Vec<Row> {
        let headers = self.headers();
        self.cells
            .iter()
            .skip(1)
            .filter_map(|cells| {
                let row: Row = headers
                    .iter()
                    .zip(cells.iter())
                    .filter(|(_, cell)| !cell.is_empty())
                    .map(|(header, cell)| (header.clone(), cell.clone()))
                    .collect();
                (!row.is_empty()).then_some(row)
            })
            .collect()
    }
}

/// A decoded spreadsheet file
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Workbook {
    pub sheets: Vec<Sheet>,
}

impl Workbook {
    /// Create a workbook from sheets in display order
    pub fn new(sheets: Vec<Sheet>) -> Self {
        Self { sheets }
    }

    /// Decode raw file bytes, sniffing binary workbooks from CSV text
    ///
    /// Fails without side effects when the bytes cannot be decoded.
    pub fn decode(bytes: &[u8]) -> InventoryResult<Self> {
        let workbook = if bytes.starts_with(ZIP_MAGIC) || bytes.starts_with(OLE_MAGIC) {
            excel::read_workbook(bytes)?
        } else {
            Workbook::new(vec![delimited::read_sheet(CSV_SHEET_NAME, bytes)?])
        };

        if workbook.sheets.is_empty() {
            return Err(InventoryError::EmptyWorkbook);
        }
        Ok(workbook)
    }

    /// Sheet names in workbook order
    pub fn sheet_names(&self) -> Vec<&str> {
        self.sheets.iter().map(|s| s.name.as_str()).collect()
    }

    /// Look up a sheet by exact name
    pub fn sheet(&self, name: &str) -> Option<&Sheet> {
        self.sheets.iter().find(|s| s.name == name)
    }

    /// The first sheet in workbook order
    pub fn first_sheet(&self) -> InventoryResult<&Sheet> {
        self.sheets.first().ok_or(InventoryError::EmptyWorkbook)
    }

    /// The named sheet if present, else the first sheet
    pub fn sheet_or_first(&self, name: &str) -> InventoryResult<&Sheet> {
        match self.sheet(name) {
            Some(sheet) => Ok(sheet),
            None => self.first_sheet(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> CellValue {
        CellValue::from(s)
    }

    #[test]
    fn test_quantity_coercion() {
        let qty = |n: i64| BigDecimal::from(n);
        assert_eq!(CellValue::Number(5.0).as_quantity(), qty(5));
        assert_eq!(text(" 12 ").as_quantity(), qty(12));
        assert_eq!(text("-2").as_quantity(), qty(-2));
        assert_eq!(text("abc").as_quantity(), qty(0));
        assert_eq!(text("").as_quantity(), qty(0));
        assert_eq!(CellValue::Bool(true).as_quantity(), qty(1));
        assert_eq!(CellValue::Number(f64::NAN).as_quantity(), qty(0));
        assert_eq!(CellValue::Number(f64::INFINITY).as_quantity(), qty(0));
        assert_eq!(CellValue::Empty.as_quantity(), qty(0));
    }

    #[test]
    fn test_quantity_keeps_fractions_and_magnitude() {
        assert_eq!(text("3.9").as_quantity(), BigDecimal::from_str("3.9").unwrap());
        assert_eq!(
            CellValue::Number(2.5).as_quantity(),
            BigDecimal::from_str("2.5").unwrap()
        );
        assert_eq!(
            text("1e30").as_quantity(),
            BigDecimal::from_str("1000000000000000000000000000000").unwrap()
        );
    }

    #[test]
    fn test_truthiness_matches_fallback_lookup() {
        assert!(!CellValue::Number(0.0).is_truthy());
        assert!(!CellValue::Bool(false).is_truthy());
        assert!(!text("").is_truthy());
        assert!(!CellValue::Number(f64::NAN).is_truthy());
        assert!(!text("0").is_truthy());
        assert!(!text(" 0.0 ").is_truthy());
        assert!(text("5").is_truthy());
        assert!(text("鯊魚手偶").is_truthy());
        assert!(CellValue::Number(-1.0).is_truthy());
    }

    #[test]
    fn test_number_renders_without_trailing_zero() {
        assert_eq!(CellValue::Number(40.0).as_text(), "40");
        assert_eq!(CellValue::Number(2.5).as_text(), "2.5");
    }

    #[test]
    fn test_sheet_rows_skip_blank_cells_and_rows() {
        let sheet = Sheet::new(
            "Sheet1",
            vec![
                vec![text("品名"), text("數量")],
                vec![text("鯊魚手偶"), CellValue::Number(3.0)],
                vec![CellValue::Empty, text("")],
                vec![text("滿天星洋芋片"), CellValue::Empty],
            ],
        );

        let rows = sheet.rows();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["品名"], text("鯊魚手偶"));
        assert_eq!(rows[0]["數量"], CellValue::Number(3.0));
        assert!(!rows[1].contains_key("數量"));
    }

    #[test]
    fn test_headers_disambiguate_blanks_and_duplicates() {
        let sheet = Sheet::new(
            "Sheet1",
            vec![vec![
                text("數量"),
                CellValue::Empty,
                text("數量"),
                CellValue::Empty,
            ]],
        );

        assert_eq!(
            sheet.headers(),
            vec!["數量", "__EMPTY", "數量_1", "__EMPTY_1"]
        );
        assert!(sheet.rows().is_empty());
    }

    #[test]
    fn test_sheet_or_first() {
        let workbook = Workbook::new(vec![
            Sheet::new("總表", vec![]),
            Sheet::new("資料區", vec![]),
        ]);

        assert_eq!(workbook.sheet_or_first("資料區").unwrap().name, "資料區");
        assert_eq!(workbook.sheet_or_first("不存在").unwrap().name, "總表");
        assert_eq!(workbook.sheet_names(), vec!["總表", "資料區"]);
    }

    #[test]
    fn test_empty_workbook_has_no_first_sheet() {
        let workbook = Workbook::default();
        assert!(matches!(
            workbook.first_sheet(),
            Err(InventoryError::EmptyWorkbook)
        ));
    }

    #[test]
    fn test_decode_csv_text() {
        let bytes = "\u{feff}品名,出貨數量\n鯊魚手偶,5\n".as_bytes();
        let workbook = Workbook::decode(bytes).unwrap();

        assert_eq!(workbook.sheet_names(), vec![CSV_SHEET_NAME]);
        let rows = workbook.first_sheet().unwrap().rows();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["品名"], text("鯊魚手偶"));
        assert_eq!(rows[0]["出貨數量"].as_quantity(), BigDecimal::from(5));
    }

    #[test]
    fn test_decode_rejects_truncated_zip() {
        let result = Workbook::decode(b"PK\x03\x04not really a workbook");
        assert!(matches!(result, Err(InventoryError::Codec(_))));
    }
}
