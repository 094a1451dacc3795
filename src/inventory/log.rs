//! Daily in/out detail log and its spreadsheet export

use bigdecimal::ToPrimitive;
use serde::{Deserialize, Serialize};

use crate::config::DashboardConfig;
use crate::types::*;
use crate::workbook::{write_csv, write_xlsx, CellValue};

/// Column headers of the exported log
pub const EXPORT_COLUMNS: [&str; 4] = ["time", "item", "type", "quantity"];

/// Append-only record of applied rows; entries leave only by explicit deletion
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TransactionLog {
    entries: Vec<LogEntry>,
}

impl TransactionLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Entries in the order they were applied
    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub(crate) fn append(&mut self, entry: LogEntry) {
        self.entries.push(entry);
    }

    /// Remove the entry at `index`, shifting later entries down
    ///
    /// An out-of-range index is an error and leaves the log untouched.
    pub fn delete(&mut self, index: usize) -> InventoryResult<LogEntry> {
        if index >= self.entries.len() {
            return Err(InventoryError::LogIndexOutOfRange {
                index,
                len: self.entries.len(),
            });
        }
        Ok(self.entries.remove(index))
    }

    /// Serialize the log as a spreadsheet, one row per entry
    pub fn export(
        &self,
        config: &DashboardConfig,
        format: ExportFormat,
    ) -> InventoryResult<LogExport> {
        let (file_name, bytes) = match format {
            ExportFormat::Csv => {
                let records: Vec<Vec<String>> = self
                    .entries
                    .iter()
                    .map(|entry| {
                        vec![
                            entry.time.format(&config.time_format).to_string(),
                            entry.item.clone(),
                            entry.kind.tag().to_string(),
                            entry.quantity.to_string(),
                        ]
                    })
                    .collect();
                (
                    config.export_file_name.clone(),
                    write_csv(&EXPORT_COLUMNS, &records)?,
                )
            }
            ExportFormat::Xlsx => {
                let records: Vec<Vec<CellValue>> = self
                    .entries
                    .iter()
                    .map(|entry| {
                        vec![
                            CellValue::Text(entry.time.format(&config.time_format).to_string()),
                            CellValue::Text(entry.item.clone()),
                            CellValue::Text(entry.kind.tag().to_string()),
                            quantity_cell(&entry.quantity),
                        ]
                    })
                    .collect();
                (
                    with_extension(&config.export_file_name, "xlsx"),
                    write_xlsx(&config.export_sheet_name, &EXPORT_COLUMNS, &records)?,
                )
            }
        };

        Ok(LogExport {
            file_name,
            sheet_name: config.export_sheet_name.clone(),
            format,
            bytes,
        })
    }
}

// Quantities beyond f64 range keep their exact text instead of becoming inf.
fn quantity_cell(quantity: &bigdecimal::BigDecimal) -> CellValue {
    match quantity.to_f64() {
        Some(n) if n.is_finite() => CellValue::Number(n),
        _ => CellValue::Text(quantity.to_string()),
    }
}

fn with_extension(file_name: &str, extension: &str) -> String {
    let stem = file_name
        .rsplit_once('.')
        .map_or(file_name, |(stem, _)| stem);
    format!("{}.{}", stem, extension)
}

/// Spreadsheet flavour of a log export
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ExportFormat {
    #[default]
    Csv,
    Xlsx,
}

/// A serialized log ready to be written out under `file_name`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogExport {
    pub file_name: String,
    pub sheet_name: String,
    pub format: ExportFormat,
    pub bytes: Vec<u8>,
}

impl LogExport {
    /// Write the export into `dir` under its file name
    pub fn write_to(&self, dir: &std::path::Path) -> InventoryResult<std::path::PathBuf> {
        let path = dir.join(&self.file_name);
        std::fs::write(&path, &self.bytes)?;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bigdecimal::BigDecimal;
    use chrono::NaiveDate;
    use std::str::FromStr;

    use crate::workbook::Workbook;

    fn entry(item: &str, kind: LogKind, quantity: i64) -> LogEntry {
        let time = NaiveDate::from_ymd_opt(2024, 6, 1)
            .unwrap()
            .and_hms_opt(14, 5, 9)
            .unwrap();
        LogEntry::new(time, item.to_string(), kind, BigDecimal::from(quantity))
    }

    fn sample_log() -> TransactionLog {
        let mut log = TransactionLog::new();
        log.append(entry("甲", LogKind::ShipmentOut, 1));
        log.append(entry("乙", LogKind::ExchangeIn, 2));
        log.append(entry("丙", LogKind::ShipmentOut, 3));
        log
    }

    #[test]
    fn test_delete_preserves_order() {
        let mut log = sample_log();

        let removed = log.delete(1).unwrap();
        assert_eq!(removed.item, "乙");

        let names: Vec<&str> = log.entries().iter().map(|e| e.item.as_str()).collect();
        assert_eq!(names, vec!["甲", "丙"]);
    }

    #[test]
    fn test_delete_out_of_range_leaves_log_unchanged() {
        let mut log = sample_log();
        let before = log.clone();

        let result = log.delete(3);
        assert!(matches!(
            result,
            Err(InventoryError::LogIndexOutOfRange { index: 3, len: 3 })
        ));
        assert_eq!(log, before);
    }

    #[test]
    fn test_csv_export() {
        let export = sample_log()
            .export(&DashboardConfig::default(), ExportFormat::Csv)
            .unwrap();

        assert_eq!(export.file_name, "每日進出明細.csv");
        assert_eq!(export.sheet_name, "每日進出明細");

        let text = String::from_utf8(export.bytes).unwrap();
        let mut lines = text.trim_start_matches('\u{feff}').lines();
        assert_eq!(lines.next(), Some("time,item,type,quantity"));
        assert_eq!(lines.next(), Some("2024/06/01 14:05:09,甲,出貨,1"));
        assert_eq!(lines.next(), Some("2024/06/01 14:05:09,乙,夾換,2"));
        assert_eq!(lines.count(), 1);
    }

    #[test]
    fn test_empty_log_exports_header_only() {
        let export = TransactionLog::new()
            .export(&DashboardConfig::default(), ExportFormat::Csv)
            .unwrap();
        let text = String::from_utf8(export.bytes).unwrap();
        assert_eq!(text.trim_start_matches('\u{feff}'), "time,item,type,quantity\n");
    }

    #[test]
    fn test_xlsx_export_names() {
        let export = sample_log()
            .export(&DashboardConfig::default(), ExportFormat::Xlsx)
            .unwrap();

        assert_eq!(export.file_name, "每日進出明細.xlsx");
        assert!(export.bytes.starts_with(b"PK"));
    }

    #[test]
    fn test_xlsx_export_keeps_item_text_and_fractional_quantity() {
        let mut log = sample_log();
        let mut fractional = entry("001", LogKind::ExchangeIn, 0);
        fractional.quantity = BigDecimal::from_str("2.5").unwrap();
        log.append(fractional);

        let export = log
            .export(&DashboardConfig::default(), ExportFormat::Xlsx)
            .unwrap();
        let rows = Workbook::decode(&export.bytes)
            .unwrap()
            .first_sheet()
            .unwrap()
            .rows();

        assert_eq!(rows.len(), 4);
        assert_eq!(rows[0]["time"].as_text(), "2024/06/01 14:05:09");
        assert_eq!(rows[3]["item"], CellValue::Text("001".to_string()));
        assert_eq!(rows[3]["quantity"], CellValue::Number(2.5));
    }

    #[test]
    fn test_csv_export_keeps_fractional_quantity() {
        let mut log = TransactionLog::new();
        let mut fractional = entry("甲", LogKind::ShipmentOut, 0);
        fractional.quantity = BigDecimal::from_str("2.5").unwrap();
        log.append(fractional);

        let export = log.export(&DashboardConfig::default(), ExportFormat::Csv).unwrap();
        let text = String::from_utf8(export.bytes).unwrap();
        assert!(text.ends_with("2024/06/01 14:05:09,甲,出貨,2.5\n"));
    }

    #[test]
    fn test_with_extension() {
        assert_eq!(with_extension("log.csv", "xlsx"), "log.xlsx");
        assert_eq!(with_extension("log", "xlsx"), "log.xlsx");
    }
}
