//! Dashboard configuration

use serde::{Deserialize, Serialize};

/// File name of the exported daily in/out detail
pub const EXPORT_FILE_NAME: &str = "每日進出明細.csv";

/// Sheet label of the exported daily in/out detail
pub const EXPORT_SHEET_NAME: &str = "每日進出明細";

/// Timestamp format used for the `time` column of exports
pub const DEFAULT_TIME_FORMAT: &str = "%Y/%m/%d %H:%M:%S";

/// Settings for a dashboard session
///
/// Every field has a default, so partial documents deserialize:
///
/// ```rust
/// use claw_inventory::DashboardConfig;
///
/// let config: DashboardConfig = serde_json::from_str(r#"{"clamp_stock_at_zero": true}"#).unwrap();
/// assert!(config.clamp_stock_at_zero);
/// assert_eq!(config.export_sheet_name, "每日進出明細");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// File name given to log exports
    pub export_file_name: String,
    /// Sheet label given to log exports
    pub export_sheet_name: String,
    /// `chrono` format string for the exported `time` column
    pub time_format: String,
    /// Floor stock at zero instead of letting shipments drive it negative
    pub clamp_stock_at_zero: bool,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            export_file_name: EXPORT_FILE_NAME.to_string(),
            export_sheet_name: EXPORT_SHEET_NAME.to_string(),
            time_format: DEFAULT_TIME_FORMAT.to_string(),
            clamp_stock_at_zero: false,
        }
    }
}
