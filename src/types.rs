//! Core types and data structures for the inventory dashboard

use bigdecimal::BigDecimal;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// A stocked product sitting in one kiosk machine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryItem {
    /// Unique identifier, stable for the item's lifetime
    pub id: u32,
    /// Short code of the physical machine (e.g. "A01")
    pub machine: String,
    /// Display name of the product; the join key against spreadsheet rows
    pub item: String,
    /// Unit cost
    pub cost: BigDecimal,
    /// Quantity on hand. Over-shipping drives this negative.
    pub stock: i64,
}

impl InventoryItem {
    /// Create a new inventory item
    pub fn new(id: u32, machine: &str, item: &str, cost: BigDecimal, stock: i64) -> Self {
        Self {
            id,
            machine: machine.to_string(),
            item: item.to_string(),
            cost,
            stock,
        }
    }

    /// Value of the units on hand at unit cost
    pub fn stock_value(&self) -> BigDecimal {
        &self.cost * BigDecimal::from(self.stock)
    }

    /// Whether the machine code or the product name contains `query`
    pub fn matches(&self, query: &str) -> bool {
        self.machine.contains(query) || self.item.contains(query)
    }
}

/// Direction of a logged stock movement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LogKind {
    /// Goods shipped out of the machines ("出貨")
    #[serde(rename = "出貨")]
    ShipmentOut,
    /// Goods coming back through the exchange/profit sheet ("夾換")
    #[serde(rename = "夾換")]
    ExchangeIn,
}

impl LogKind {
    /// The tag written to the log and the exported sheet
    pub fn tag(&self) -> &'static str {
        match self {
            LogKind::ShipmentOut => "出貨",
            LogKind::ExchangeIn => "夾換",
        }
    }

    /// Signed stock change for `units` moving in this direction, saturating
    /// at the `i64` bounds
    pub fn signed(&self, units: i64) -> i64 {
        match self {
            LogKind::ShipmentOut => units.saturating_neg(),
            LogKind::ExchangeIn => units,
        }
    }
}

impl std::fmt::Display for LogKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.tag())
    }
}

/// One line of the daily in/out detail
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    /// When the batch containing this row was applied
    pub time: NaiveDateTime,
    /// Product name exactly as read from the sheet
    pub item: String,
    #[serde(rename = "type")]
    pub kind: LogKind,
    /// Quantity as read, fractions included
    pub quantity: BigDecimal,
}

impl LogEntry {
    /// Create a new log entry
    pub fn new(time: NaiveDateTime, item: String, kind: LogKind, quantity: BigDecimal) -> Self {
        Self {
            time,
            item,
            kind,
            quantity,
        }
    }
}

/// Errors that can occur in the inventory system
#[derive(Debug, thiserror::Error)]
pub enum InventoryError {
    #[error("Spreadsheet codec error: {0}")]
    Codec(String),
    #[error("Workbook contains no sheets")]
    EmptyWorkbook,
    #[error("Log index {index} out of range (log has {len} entries)")]
    LogIndexOutOfRange { index: usize, len: usize },
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Export error: {0}")]
    Export(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<csv::Error> for InventoryError {
    fn from(err: csv::Error) -> Self {
        InventoryError::Codec(err.to_string())
    }
}

impl From<calamine::Error> for InventoryError {
    fn from(err: calamine::Error) -> Self {
        InventoryError::Codec(err.to_string())
    }
}

impl From<rust_xlsxwriter::XlsxError> for InventoryError {
    fn from(err: rust_xlsxwriter::XlsxError) -> Self {
        InventoryError::Export(err.to_string())
    }
}

/// Result type for inventory operations
pub type InventoryResult<T> = Result<T, InventoryError>;
