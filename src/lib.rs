//! # Claw Inventory
//!
//! Inventory core for a small fleet of claw-machine kiosks: current stock per
//! machine and product, spreadsheet uploads that move stock, and a daily
//! in/out log that exports back to a spreadsheet.
//!
//! ## Features
//!
//! - **Inventory**: ordered item list with search and valuation summaries
//! - **Reconciliation**: shipment exports and exchange/profit sheets adjust stock
//! - **Transaction log**: one entry per uploaded row, deletable, exportable as CSV or xlsx
//! - **Codec boundary**: xlsx/xls/ods via calamine, CSV via the csv crate
//! - **Session orchestration**: a [`Dashboard`] owning all state, no globals
//!
//! ## Quick Start
//!
//! ```rust
//! use claw_inventory::{Dashboard, UploadKind, Workbook};
//!
//! let mut dashboard = Dashboard::default();
//! let workbook = Workbook::decode("品名,出貨數量\n鯊魚手偶,5\n".as_bytes()).unwrap();
//! let receipt = dashboard.apply_workbook(UploadKind::Shipment, &workbook).unwrap();
//!
//! assert_eq!(receipt.message, "📤 出貨資料已更新庫存");
//! assert_eq!(dashboard.inventory().find_by_name("鯊魚手偶").unwrap().stock, 7);
//! ```

pub mod config;
pub mod inventory;
pub mod reconciliation;
pub mod traits;
pub mod types;
pub mod utils;
pub mod workbook;

// Re-export commonly used types
pub use config::*;
pub use inventory::*;
pub use reconciliation::*;
pub use traits::*;
pub use types::*;
pub use workbook::{CellValue, Row, Sheet, Workbook};
