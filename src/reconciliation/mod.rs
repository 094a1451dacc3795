//! Reconciliation of uploaded spreadsheet rows against inventory stock
//!
//! A batch of rows comes from either the shipment export (stock leaves the
//! machines) or the exchange/profit sheet (stock comes back). Every row is
//! logged; rows whose product name matches an inventory item also move that
//! item's stock.

use bigdecimal::{BigDecimal, ToPrimitive};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::inventory::{Inventory, TransactionLog};
use crate::types::*;
use crate::workbook::{CellValue, Row, Sheet, Workbook};

/// Column names that may hold the product name, in priority order
pub const NAME_ALIASES: [&str; 3] = ["品名", "品項", "商品"];

/// Quantity columns of a shipment export, in priority order
pub const SHIPMENT_QUANTITY_ALIASES: [&str; 3] = ["出貨數量", "數量", "數量小計"];

/// Quantity columns of an exchange/profit sheet, in priority order
pub const EXCHANGE_QUANTITY_ALIASES: [&str; 3] = ["數量", "回收數量", "夾換數"];

/// Sheet preferred when reading an exchange/profit workbook
pub const EXCHANGE_DATA_SHEET: &str = "資料區";

/// The two kinds of spreadsheet an operator can upload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UploadKind {
    /// Shipment export; quantities leave stock
    Shipment,
    /// Exchange/profit sheet; quantities return to stock
    Exchange,
}

impl UploadKind {
    /// Product-name column aliases
    pub fn name_aliases(&self) -> &'static [&'static str] {
        &NAME_ALIASES
    }

    /// Quantity column aliases
    pub fn quantity_aliases(&self) -> &'static [&'static str] {
        match self {
            UploadKind::Shipment => &SHIPMENT_QUANTITY_ALIASES,
            UploadKind::Exchange => &EXCHANGE_QUANTITY_ALIASES,
        }
    }

    /// Sheet to read in preference to the first one, if any
    pub fn preferred_sheet(&self) -> Option<&'static str> {
        match self {
            UploadKind::Shipment => None,
            UploadKind::Exchange => Some(EXCHANGE_DATA_SHEET),
        }
    }

    /// Tag recorded in the log for rows of this upload
    pub fn log_kind(&self) -> LogKind {
        match self {
            UploadKind::Shipment => LogKind::ShipmentOut,
            UploadKind::Exchange => LogKind::ExchangeIn,
        }
    }

    /// Notification shown once a batch has been applied
    pub fn success_message(&self) -> &'static str {
        match self {
            UploadKind::Shipment => "📤 出貨資料已更新庫存",
            UploadKind::Exchange => "🔁 夾換利潤表已更新庫存",
        }
    }
}

/// Outcome of applying one batch of rows
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconciliationReport {
    pub kind: UploadKind,
    pub applied_at: NaiveDateTime,
    /// Rows read and logged
    pub rows_applied: usize,
    /// Rows that moved an item's stock
    pub rows_matched: usize,
    /// Names with no inventory item, in row order
    pub unmatched: Vec<String>,
}

/// Pick the sheet an upload reads its rows from
pub fn select_sheet(workbook: &Workbook, kind: UploadKind) -> InventoryResult<&Sheet> {
    match kind.preferred_sheet() {
        Some(name) => workbook.sheet_or_first(name),
        None => workbook.first_sheet(),
    }
}

/// First alias holding a truthy value; blank, zero and `false` cells fall
/// through to the next alias
fn first_present<'a>(row: &'a Row, aliases: &[&str]) -> Option<&'a CellValue> {
    aliases
        .iter()
        .filter_map(|alias| row.get(*alias))
        .find(|value| value.is_truthy())
}

/// Product name from the first present alias, or an empty string
pub fn extract_name(row: &Row, aliases: &[&str]) -> String {
    first_present(row, aliases)
        .map(|value| value.as_text())
        .unwrap_or_default()
}

/// Quantity from the first present alias, or zero
pub fn extract_quantity(row: &Row, aliases: &[&str]) -> BigDecimal {
    first_present(row, aliases)
        .map(|value| value.as_quantity())
        .unwrap_or_else(|| BigDecimal::from(0))
}

/// Whole units of `quantity`, truncated toward zero and saturated to `i64`
pub fn whole_units(quantity: &BigDecimal) -> i64 {
    let (mantissa, scale) = quantity.as_bigint_and_exponent();
    let digits = mantissa.to_string();
    let negative = digits.starts_with('-');
    let saturated = if negative { i64::MIN } else { i64::MAX };

    // Rescaling by an exponent taken from the cell would allocate 10^scale.
    let integer_digits = digits.trim_start_matches('-').len() as i64 - scale;
    if digits == "0" || integer_digits <= 0 {
        return 0;
    }
    if integer_digits > 19 {
        return saturated;
    }
    quantity.with_scale(0).to_i64().unwrap_or(saturated)
}

/// Apply a batch of rows to the inventory and append one log entry per row
///
/// All entries share `applied_at`. Stock of the first item whose name equals
/// the row's product name moves by the whole units of the row quantity,
/// saturating at the `i64` bounds; the log keeps the quantity as read.
/// Unmatched rows are only logged. With `clamp_at_zero` set, stock never
/// drops below zero.
pub fn reconcile(
    inventory: &mut Inventory,
    log: &mut TransactionLog,
    rows: &[Row],
    kind: UploadKind,
    applied_at: NaiveDateTime,
    clamp_at_zero: bool,
) -> ReconciliationReport {
    let log_kind = kind.log_kind();
    let mut rows_matched = 0;
    let mut unmatched = Vec::new();

    for row in rows {
        let name = extract_name(row, kind.name_aliases());
        let quantity = extract_quantity(row, kind.quantity_aliases());

        match inventory.find_by_name_mut(&name) {
            Some(item) => {
                let mut stock = item
                    .stock
                    .saturating_add(log_kind.signed(whole_units(&quantity)));
                if stock < 0 {
                    if clamp_at_zero {
                        stock = 0;
                    } else {
                        warn!(
                            item = %item.item,
                            machine = %item.machine,
                            stock,
                            "stock below zero"
                        );
                    }
                }
                item.stock = stock;
                rows_matched += 1;
            }
            None => {
                debug!(item = %name, %quantity, kind = %log_kind, "no inventory item for row");
                unmatched.push(name.clone());
            }
        }

        log.append(LogEntry::new(applied_at, name, log_kind, quantity));
    }

    ReconciliationReport {
        kind,
        applied_at,
        rows_applied: rows.len(),
        rows_matched,
        unmatched,
    }
}
