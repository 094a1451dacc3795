//! Dashboard session that orchestrates uploads, search, and the log

use std::collections::HashMap;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use crate::config::DashboardConfig;
use crate::inventory::{ExportFormat, Inventory, LogExport, TransactionLog};
use crate::reconciliation::{reconcile, select_sheet, ReconciliationReport, UploadKind};
use crate::traits::*;
use crate::types::*;
use crate::workbook::{Row, Workbook};

/// State of one operator session: stock, log, search text and file picks
pub struct Dashboard {
    config: DashboardConfig,
    clock: Box<dyn Clock>,
    inventory: Inventory,
    log: TransactionLog,
    search: String,
    selections: HashMap<UploadKind, Box<dyn FileSource>>,
}

impl Default for Dashboard {
    fn default() -> Self {
        Self::new(Inventory::sample())
    }
}

impl Dashboard {
    /// Create a dashboard over the given inventory with default settings
    pub fn new(inventory: Inventory) -> Self {
        Self::with_config(inventory, DashboardConfig::default(), Box::new(LocalClock))
    }

    /// Create a dashboard with custom settings and clock
    pub fn with_config(
        inventory: Inventory,
        config: DashboardConfig,
        clock: Box<dyn Clock>,
    ) -> Self {
        Self {
            config,
            clock,
            inventory,
            log: TransactionLog::new(),
            search: String::new(),
            selections: HashMap::new(),
        }
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    pub fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    pub fn log(&self) -> &TransactionLog {
        &self.log
    }

    /// Replace the inventory list wholesale
    pub fn replace_inventory(&mut self, items: Vec<InventoryItem>) -> InventoryResult<()> {
        self.inventory.replace(items)
    }

    // Search
    /// Set the search text used by [`Dashboard::filtered`]
    pub fn set_search(&mut self, query: impl Into<String>) {
        self.search = query.into();
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    /// Items matching the current search text
    pub fn filtered(&self) -> Vec<&InventoryItem> {
        self.inventory.search(&self.search)
    }

    // File selection
    /// Remember the file to read on the next upload of `kind`
    pub fn select_file(&mut self, kind: UploadKind, source: Box<dyn FileSource>) {
        debug!(?kind, file = source.name(), "file selected");
        self.selections.insert(kind, source);
    }

    /// Forget the selected file for `kind`
    pub fn clear_selection(&mut self, kind: UploadKind) {
        self.selections.remove(&kind);
    }

    /// Name of the file currently selected for `kind`
    pub fn selected_file(&self, kind: UploadKind) -> Option<&str> {
        self.selections.get(&kind).map(|source| source.name())
    }

    // Uploads
    /// Load the selected file for `kind` and apply its rows
    ///
    /// Nothing changes when no file is selected or it cannot be read. Decode
    /// failures are returned before any row is applied.
    pub async fn upload(&mut self, kind: UploadKind) -> InventoryResult<UploadOutcome> {
        let bytes = {
            let Some(source) = self.selections.get(&kind) else {
                debug!(?kind, "upload without a selected file");
                return Ok(UploadOutcome::Skipped(SkipReason::NoFileSelected));
            };
            match source.load().await? {
                Some(bytes) if !bytes.is_empty() => bytes,
                Some(_) => {
                    debug!(?kind, file = source.name(), "selected file is empty");
                    return Ok(UploadOutcome::Skipped(SkipReason::EmptyFile));
                }
                None => {
                    debug!(?kind, file = source.name(), "selected file is unreadable");
                    return Ok(UploadOutcome::Skipped(SkipReason::Unreadable));
                }
            }
        };

        let workbook = Workbook::decode(&bytes)?;
        self.apply_workbook(kind, &workbook)
            .map(UploadOutcome::Applied)
    }

    /// Apply the rows of an already decoded workbook
    pub fn apply_workbook(
        &mut self,
        kind: UploadKind,
        workbook: &Workbook,
    ) -> InventoryResult<UploadReceipt> {
        let sheet = select_sheet(workbook, kind)?;
        debug!(?kind, sheet = %sheet.name, "reading sheet");
        Ok(self.apply_rows(kind, &sheet.rows()))
    }

    /// Apply a batch of header-keyed rows
    pub fn apply_rows(&mut self, kind: UploadKind, rows: &[Row]) -> UploadReceipt {
        let applied_at = self.clock.now();
        let report = reconcile(
            &mut self.inventory,
            &mut self.log,
            rows,
            kind,
            applied_at,
            self.config.clamp_stock_at_zero,
        );

        let receipt = UploadReceipt::new(report);
        info!(
            batch = %receipt.batch_id,
            ?kind,
            rows = receipt.rows_applied(),
            matched = receipt.rows_matched(),
            "{}",
            receipt.message
        );
        receipt
    }

    // Log
    /// Delete the log entry at `index`
    pub fn delete_log(&mut self, index: usize) -> InventoryResult<LogEntry> {
        let removed = self.log.delete(index)?;
        debug!(index, item = %removed.item, "log entry deleted");
        Ok(removed)
    }

    /// Serialize the log for download
    pub fn export_log(&self, format: ExportFormat) -> InventoryResult<LogExport> {
        self.log.export(&self.config, format)
    }
}

/// Why an upload did nothing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SkipReason {
    NoFileSelected,
    Unreadable,
    EmptyFile,
}

/// Result of an upload request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum UploadOutcome {
    Skipped(SkipReason),
    Applied(UploadReceipt),
}

impl UploadOutcome {
    /// The receipt, if the upload was applied
    pub fn receipt(&self) -> Option<&UploadReceipt> {
        match self {
            UploadOutcome::Applied(receipt) => Some(receipt),
            UploadOutcome::Skipped(_) => None,
        }
    }
}

/// Confirmation of an applied batch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadReceipt {
    pub batch_id: Uuid,
    /// Operator-facing success message for the upload kind
    pub message: String,
    pub report: ReconciliationReport,
}

impl UploadReceipt {
    fn new(report: ReconciliationReport) -> Self {
        Self {
            batch_id: Uuid::new_v4(),
            message: report.kind.success_message().to_string(),
            report,
        }
    }

    pub fn kind(&self) -> UploadKind {
        self.report.kind
    }

    pub fn applied_at(&self) -> NaiveDateTime {
        self.report.applied_at
    }

    pub fn rows_applied(&self) -> usize {
        self.report.rows_applied
    }

    pub fn rows_matched(&self) -> usize {
        self.report.rows_matched
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::MemorySource;
    use chrono::NaiveDate;

    fn fixed_dashboard() -> Dashboard {
        let at = NaiveDate::from_ymd_opt(2024, 6, 1)
            .unwrap()
            .and_hms_opt(8, 0, 0)
            .unwrap();
        Dashboard::with_config(
            Inventory::sample(),
            DashboardConfig::default(),
            Box::new(FixedClock(at)),
        )
    }

    #[tokio::test]
    async fn test_upload_without_selection_is_noop() {
        let mut dashboard = fixed_dashboard();

        let outcome = dashboard.upload(UploadKind::Shipment).await.unwrap();
        assert_eq!(outcome, UploadOutcome::Skipped(SkipReason::NoFileSelected));
        assert!(dashboard.log().is_empty());
        assert_eq!(dashboard.inventory(), &Inventory::sample());
    }

    #[tokio::test]
    async fn test_upload_empty_file_is_noop() {
        let mut dashboard = fixed_dashboard();
        dashboard.select_file(
            UploadKind::Exchange,
            Box::new(MemorySource::new("empty.csv", Vec::new())),
        );

        let outcome = dashboard.upload(UploadKind::Exchange).await.unwrap();
        assert_eq!(outcome, UploadOutcome::Skipped(SkipReason::EmptyFile));
        assert!(dashboard.log().is_empty());
    }

    #[tokio::test]
    async fn test_csv_shipment_upload() {
        let mut dashboard = fixed_dashboard();
        let csv = "品名,出貨數量\n鯊魚手偶,5\n不存在的商品,2\n";
        dashboard.select_file(
            UploadKind::Shipment,
            Box::new(MemorySource::new("shipment.csv", csv.as_bytes().to_vec())),
        );
        assert_eq!(dashboard.selected_file(UploadKind::Shipment), Some("shipment.csv"));

        let outcome = dashboard.upload(UploadKind::Shipment).await.unwrap();
        let receipt = outcome.receipt().unwrap();

        assert_eq!(receipt.message, "📤 出貨資料已更新庫存");
        assert_eq!(receipt.rows_applied(), 2);
        assert_eq!(receipt.rows_matched(), 1);
        assert_eq!(dashboard.inventory().find_by_name("鯊魚手偶").unwrap().stock, 7);
        assert_eq!(dashboard.log().len(), 2);
        assert!(dashboard
            .log()
            .entries()
            .iter()
            .all(|e| e.time == receipt.applied_at()));
    }

    #[test]
    fn test_filtered_follows_search_text() {
        let mut dashboard = fixed_dashboard();
        assert_eq!(dashboard.filtered().len(), 4);

        dashboard.set_search("C03");
        let hits = dashboard.filtered();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].item, "夾子園聯名奶茶");
    }

    #[test]
    fn test_clear_selection() {
        let mut dashboard = fixed_dashboard();
        dashboard.select_file(
            UploadKind::Shipment,
            Box::new(MemorySource::new("a.csv", b"x".to_vec())),
        );
        dashboard.clear_selection(UploadKind::Shipment);
        assert_eq!(dashboard.selected_file(UploadKind::Shipment), None);
    }
}
