//! Traits for file loading and time abstraction

use async_trait::async_trait;
use chrono::NaiveDateTime;

use crate::types::*;

/// Source of the raw bytes behind a selected spreadsheet file
///
/// Loading is the only suspending step of an upload: the dashboard awaits
/// `load` once and then applies the decoded rows synchronously. Returning
/// `Ok(None)` means the file could not be read (or was never there) and the
/// upload becomes a no-op.
#[async_trait]
pub trait FileSource: Send + Sync {
    /// Display name of the file, used in logs
    fn name(&self) -> &str;

    /// Load the full file contents
    async fn load(&self) -> InventoryResult<Option<Vec<u8>>>;
}

/// Wall-clock used to stamp applied batches
pub trait Clock: Send + Sync {
    /// Current local time
    fn now(&self) -> NaiveDateTime;
}

/// Clock backed by the system's local time zone
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalClock;

impl Clock for LocalClock {
    fn now(&self) -> NaiveDateTime {
        chrono::Local::now().naive_local()
    }
}

/// Clock frozen at a fixed instant
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDateTime);

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}
