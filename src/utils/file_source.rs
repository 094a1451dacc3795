//! File sources for uploads

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::traits::*;
use crate::types::*;

/// A spreadsheet file on the local filesystem
#[derive(Debug, Clone)]
pub struct PathSource {
    path: PathBuf,
    name: String,
}

impl PathSource {
    /// Create a source for the file at `path`
    pub fn new(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Self { path, name }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl FileSource for PathSource {
    fn name(&self) -> &str {
        &self.name
    }

    /// Reads the whole file with a synchronous `std::fs::read`.
    ///
    /// The read blocks the calling task. Kiosk uploads are small files; callers
    /// loading large files on a shared async executor should wrap the upload in
    /// their runtime's blocking-task facility.
    async fn load(&self) -> InventoryResult<Option<Vec<u8>>> {
        match std::fs::read(&self.path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(err) => {
                debug!(path = %self.path.display(), error = %err, "cannot read file");
                Ok(None)
            }
        }
    }
}

/// File contents already held in memory, e.g. received from a browser upload
#[derive(Debug, Clone)]
pub struct MemorySource {
    name: String,
    bytes: Vec<u8>,
}

impl MemorySource {
    /// Create a source over `bytes`
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }
}

#[async_trait]
impl FileSource for MemorySource {
    fn name(&self) -> &str {
        &self.name
    }

    async fn load(&self) -> InventoryResult<Option<Vec<u8>>> {
        Ok(Some(self.bytes.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_path_loads_nothing() {
        let source = PathSource::new("/nonexistent/出貨.xlsx");
        assert_eq!(source.name(), "出貨.xlsx");
        assert_eq!(source.load().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_path_source_reads_file() {
        let path = std::env::temp_dir()
            .join(format!("claw-inventory-{}.csv", uuid::Uuid::new_v4()));
        std::fs::write(&path, "品名,數量\n").unwrap();

        let loaded = PathSource::new(&path).load().await.unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(loaded, Some("品名,數量\n".as_bytes().to_vec()));
    }
}
