//! Snapshot store backed by one pretty-printed JSON file per vendor.
//!
//! Layout: `<root>/<key>/promo_codes.json`. Writes go to a temporary file in
//! the same directory and are renamed over the target, so a crash mid-write
//! leaves the previous snapshot intact.

use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use vouchwatch_core::VoucherTable;

use crate::{SnapshotStore, StoreError};

const SNAPSHOT_FILE: &str = "promo_codes.json";

#[derive(Debug, Clone)]
pub struct JsonFileStore {
    root: PathBuf,
}

impl JsonFileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the snapshot file for `key`.
    #[must_use]
    pub fn snapshot_path(&self, key: &str) -> PathBuf {
        self.root.join(key).join(SNAPSHOT_FILE)
    }
}

impl SnapshotStore for JsonFileStore {
    fn load_previous(&self, key: &str) -> Result<Option<VoucherTable>, StoreError> {
        let path = self.snapshot_path(key);
        let raw = match std::fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!(key, path = %path.display(), "no previous snapshot");
                return Ok(None);
            }
            Err(source) => return Err(StoreError::Io { path, source }),
        };

        let table: VoucherTable =
            serde_json::from_str(&raw).map_err(|source| StoreError::Parse {
                path: path.clone(),
                source,
            })?;
        tracing::debug!(key, rows = table.len(), "previous snapshot loaded");
        Ok(Some(table))
    }

    fn save(&self, key: &str, table: &VoucherTable) -> Result<(), StoreError> {
        let path = self.snapshot_path(key);
        let dir = self.root.join(key);
        std::fs::create_dir_all(&dir).map_err(|source| StoreError::Io {
            path: dir.clone(),
            source,
        })?;

        let mut body = serde_json::to_vec_pretty(table).map_err(|source| StoreError::Serialize {
            key: key.to_string(),
            source,
        })?;
        body.push(b'\n');

        let io_err = |source| StoreError::Io {
            path: path.clone(),
            source,
        };
        let mut tmp = NamedTempFile::new_in(&dir).map_err(io_err)?;
        tmp.write_all(&body).map_err(io_err)?;
        tmp.as_file().sync_all().map_err(io_err)?;
        tmp.persist(&path).map_err(|e| io_err(e.error))?;

        tracing::info!(key, rows = table.len(), path = %path.display(), "snapshot saved");
        Ok(())
    }
}

#[cfg(test)]
#[path = "json_file_test.rs"]
mod tests;
