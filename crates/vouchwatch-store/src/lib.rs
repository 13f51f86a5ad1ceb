pub mod json_file;

pub use json_file::JsonFileStore;

use std::path::PathBuf;

use thiserror::Error;
use vouchwatch_core::VoucherTable;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("snapshot io failed at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("snapshot at {path} is corrupt: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to serialize snapshot for {key}: {source}")]
    Serialize {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Per-vendor persistence of the last extracted table.
///
/// A snapshot is always replaced whole; there is no history and no merge.
pub trait SnapshotStore {
    /// The last saved table for `key`, or `None` when nothing has been saved
    /// yet.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if a snapshot exists but cannot be read or
    /// decoded.
    fn load_previous(&self, key: &str) -> Result<Option<VoucherTable>, StoreError>;

    /// Replaces the snapshot for `key`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the table cannot be encoded or written.
    fn save(&self, key: &str, table: &VoucherTable) -> Result<(), StoreError>;
}
