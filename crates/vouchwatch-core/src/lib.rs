pub mod app_config;
pub mod config;
pub mod novelty;
pub mod voucher;
pub mod watch;

pub use app_config::AppConfig;
pub use config::{load_app_config, load_app_config_from_env};
pub use novelty::{novel_indices, select_new_codes};
pub use voucher::{parse_discount, snapshot_key, VoucherRecord, VoucherTable};
pub use watch::{load_watch_config, WatchConfig};

use thiserror::Error;

/// Data-integrity failures in voucher values.
///
/// These surface regressions in extraction (a selector now matching the
/// wrong element, a changed text template) and are never defaulted away.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum VoucherError {
    #[error("malformed discount {value:?}: {reason}")]
    MalformedDiscount { value: String, reason: String },

    #[error("column `{field}` has {found} values, expected {expected}")]
    ColumnMismatch {
        field: &'static str,
        expected: usize,
        found: usize,
    },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read config file {path}: {source}")]
    ConfigFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {reason}")]
    ConfigFileParse { path: String, reason: String },

    #[error("config validation failed: {0}")]
    Validation(String),
}
