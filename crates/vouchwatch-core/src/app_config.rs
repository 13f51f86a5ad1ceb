use std::path::PathBuf;

/// Runtime knobs read from the process environment.
///
/// Vendor-specific settings (URL, thresholds, credential variable names)
/// live in [`crate::WatchConfig`] instead.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub log_level: String,
    pub wait_timeout_secs: u64,
    pub wait_poll_ms: u64,
    pub pacing_ms: u64,
    pub chrome_path: Option<PathBuf>,
    pub smtp_host: String,
    pub smtp_port: u16,
}
