use thiserror::Error;
use vouchwatch_core::VoucherError;

/// Failures reported by an automation backend.
#[derive(Debug, Error)]
pub enum DriverError {
    #[cfg(feature = "chromium")]
    #[error("browser protocol error: {0}")]
    Cdp(#[from] chromiumoxide::error::CdpError),

    #[error("failed to launch browser: {0}")]
    Launch(String),

    #[error("unknown browsing context: {0}")]
    UnknownContext(String),

    #[error("automation backend error: {0}")]
    Backend(String),
}

#[derive(Debug, Error)]
pub enum ScraperError {
    #[error("timed out after {timeout_secs}s waiting for {step} ({selector})")]
    Timeout {
        step: &'static str,
        selector: String,
        timeout_secs: u64,
    },

    #[error("unexpected page structure in {field} ({value:?}): {reason}")]
    Structure {
        field: &'static str,
        value: String,
        reason: String,
    },

    #[error("element handle for {step} outlived its browsing context")]
    StaleHandle { step: &'static str },

    #[error(transparent)]
    Voucher(#[from] VoucherError),

    #[error(transparent)]
    Driver(#[from] DriverError),
}

impl ScraperError {
    pub(crate) fn structure(
        field: &'static str,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::Structure {
            field,
            value: value.into(),
            reason: reason.into(),
        }
    }
}
