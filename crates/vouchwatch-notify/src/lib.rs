pub mod alert;
pub mod render;
pub mod row;
pub mod smtp;

pub use alert::{compose_alert, Alert};
pub use render::render_html_table;
pub use row::{notification_rows, NotificationRow, COLUMN_LABELS};
pub use smtp::{build_message, Credentials, SmtpNotifier};

use async_trait::async_trait;
use thiserror::Error;
use vouchwatch_core::VoucherTable;

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("email credentials not found in environment ({user_var}, {pass_var})")]
    CredentialsMissing { user_var: String, pass_var: String },

    #[error("invalid email address: {0}")]
    Address(#[from] lettre::address::AddressError),

    #[error("failed to build alert message: {0}")]
    Message(#[from] lettre::error::Error),

    #[error("smtp transport failed: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),
}

/// Delivers an alert about newly observed codes.
///
/// `table` is the full current table; `novel` holds the positions in it that
/// were not seen in the previous snapshot and passed the threshold.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(
        &self,
        vendor: &str,
        table: &VoucherTable,
        novel: &[usize],
    ) -> Result<(), NotifyError>;

    /// Address the alert is delivered to, for the confirmation message.
    fn recipient(&self) -> &str;
}
