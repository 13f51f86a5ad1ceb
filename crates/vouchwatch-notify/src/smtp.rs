//! SMTP delivery of alerts.
//!
//! The alert is sent from the configured account to itself over implicit
//! TLS. Credentials are resolved from environment variables whose names come
//! from the watch configuration, and only when an alert is actually due.

use async_trait::async_trait;
use chrono::Local;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials as SmtpCredentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use vouchwatch_core::VoucherTable;

use crate::alert::{compose_alert, Alert};
use crate::{Notifier, NotifyError};

#[derive(Clone)]
pub struct Credentials {
    user: String,
    password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("user", &self.user)
            .field("password", &"[redacted]")
            .finish()
    }
}

impl Credentials {
    pub fn new(user: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            password: password.into(),
        }
    }

    /// Reads the account from the environment variables named `user_var`
    /// and `pass_var`.
    ///
    /// # Errors
    ///
    /// Returns [`NotifyError::CredentialsMissing`] if either is unset or
    /// blank.
    pub fn from_env(user_var: &str, pass_var: &str) -> Result<Self, NotifyError> {
        Self::from_lookup(user_var, pass_var, |key| std::env::var(key).ok())
    }

    /// Same as [`Credentials::from_env`] over an arbitrary lookup.
    ///
    /// # Errors
    ///
    /// Returns [`NotifyError::CredentialsMissing`] if either value is
    /// missing or blank.
    pub fn from_lookup<F>(user_var: &str, pass_var: &str, lookup: F) -> Result<Self, NotifyError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let present = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        match (present(user_var), present(pass_var)) {
            (Some(user), Some(password)) => Ok(Self::new(user.trim(), password)),
            _ => Err(NotifyError::CredentialsMissing {
                user_var: user_var.to_string(),
                pass_var: pass_var.to_string(),
            }),
        }
    }

    #[must_use]
    pub fn user(&self) -> &str {
        &self.user
    }
}

#[derive(Debug, Clone)]
pub struct SmtpNotifier {
    host: String,
    port: u16,
    credentials: Credentials,
}

impl SmtpNotifier {
    pub fn new(host: impl Into<String>, port: u16, credentials: Credentials) -> Self {
        Self {
            host: host.into(),
            port,
            credentials,
        }
    }
}

/// Converts a rendered alert into an HTML email.
///
/// # Errors
///
/// Returns [`NotifyError::Address`] for an unparseable sender or receiver
/// and [`NotifyError::Message`] if the message cannot be assembled.
pub fn build_message(alert: &Alert) -> Result<Message, NotifyError> {
    let from: Mailbox = alert.from.parse()?;
    let to: Mailbox = alert.to.parse()?;
    let message = Message::builder()
        .from(from)
        .to(to)
        .subject(alert.subject.clone())
        .header(ContentType::TEXT_HTML)
        .body(alert.html.clone())?;
    Ok(message)
}

#[async_trait]
impl Notifier for SmtpNotifier {
    async fn notify(
        &self,
        vendor: &str,
        table: &VoucherTable,
        novel: &[usize],
    ) -> Result<(), NotifyError> {
        let user = self.credentials.user();
        let alert = compose_alert(vendor, table, novel, user, user, Local::now().date_naive());
        let message = build_message(&alert)?;

        let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(&self.host)?
            .port(self.port)
            .credentials(SmtpCredentials::new(
                self.credentials.user.clone(),
                self.credentials.password.clone(),
            ))
            .build();

        tracing::info!(
            vendor,
            novel = novel.len(),
            host = %self.host,
            port = self.port,
            "sending alert"
        );
        transport.send(message).await?;
        Ok(())
    }

    fn recipient(&self) -> &str {
        self.credentials.user()
    }
}
