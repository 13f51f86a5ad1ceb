//! The watch pipeline: extract, diff against the last snapshot, persist,
//! then alert.
//!
//! The snapshot is replaced on every successful extraction, whether or not
//! anything new was found. Extraction failures abort before any write, so the
//! last good snapshot survives.

use std::path::Path;
use std::time::Duration;

use anyhow::Context;
use vouchwatch_core::{
    load_watch_config, novel_indices, snapshot_key, AppConfig, VoucherTable, WatchConfig,
};
use vouchwatch_notify::{Credentials, Notifier, NotifyError, SmtpNotifier};
use vouchwatch_scraper::{
    Automation, ChromiumDriver, Extraction, ExtractionSession, LaunchOptions, Pacing, PageProfile,
    Waiter,
};
use vouchwatch_store::{JsonFileStore, SnapshotStore};

/// What the alert step did.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum AlertOutcome {
    Disabled,
    NothingNew,
    Sent { recipient: String },
}

/// Run one watch pass end to end.
///
/// # Errors
///
/// Returns an error if configuration cannot be loaded, the browser cannot be
/// launched, extraction fails, the snapshot cannot be read or written, or an
/// alert is due but cannot be delivered.
pub(crate) async fn run_watch(
    config_path: &Path,
    selectors: Option<&Path>,
    app_config: &AppConfig,
) -> anyhow::Result<()> {
    let watch = load_watch_config(config_path)
        .with_context(|| format!("failed to load watch config {}", config_path.display()))?;
    let profile = match selectors {
        Some(path) => load_profile(path)?,
        None => PageProfile::default(),
    };

    let extraction = extract(&watch, profile, app_config).await?;

    let store = JsonFileStore::new(&watch.data_dir);
    let novel = record_snapshot(&store, &extraction, watch.min_discount)?;

    let outcome = alert_on_novel(watch.new_discount_alert, &extraction, &novel, || {
        let credentials = Credentials::from_env(&watch.email_user_var, &watch.email_pass_var)?;
        Ok(SmtpNotifier::new(
            app_config.smtp_host.clone(),
            app_config.smtp_port,
            credentials,
        ))
    })
    .await?;

    match outcome {
        AlertOutcome::Disabled => {
            tracing::info!(novel = novel.len(), "alerts disabled; snapshot updated");
        }
        AlertOutcome::NothingNew => println!("No new codes found."),
        AlertOutcome::Sent { recipient } => println!("Alert sent to '{recipient}'."),
    }
    Ok(())
}

/// Launch the browser, run one extraction session, and shut the browser
/// down whatever the outcome.
async fn extract(
    watch: &WatchConfig,
    profile: PageProfile,
    app_config: &AppConfig,
) -> anyhow::Result<Extraction> {
    let options = LaunchOptions {
        headless: watch.headless,
        executable: app_config.chrome_path.clone(),
    };
    let mut driver = ChromiumDriver::launch(&options)
        .await
        .context("failed to launch browser")?;

    let waiter = Waiter::new(
        Duration::from_secs(app_config.wait_timeout_secs),
        Duration::from_millis(app_config.wait_poll_ms),
    );
    let pacing = Pacing::from_millis(app_config.pacing_ms);
    let result = ExtractionSession::new(&mut driver, profile, waiter, pacing)
        .extract(&watch.url)
        .await;

    if let Err(e) = driver.shutdown().await {
        tracing::warn!(error = %e, "browser shutdown failed");
    }

    result.with_context(|| format!("extraction failed for {}", watch.url))
}

fn load_profile(path: &Path) -> anyhow::Result<PageProfile> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read selectors {}", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("failed to parse selectors {}", path.display()))
}

/// Diff the extraction against the stored snapshot, then replace the
/// snapshot. Returns the positions of novel codes in the extracted table.
pub(crate) fn record_snapshot<S: SnapshotStore>(
    store: &S,
    extraction: &Extraction,
    threshold: u8,
) -> anyhow::Result<Vec<usize>> {
    let key = snapshot_key(&extraction.vendor);
    let previous = store
        .load_previous(&key)
        .with_context(|| format!("failed to load snapshot for {}", extraction.vendor))?
        .unwrap_or_else(VoucherTable::empty);

    let novel = novel_indices(&extraction.table, &previous, threshold)?;
    tracing::info!(
        vendor = %extraction.vendor,
        current = extraction.table.len(),
        previous = previous.len(),
        novel = novel.len(),
        threshold,
        "novelty computed"
    );

    store
        .save(&key, &extraction.table)
        .with_context(|| format!("failed to save snapshot for {}", extraction.vendor))?;
    Ok(novel)
}

/// Send an alert when alerts are enabled and there is something new.
///
/// `connect` is only called when an alert is actually due, so missing
/// credentials never fail a run that has nothing to report.
pub(crate) async fn alert_on_novel<N, F>(
    enabled: bool,
    extraction: &Extraction,
    novel: &[usize],
    connect: F,
) -> anyhow::Result<AlertOutcome>
where
    N: Notifier,
    F: FnOnce() -> Result<N, NotifyError>,
{
    if !enabled {
        return Ok(AlertOutcome::Disabled);
    }
    if novel.is_empty() {
        return Ok(AlertOutcome::NothingNew);
    }

    let notifier = connect()?;
    notifier
        .notify(&extraction.vendor, &extraction.table, novel)
        .await
        .context("failed to send alert")?;
    Ok(AlertOutcome::Sent {
        recipient: notifier.recipient().to_string(),
    })
}

#[cfg(test)]
#[path = "run_test.rs"]
mod tests;
