use std::path::Path;

use anyhow::Context;
use chrono::Local;
use vouchwatch_core::{load_watch_config, snapshot_key};
use vouchwatch_store::{JsonFileStore, SnapshotStore};

use crate::output::format_table;

/// Print the stored snapshot for `vendor`.
///
/// # Errors
///
/// Returns an error if the watch configuration cannot be loaded or the
/// snapshot exists but cannot be read.
pub(crate) fn run_show(config_path: &Path, vendor: &str) -> anyhow::Result<()> {
    let watch = load_watch_config(config_path)
        .with_context(|| format!("failed to load watch config {}", config_path.display()))?;
    let store = JsonFileStore::new(&watch.data_dir);
    let key = snapshot_key(vendor);

    let Some(table) = store.load_previous(&key)? else {
        println!("no snapshot for '{vendor}'; run `vouchwatch run` first");
        return Ok(());
    };

    println!(
        "{vendor}: {} code(s) in {}",
        table.len(),
        store.snapshot_path(&key).display()
    );
    print!("{}", format_table(&table, &[], Local::now().date_naive()));
    Ok(())
}
