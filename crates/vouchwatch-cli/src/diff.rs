use std::path::Path;

use anyhow::Context;
use chrono::Local;
use vouchwatch_core::{novel_indices, VoucherTable};

use crate::output::format_table;

pub(crate) fn read_snapshot(path: &Path) -> anyhow::Result<VoucherTable> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read snapshot {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("failed to parse snapshot {}", path.display()))
}

/// Run novelty selection over two snapshot files and print the current
/// table with the new codes marked.
///
/// # Errors
///
/// Returns an error if either file cannot be read or parsed, or a discount
/// in `current` is malformed.
pub(crate) fn run_diff(current: &Path, previous: &Path, threshold: u8) -> anyhow::Result<()> {
    let current_table = read_snapshot(current)?;
    let previous_table = read_snapshot(previous)?;
    let novel = novel_indices(&current_table, &previous_table, threshold)?;

    println!(
        "{} new code(s) at >= {threshold}% out of {}",
        novel.len(),
        current_table.len()
    );
    print!(
        "{}",
        format_table(&current_table, &novel, Local::now().date_naive())
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn diff_over_snapshot_files() {
        let dir = tempfile::tempdir().unwrap();
        let current = dir.path().join("current.json");
        let previous = dir.path().join("previous.json");
        std::fs::write(
            &current,
            r#"[
                {"discount": "30%", "description": "A", "expiration_date": "2024-06-30", "code": "A30"},
                {"discount": "10%", "description": "B", "expiration_date": "2024-06-30", "code": "B10"}
            ]"#,
        )
        .unwrap();
        std::fs::write(
            &previous,
            r#"[{"discount": "10%", "description": "B", "expiration_date": "2024-06-30", "code": "B10"}]"#,
        )
        .unwrap();

        assert_eq!(read_snapshot(&current).unwrap().len(), 2);
        run_diff(&current, &previous, 15).unwrap();
    }

    #[test]
    fn missing_snapshot_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_snapshot(&dir.path().join("nope.json")).unwrap_err();
        assert!(format!("{err:#}").contains("failed to read snapshot"));
    }
}
