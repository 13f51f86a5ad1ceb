//! Selection of newly observed, sufficiently discounted vouchers.
//!
//! Novelty is a left anti-join of the current table against the previous
//! snapshot over every field, followed by an inclusive discount threshold.
//! Selections keep the order of the current table.

use std::collections::HashSet;

use crate::voucher::{VoucherRecord, VoucherTable};
use crate::VoucherError;

/// Positions in `current` of records absent from `previous` whose discount
/// is at least `threshold`.
///
/// The positions are the identity set handed to the notifier, which
/// highlights those rows in the full current table.
///
/// # Errors
///
/// Returns [`VoucherError::MalformedDiscount`] if any discount in `current`
/// cannot be parsed, whether or not that row is novel.
pub fn novel_indices(
    current: &VoucherTable,
    previous: &VoucherTable,
    threshold: u8,
) -> Result<Vec<usize>, VoucherError> {
    let seen: HashSet<&VoucherRecord> = previous.iter().collect();

    let mut indices = Vec::new();
    for (idx, record) in current.iter().enumerate() {
        let pct = record.discount_percent()?;
        if !seen.contains(record) && pct >= threshold {
            indices.push(idx);
        }
    }

    Ok(indices)
}

/// Records of `current` absent from `previous` whose discount is at least
/// `threshold`, in `current` order.
///
/// Pass [`VoucherTable::empty`] as `previous` when no snapshot exists; the
/// selection then reduces to the threshold filter.
///
/// # Errors
///
/// See [`novel_indices`].
pub fn select_new_codes(
    current: &VoucherTable,
    previous: &VoucherTable,
    threshold: u8,
) -> Result<VoucherTable, VoucherError> {
    let indices = novel_indices(current, previous, threshold)?;
    Ok(current.subset(&indices))
}

#[cfg(test)]
#[path = "novelty_test.rs"]
mod tests;
