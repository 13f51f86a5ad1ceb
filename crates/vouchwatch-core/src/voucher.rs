//! Voucher records and the per-run voucher table.
//!
//! A [`VoucherTable`] is always built from positionally aligned columns (one
//! per field) and is kept sorted by discount, highest first. Tables are the
//! unit of persistence and comparison: they are never patched in place.

use std::cmp::Reverse;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::VoucherError;

/// One promotional code observed during a single extraction pass.
///
/// Equality is structural over every field; two records describe the same
/// voucher only if all four match exactly.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VoucherRecord {
    /// Vendor-formatted percentage, e.g. `"20%"`.
    pub discount: String,
    pub description: String,
    pub expiration_date: NaiveDate,
    pub code: String,
}

impl VoucherRecord {
    /// Integer percentage of [`VoucherRecord::discount`].
    ///
    /// # Errors
    ///
    /// Returns [`VoucherError::MalformedDiscount`] if the stored value is not
    /// of the form `<digits>%`.
    pub fn discount_percent(&self) -> Result<u8, VoucherError> {
        parse_discount(&self.discount)
    }
}

/// Parses a vendor discount label such as `"20%"` into its integer value.
///
/// Surrounding whitespace is ignored. Anything else (a missing `%`, a
/// missing number, a sign, a fraction, a value over 100) is rejected.
///
/// # Errors
///
/// Returns [`VoucherError::MalformedDiscount`] describing what was wrong.
pub fn parse_discount(raw: &str) -> Result<u8, VoucherError> {
    let malformed = |reason: &str| VoucherError::MalformedDiscount {
        value: raw.to_string(),
        reason: reason.to_string(),
    };

    let digits = raw
        .trim()
        .strip_suffix('%')
        .ok_or_else(|| malformed("missing trailing '%'"))?
        .trim_end();

    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(malformed("expected digits before '%'"));
    }

    let value: u32 = digits
        .parse()
        .map_err(|_| malformed("percentage out of range"))?;

    u8::try_from(value)
        .ok()
        .filter(|v| *v <= 100)
        .ok_or_else(|| malformed("percentage above 100"))
}

/// Derives the snapshot key for a vendor: lower-cased, spaces replaced by
/// underscores.
#[must_use]
pub fn snapshot_key(vendor: &str) -> String {
    vendor.trim().to_lowercase().replace(' ', "_")
}

/// The complete result of one extraction pass, sorted by discount
/// descending.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VoucherTable {
    rows: Vec<VoucherRecord>,
}

impl VoucherTable {
    /// An empty table, used in place of a missing previous snapshot.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Assembles positionally aligned field columns into rows, then sorts
    /// them by discount (numeric, descending). The sort is stable, so equal
    /// discounts keep their page order.
    ///
    /// # Errors
    ///
    /// Returns [`VoucherError::ColumnMismatch`] if any column length differs
    /// from the `discounts` column, or [`VoucherError::MalformedDiscount`] if
    /// a discount cannot be parsed.
    pub fn from_columns(
        discounts: Vec<String>,
        descriptions: Vec<String>,
        expiration_dates: Vec<NaiveDate>,
        codes: Vec<String>,
    ) -> Result<Self, VoucherError> {
        let expected = discounts.len();
        for (field, found) in [
            ("description", descriptions.len()),
            ("expiration_date", expiration_dates.len()),
            ("code", codes.len()),
        ] {
            if found != expected {
                return Err(VoucherError::ColumnMismatch {
                    field,
                    expected,
                    found,
                });
            }
        }

        let rows = discounts
            .into_iter()
            .zip(descriptions)
            .zip(expiration_dates)
            .zip(codes)
            .map(
                |(((discount, description), expiration_date), code)| VoucherRecord {
                    discount,
                    description,
                    expiration_date,
                    code,
                },
            )
            .collect();

        Self::sorted(rows)
    }

    /// Builds a table from already-assembled rows, sorting them by discount.
    ///
    /// # Errors
    ///
    /// Returns [`VoucherError::MalformedDiscount`] if a discount cannot be
    /// parsed.
    pub fn sorted(rows: Vec<VoucherRecord>) -> Result<Self, VoucherError> {
        let mut keyed = rows
            .into_iter()
            .map(|row| row.discount_percent().map(|pct| (pct, row)))
            .collect::<Result<Vec<_>, _>>()?;
        keyed.sort_by_key(|(pct, _)| Reverse(*pct));

        Ok(Self {
            rows: keyed.into_iter().map(|(_, row)| row).collect(),
        })
    }

    /// Wraps rows as-is, keeping their order. Used for selections, which are
    /// subsequences of an already sorted table.
    #[must_use]
    pub fn from_rows(rows: Vec<VoucherRecord>) -> Self {
        Self { rows }
    }

    #[must_use]
    pub fn rows(&self) -> &[VoucherRecord] {
        &self.rows
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, VoucherRecord> {
        self.rows.iter()
    }

    /// Rows at `indices`, in the order given. Out-of-range indices are
    /// ignored.
    #[must_use]
    pub fn subset(&self, indices: &[usize]) -> Self {
        Self {
            rows: indices
                .iter()
                .filter_map(|&i| self.rows.get(i).cloned())
                .collect(),
        }
    }

    #[must_use]
    pub fn into_rows(self) -> Vec<VoucherRecord> {
        self.rows
    }
}

impl<'a> IntoIterator for &'a VoucherTable {
    type Item = &'a VoucherRecord;
    type IntoIter = std::slice::Iter<'a, VoucherRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

#[cfg(test)]
#[path = "voucher_test.rs"]
mod tests;
