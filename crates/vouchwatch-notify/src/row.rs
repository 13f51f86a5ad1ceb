//! Display rows for the alert table.
//!
//! These carry derived fields that are never stored in a snapshot and never
//! take part in novelty comparison.

use chrono::NaiveDate;
use vouchwatch_core::{VoucherRecord, VoucherTable};

/// Column headings, in display order.
pub const COLUMN_LABELS: [&str; 5] = [
    "Réduction",
    "Description",
    "Date d'expiration",
    "Code",
    "Jours avant expiration",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationRow {
    pub discount: String,
    pub description: String,
    pub expiration_date: NaiveDate,
    pub code: String,
    /// Whole days from `today` to the expiration date; 0 on the last day.
    pub days_before_expiration: i64,
    pub novel: bool,
}

impl NotificationRow {
    #[must_use]
    pub fn from_record(record: &VoucherRecord, today: NaiveDate, novel: bool) -> Self {
        Self {
            discount: record.discount.clone(),
            description: record.description.clone(),
            expiration_date: record.expiration_date,
            code: record.code.clone(),
            days_before_expiration: (record.expiration_date - today).num_days(),
            novel,
        }
    }

    /// Cell values in [`COLUMN_LABELS`] order.
    #[must_use]
    pub fn cells(&self) -> [String; 5] {
        [
            self.discount.clone(),
            self.description.clone(),
            self.expiration_date.format("%d/%m/%Y").to_string(),
            self.code.clone(),
            self.days_before_expiration.to_string(),
        ]
    }
}

/// One row per record of `table`, flagging the positions listed in `novel`.
#[must_use]
pub fn notification_rows(
    table: &VoucherTable,
    novel: &[usize],
    today: NaiveDate,
) -> Vec<NotificationRow> {
    table
        .iter()
        .enumerate()
        .map(|(i, record)| NotificationRow::from_record(record, today, novel.contains(&i)))
        .collect()
}
