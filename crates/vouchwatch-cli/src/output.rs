use std::fmt::Write;

use chrono::NaiveDate;
use vouchwatch_core::VoucherTable;
use vouchwatch_notify::notification_rows;

const DESCRIPTION_WIDTH: usize = 50;

/// Fixed-width rendering of a table for the terminal. Rows whose position is
/// in `novel` are marked with `*`.
pub(crate) fn format_table(table: &VoucherTable, novel: &[usize], today: NaiveDate) -> String {
    let mut out = format!(
        "  {:<10}{:<20}{:<12}{:<6}DESCRIPTION\n",
        "DISCOUNT", "CODE", "EXPIRES", "DAYS"
    );
    for row in notification_rows(table, novel, today) {
        let marker = if row.novel { '*' } else { ' ' };
        let description = if row.description.chars().count() > DESCRIPTION_WIDTH {
            format!(
                "{}...",
                row.description
                    .chars()
                    .take(DESCRIPTION_WIDTH)
                    .collect::<String>()
            )
        } else {
            row.description.clone()
        };
        let _ = writeln!(
            out,
            "{marker} {:<10}{:<20}{:<12}{:<6}{}",
            row.discount,
            row.code,
            row.expiration_date.format("%Y-%m-%d").to_string(),
            row.days_before_expiration,
            description
        );
    }
    out
}
