use chrono::NaiveDate;
use vouchwatch_core::VoucherTable;

use crate::render::{escape, render_html_table};

/// A rendered alert, independent of the transport that delivers it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub html: String,
}

/// Builds the alert for `vendor`: a short introduction followed by the full
/// current table with the novel rows highlighted.
#[must_use]
pub fn compose_alert(
    vendor: &str,
    table: &VoucherTable,
    novel: &[usize],
    sender: &str,
    receiver: &str,
    today: NaiveDate,
) -> Alert {
    let count = novel.len();
    let subject = format!("{vendor} : {count} nouveau(x) code(s) promo");
    let html = format!(
        "<html>\n<body>\n<p>Nouveaux codes promo disponibles pour <b>{vendor}</b> \
         (en surbrillance) :</p>\n{}</body>\n</html>\n",
        render_html_table(table, novel, today),
        vendor = escape(vendor),
    );

    Alert {
        from: sender.to_string(),
        to: receiver.to_string(),
        subject,
        html,
    }
}
