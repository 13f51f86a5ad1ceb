//! HTML rendering of the alert table.

use std::fmt::Write;

use chrono::NaiveDate;
use vouchwatch_core::VoucherTable;

use crate::row::{notification_rows, COLUMN_LABELS};

const TABLE_STYLE: &str = "border-collapse: collapse; font-family: sans-serif; font-size: 14px;";
const CELL_STYLE: &str = "border: 1px solid #d0d0d0; padding: 4px 8px; text-align: left;";
const NOVEL_ROW_STYLE: &str = "background-color: #fff2a8; font-weight: bold;";

/// Renders the full current table with the `novel` positions highlighted.
#[must_use]
pub fn render_html_table(table: &VoucherTable, novel: &[usize], today: NaiveDate) -> String {
    let mut html = String::new();
    let _ = writeln!(html, "<table style=\"{TABLE_STYLE}\">");

    html.push_str("  <thead>\n    <tr>");
    for label in COLUMN_LABELS {
        let _ = write!(html, "<th style=\"{CELL_STYLE}\">{}</th>", escape(label));
    }
    html.push_str("</tr>\n  </thead>\n  <tbody>\n");

    for row in notification_rows(table, novel, today) {
        if row.novel {
            let _ = write!(html, "    <tr style=\"{NOVEL_ROW_STYLE}\">");
        } else {
            html.push_str("    <tr>");
        }
        for cell in row.cells() {
            let _ = write!(html, "<td style=\"{CELL_STYLE}\">{}</td>", escape(&cell));
        }
        html.push_str("</tr>\n");
    }

    html.push_str("  </tbody>\n</table>\n");
    html
}

pub(crate) fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
#[path = "render_test.rs"]
mod tests;
