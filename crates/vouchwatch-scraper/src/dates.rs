//! Expiration-date normalization for French vendor labels.
//!
//! The page renders expirations either relatively (`"Expire demain"`,
//! `"Expire aujourd'hui"`) or as a day and month after a label
//! (`"Expire le\n: 15 mars"`). The year is never shown: an absolute date is
//! read as the nearest occurrence that is not in the past, so at most one
//! year of roll-forward is ever applied.

use chrono::{Datelike, Days, Month, NaiveDate};

use crate::error::ScraperError;

const TOMORROW_MARKER: &str = "demain";
const TODAY_MARKERS: [&str; 2] = ["aujourd'hui", "aujourd\u{2019}hui"];
const DATE_SEPARATOR: &str = "\n: ";

const FRENCH_MONTHS: [(&str, u32); 15] = [
    ("janvier", 1),
    ("février", 2),
    ("fevrier", 2),
    ("mars", 3),
    ("avril", 4),
    ("mai", 5),
    ("juin", 6),
    ("juillet", 7),
    ("août", 8),
    ("aout", 8),
    ("septembre", 9),
    ("octobre", 10),
    ("novembre", 11),
    ("décembre", 12),
    ("decembre", 12),
];

/// Converts a raw expiration label into a calendar date, relative to
/// `today`.
///
/// # Errors
///
/// Returns [`ScraperError::Structure`] if the label is neither a relative
/// marker nor a recognizable `<day> <month>` pair.
pub fn normalize_expiration(raw: &str, today: NaiveDate) -> Result<NaiveDate, ScraperError> {
    let lower = raw.to_lowercase();

    if lower.contains(TOMORROW_MARKER) {
        return today
            .checked_add_days(Days::new(1))
            .ok_or_else(|| invalid(raw, "date overflow"));
    }
    if TODAY_MARKERS.iter().any(|m| lower.contains(m)) {
        return Ok(today);
    }

    let fragment = date_fragment(&lower);
    let mut tokens = fragment.split_whitespace();

    let day = tokens
        .next()
        .and_then(parse_day)
        .ok_or_else(|| invalid(raw, "expected a day number"))?;
    let month = tokens
        .next()
        .and_then(parse_month)
        .ok_or_else(|| invalid(raw, "expected a month name"))?;

    nearest_upcoming(day, month, today).ok_or_else(|| invalid(raw, "no such calendar date"))
}

/// The part of the label holding the date: after the `"\n: "` separator,
/// else after the last colon, else the whole label.
fn date_fragment(lower: &str) -> &str {
    if let Some((_, after)) = lower.split_once(DATE_SEPARATOR) {
        return after.trim();
    }
    match lower.rsplit_once(':') {
        Some((_, after)) => after.trim(),
        None => lower.trim(),
    }
}

/// `"15"`, `"05"`, and the ordinal `"1er"`.
fn parse_day(token: &str) -> Option<u32> {
    let digits = token.strip_suffix("er").unwrap_or(token);
    digits.parse::<u32>().ok().filter(|d| (1..=31).contains(d))
}

/// French month names (accents optional), falling back to English names.
fn parse_month(token: &str) -> Option<u32> {
    let token = token.trim_end_matches(|c: char| c == ',' || c == '.');
    FRENCH_MONTHS
        .iter()
        .find(|(name, _)| *name == token)
        .map(|(_, number)| *number)
        .or_else(|| token.parse::<Month>().ok().map(|m| m.number_from_month()))
}

/// `day`/`month` in the current year if that is today or later, otherwise
/// next year. Dates that do not exist this year (29 February) also move to
/// next year.
fn nearest_upcoming(day: u32, month: u32, today: NaiveDate) -> Option<NaiveDate> {
    match NaiveDate::from_ymd_opt(today.year(), month, day) {
        Some(date) if date >= today => Some(date),
        _ => NaiveDate::from_ymd_opt(today.year() + 1, month, day),
    }
}

fn invalid(raw: &str, reason: &str) -> ScraperError {
    ScraperError::structure("expiration_date", raw, reason)
}

#[cfg(test)]
#[path = "dates_test.rs"]
mod tests;
