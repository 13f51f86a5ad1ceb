use super::*;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn reference() -> NaiveDate {
    date(2024, 3, 10)
}

// -----------------------------------------------------------------------
// relative markers
// -----------------------------------------------------------------------

#[test]
fn tomorrow_is_next_day() {
    assert_eq!(
        normalize_expiration("Expire demain", reference()).unwrap(),
        date(2024, 3, 11)
    );
}

#[test]
fn tomorrow_crosses_year_end() {
    assert_eq!(
        normalize_expiration("Expire demain", date(2024, 12, 31)).unwrap(),
        date(2025, 1, 1)
    );
}

#[test]
fn today_is_reference_date() {
    assert_eq!(
        normalize_expiration("Expire aujourd'hui", reference()).unwrap(),
        reference()
    );
}

#[test]
fn today_with_typographic_apostrophe() {
    assert_eq!(
        normalize_expiration("Expire aujourd\u{2019}hui", reference()).unwrap(),
        reference()
    );
}

#[test]
fn markers_are_case_insensitive() {
    assert_eq!(
        normalize_expiration("DEMAIN", reference()).unwrap(),
        date(2024, 3, 11)
    );
}

// -----------------------------------------------------------------------
// absolute day + month
// -----------------------------------------------------------------------

#[test]
fn later_this_year_keeps_current_year() {
    assert_eq!(
        normalize_expiration("Expire le\n: 15 mars", reference()).unwrap(),
        date(2024, 3, 15)
    );
}

#[test]
fn earlier_in_year_rolls_to_next_year() {
    assert_eq!(
        normalize_expiration("Expire le\n: 5 janvier", reference()).unwrap(),
        date(2025, 1, 5)
    );
}

#[test]
fn same_day_is_not_rolled() {
    assert_eq!(
        normalize_expiration("Expire le\n: 10 mars", reference()).unwrap(),
        reference()
    );
}

#[test]
fn yesterday_rolls_a_full_year() {
    assert_eq!(
        normalize_expiration("Expire le\n: 9 mars", reference()).unwrap(),
        date(2025, 3, 9)
    );
}

#[test]
fn accented_and_unaccented_months() {
    assert_eq!(
        normalize_expiration("Expire le\n: 14 août", reference()).unwrap(),
        date(2024, 8, 14)
    );
    assert_eq!(
        normalize_expiration("Expire le\n: 14 aout", reference()).unwrap(),
        date(2024, 8, 14)
    );
    assert_eq!(
        normalize_expiration("Expire le\n: 24 Décembre", reference()).unwrap(),
        date(2024, 12, 24)
    );
    assert_eq!(
        normalize_expiration("Expire le\n: 2 février", reference()).unwrap(),
        date(2025, 2, 2)
    );
}

#[test]
fn english_month_names_accepted() {
    assert_eq!(
        normalize_expiration("Expires\n: 15 march", reference()).unwrap(),
        date(2024, 3, 15)
    );
}

#[test]
fn ordinal_first_day() {
    assert_eq!(
        normalize_expiration("Expire le\n: 1er avril", reference()).unwrap(),
        date(2024, 4, 1)
    );
}

#[test]
fn colon_without_newline_is_accepted() {
    assert_eq!(
        normalize_expiration("Expire le : 30 juin", reference()).unwrap(),
        date(2024, 6, 30)
    );
}

#[test]
fn bare_fragment_is_accepted() {
    assert_eq!(
        normalize_expiration("30 juin", reference()).unwrap(),
        date(2024, 6, 30)
    );
}

#[test]
fn leap_day_missing_this_year_moves_to_next() {
    assert_eq!(
        normalize_expiration("Expire le\n: 29 février", date(2027, 1, 10)).unwrap(),
        date(2028, 2, 29)
    );
}

#[test]
fn impossible_date_is_structure_error() {
    let err = normalize_expiration("Expire le\n: 31 avril", reference()).unwrap_err();
    assert!(
        matches!(err, ScraperError::Structure { field: "expiration_date", .. }),
        "got: {err:?}"
    );
}

#[test]
fn unknown_month_is_structure_error() {
    let err = normalize_expiration("Expire le\n: 15 brumaire", reference()).unwrap_err();
    assert!(matches!(err, ScraperError::Structure { ref reason, .. } if reason.contains("month")));
}

#[test]
fn missing_day_is_structure_error() {
    let err = normalize_expiration("Offre permanente", reference()).unwrap_err();
    assert!(matches!(err, ScraperError::Structure { ref reason, .. } if reason.contains("day")));
}
