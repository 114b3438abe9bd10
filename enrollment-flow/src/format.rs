//! Input masks for Brazilian document numbers and date helpers.
//!
//! Every mask strips non-digits first, so applying it to an already
//! formatted value yields the same value.

use chrono::{Datelike, NaiveDate};

pub const CPF_DIGITS: usize = 11;
pub const CEP_DIGITS: usize = 8;
pub const PHONE_MAX_DIGITS: usize = 11;
pub const PHONE_MIN_DIGITS: usize = 10;

/// Keep only ASCII digits
pub fn digits(input: &str) -> String {
    input.chars().filter(|c| c.is_ascii_digit()).collect()
}

fn truncated_digits(input: &str, max: usize) -> String {
    let mut d = digits(input);
    d.truncate(max);
    d
}

/// `12345678901` -> `123.456.789-01`, rendered progressively while typing
pub fn format_cpf(input: &str) -> String {
    let d = truncated_digits(input, CPF_DIGITS);
    match d.len() {
        0..=3 => d,
        4..=6 => format!("{}.{}", &d[..3], &d[3..]),
        7..=9 => format!("{}.{}.{}", &d[..3], &d[3..6], &d[6..]),
        _ => format!("{}.{}.{}-{}", &d[..3], &d[3..6], &d[6..9], &d[9..]),
    }
}

/// `49000000` -> `49000-000`
pub fn format_cep(input: &str) -> String {
    let d = truncated_digits(input, CEP_DIGITS);
    if d.len() > 5 {
        format!("{}-{}", &d[..5], &d[5..])
    } else {
        d
    }
}

/// `79999998888` -> `(79) 99999-8888`, `7933334444` -> `(79) 3333-4444`
pub fn format_phone(input: &str) -> String {
    let d = truncated_digits(input, PHONE_MAX_DIGITS);
    if d.len() <= 2 {
        return d;
    }
    let (area, rest) = d.split_at(2);
    if rest.len() > 4 {
        let (head, tail) = rest.split_at(rest.len() - 4);
        format!("({area}) {head}-{tail}")
    } else {
        format!("({area}) {rest}")
    }
}

/// Accepts `YYYY-MM-DD` or `DD/MM/YYYY`
pub fn parse_date(input: &str) -> Option<NaiveDate> {
    let input = input.trim();
    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(input, "%d/%m/%Y"))
        .ok()
}

/// Rewrites a parseable date as ISO, leaves anything else untouched so
/// validation can report it
pub fn normalize_date(input: &str) -> String {
    match parse_date(input) {
        Some(date) => date.format("%Y-%m-%d").to_string(),
        None => input.trim().to_string(),
    }
}

/// `DD/MM/YYYY` for printed forms, falls back to the raw value
pub fn display_date(input: &str) -> String {
    match parse_date(input) {
        Some(date) => date.format("%d/%m/%Y").to_string(),
        None => input.to_string(),
    }
}

/// Whole years between `birth` and `today`; `None` when born after `today`
pub fn age_on(birth: NaiveDate, today: NaiveDate) -> Option<u32> {
    if birth > today {
        return None;
    }
    let mut age = today.year() - birth.year();
    if (today.month(), today.day()) < (birth.month(), birth.day()) {
        age -= 1;
    }
    u32::try_from(age).ok()
}

/// BRL amount from cents, e.g. `R$ 184,00`
pub fn brl(cents: u32) -> String {
    format!("R$ {},{:02}", cents / 100, cents % 100)
}
