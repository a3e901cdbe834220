//! Parsers for the raw string columns of the bookings file.
//!
//! Each parser returns a plain reason string on failure; the loader attaches
//! the line, column and value before surfacing it as a `DatasetError::Parse`.

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use std::str::FromStr;

/// Separator between the count and its description in the occupancy column.
pub const OCCUPANCY_SEPARATOR: &str = " - ";

const DATE_FORMATS: [&str; 5] = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d %b %Y", "%b %d, %Y"];

const DATETIME_FORMATS: [&str; 5] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

/// Parses a currency-prefixed amount such as `"THB 1234.00"`.
///
/// A value without the prefix is accepted as a bare number.
pub fn parse_total_price(raw: &str, currency_prefix: &str) -> Result<Decimal, String> {
    let trimmed = raw.trim();
    let amount = trimmed
        .strip_prefix(currency_prefix)
        .or_else(|| trimmed.strip_prefix(currency_prefix.trim()))
        .unwrap_or(trimmed)
        .trim();

    if amount.is_empty() {
        return Err("no amount after currency prefix".to_string());
    }

    Decimal::from_str(amount)
        .or_else(|_| Decimal::from_scientific(amount))
        .map_err(|e| format!("not a numeric amount ({e})"))
}

/// Parses `"<int> - <description>"`, keeping the integer before the separator.
pub fn parse_occupancy(raw: &str) -> Result<i64, String> {
    let count = raw
        .split(OCCUPANCY_SEPARATOR)
        .next()
        .unwrap_or_default()
        .trim();

    count
        .parse::<i64>()
        .map_err(|e| format!("occupancy count '{count}' is not an integer ({e})"))
}

/// Parses the check-in column into a calendar date.
///
/// Slash dates are read month-first. Date-times are truncated to their date.
pub fn parse_check_in(raw: &str) -> Result<NaiveDate, String> {
    let trimmed = raw.trim();

    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(trimmed, fmt).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(trimmed, fmt).ok())
                .map(|dt| dt.date())
        })
        .ok_or_else(|| "unrecognized date format".to_string())
}
