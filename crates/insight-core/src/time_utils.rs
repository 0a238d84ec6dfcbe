use chrono::NaiveDate;

use crate::error::{Result, SalesError};

/// Date format used by both the raw files and the consolidated table.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// The day the Pink Morsel price increase took effect.
pub const PRICE_INCREASE_DATE: NaiveDate = match NaiveDate::from_ymd_opt(2021, 1, 15) {
    Some(date) => date,
    None => panic!("invalid price increase date"),
};

/// Parse a `YYYY-MM-DD` date, ignoring surrounding whitespace.
pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), DATE_FORMAT)
        .map_err(|_| SalesError::InvalidDate(s.to_string()))
}

/// Long human form, e.g. `"January 15, 2021"`.
pub fn format_long_date(date: NaiveDate) -> String {
    date.format("%B %-d, %Y").to_string()
}
