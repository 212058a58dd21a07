//! Calendar arithmetic, parsing and display helpers
//!
//! Events are stored as a naive local date plus a naive wall-clock start
//! time; the parish runs in a single time zone.

use chrono::{Duration, Months, NaiveDate, NaiveTime};

use crate::error::DomainError;

/// Wire format for dates (`2025-03-05`)
pub const DATE_FORMAT: &str = "%Y-%m-%d";
/// Wire format for times (`09:30`)
pub const TIME_FORMAT: &str = "%H:%M";

pub fn add_days(date: NaiveDate, days: i64) -> Option<NaiveDate> {
    date.checked_add_signed(Duration::try_days(days)?)
}

pub fn add_weeks(date: NaiveDate, weeks: i64) -> Option<NaiveDate> {
    date.checked_add_signed(Duration::try_weeks(weeks)?)
}

/// Add calendar months, clamping to the last day of the target month
pub fn add_months(date: NaiveDate, months: u32) -> Option<NaiveDate> {
    date.checked_add_months(Months::new(months))
}

/// Parse a strict `YYYY-MM-DD` date
pub fn parse_date(value: &str) -> Result<NaiveDate, DomainError> {
    if !has_shape(value, "dddd-dd-dd") {
        return Err(DomainError::InvalidDate(value.to_string()));
    }
    NaiveDate::parse_from_str(value, DATE_FORMAT)
        .map_err(|_| DomainError::InvalidDate(value.to_string()))
}

/// Parse a strict 24-hour `HH:MM` time
pub fn parse_time(value: &str) -> Result<NaiveTime, DomainError> {
    if !has_shape(value, "dd:dd") {
        return Err(DomainError::InvalidTime(value.to_string()));
    }
    NaiveTime::parse_from_str(value, TIME_FORMAT)
        .map_err(|_| DomainError::InvalidTime(value.to_string()))
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

pub fn format_time(time: NaiveTime) -> String {
    time.format(TIME_FORMAT).to_string()
}

/// Human-readable date for messages, e.g. `March 5, 2025`
pub fn format_long_date(date: NaiveDate) -> String {
    date.format("%B %-d, %Y").to_string()
}

/// 12-hour clock for messages, e.g. `9:30 AM`
pub fn format_12h(time: NaiveTime) -> String {
    time.format("%-I:%M %p").to_string()
}

// `d` matches an ASCII digit, any other pattern byte must match literally.
fn has_shape(value: &str, pattern: &str) -> bool {
    value.len() == pattern.len()
        && value
            .bytes()
            .zip(pattern.bytes())
            .all(|(v, p)| if p == b'd' { v.is_ascii_digit() } else { v == p })
}
