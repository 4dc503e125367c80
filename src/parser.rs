//! Parsing of timestamp and date fields found in the open data exports.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
    "%m/%d/%Y %I:%M:%S %p",
    "%m/%d/%Y %H:%M:%S",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y"];

/// Year-month values such as `2024-01`, resolved to the first of the month.
const MONTH_FORMAT: &str = "%Y-%m-%d";

/// Spellings treated as an absent value.
const MISSING_MARKERS: &[&str] = &[
    "", "NA", "N/A", "n/a", "NaN", "nan", "null", "NULL", "None", "<NA>", "#N/A",
];

/// Parses a timestamp in any of the layouts the source exports use.
///
/// Offsets are dropped and the wall-clock time is kept. Date-only values
/// resolve to midnight, and year-month values to midnight on the first.
/// Returns `None` for missing or unparseable input.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let value = raw.trim();
    if is_missing(value) {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.naive_local());
    }

    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(value, fmt).ok())
                .or_else(|| NaiveDate::parse_from_str(&format!("{value}-01"), MONTH_FORMAT).ok())
                .map(|d| d.and_time(NaiveTime::MIN))
        })
}

/// Returns `true` if the raw field holds no value.
pub fn is_missing(raw: &str) -> bool {
    MISSING_MARKERS.contains(&raw.trim())
}

pub fn format_timestamp(ts: &NaiveDateTime) -> String {
    ts.format("%Y-%m-%d %H:%M:%S").to_string()
}

pub fn format_date(date: &NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}
