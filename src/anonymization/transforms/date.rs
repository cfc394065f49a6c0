//! Date shifting and masking

use chrono::{Duration, NaiveDate, NaiveDateTime};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Add `days` to a date, `None` on calendar overflow
pub fn shift_date(date: NaiveDate, days: i64) -> Option<NaiveDate> {
    date.checked_add_signed(Duration::days(days))
}

/// Add `days` to a timestamp, keeping the time of day
pub fn shift_timestamp(ts: NaiveDateTime, days: i64) -> Option<NaiveDateTime> {
    ts.checked_add_signed(Duration::days(days))
}

/// Parse `YYYY-MM-DD`, optionally followed by a time part
pub fn parse_date_text(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    let date_part = match value.find(|c: char| c == ' ' || c == 'T') {
        Some(idx) => &value[..idx],
        None => value,
    };
    NaiveDate::parse_from_str(date_part, DATE_FORMAT).ok()
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Keep the leading year segment of a dashed date string
///
/// Text that does not have three dash-separated parts is returned unchanged.
pub fn mask_date_text(value: &str) -> String {
    let parts: Vec<&str> = value.split('-').collect();
    if parts.len() == 3 {
        format!("{}-**-**", parts[0])
    } else {
        value.to_string()
    }
}
