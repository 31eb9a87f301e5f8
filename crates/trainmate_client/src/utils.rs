//! Utility functions for calendar-date parsing and formatting.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};

/// Parse a calendar date from any of the representations the API emits and
/// drop the time of day.
///
/// Accepts:
/// - YYYY-MM-DD
/// - Naive datetime YYYY-MM-DDTHH:MM:SS (fractional seconds allowed)
/// - RFC3339 datetime, using the date in its own offset
/// - RFC2822 datetime such as `Sun, 12 May 2024 00:00:00 GMT`
pub fn parse_calendar_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(d);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.date_naive());
    }
    if let Ok(ndt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(ndt.date());
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
        return Some(dt.date_naive());
    }
    None
}

/// Short `dd/mm` label used on the calorie chart and the workout list.
pub fn format_day_month(date: NaiveDate) -> String {
    format!("{:02}/{:02}", date.day(), date.month())
}

/// `YYYY-MM-DD`, the form the API expects in query strings.
pub fn format_query_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}
