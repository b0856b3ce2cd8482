//! Date helpers for the intent-extraction prompt and validation.
//!
//! The extraction prompt tells the model what "today", "tomorrow", and
//! "next week" resolve to, so relative phrases come back as ISO dates.

use chrono::{Duration, Local, NaiveDate};

/// Today's date as `YYYY-MM-DD`.
pub fn today_iso() -> String {
    Local::now().date_naive().format("%Y-%m-%d").to_string()
}

/// Tomorrow's date as `YYYY-MM-DD`.
pub fn tomorrow_iso() -> String {
    (Local::now().date_naive() + Duration::days(1))
        .format("%Y-%m-%d")
        .to_string()
}

/// The date one week from today as `YYYY-MM-DD`.
pub fn next_week_iso() -> String {
    (Local::now().date_naive() + Duration::days(7))
        .format("%Y-%m-%d")
        .to_string()
}

/// Parse an ISO `YYYY-MM-DD` date.
pub fn parse_iso_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
}

/// Whether an ISO date string lies strictly before today.
///
/// Unparseable input returns `None` so callers can distinguish "bad format"
/// from "in the past".
pub fn is_past_date(s: &str) -> Option<bool> {
    parse_iso_date(s).map(|d| d < Local::now().date_naive())
}
