//! Date/time utilities for Memwall.
//!
//! Timestamps are stored in the database as UTC TEXT columns in
//! `YYYY-MM-DD HH:MM:SS` format; these helpers produce and parse that form.

use chrono::{DateTime, Duration, NaiveDateTime, Utc};

/// Storage format for timestamps.
pub const STORAGE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Current UTC time in storage format.
pub fn now_string() -> String {
    Utc::now().format(STORAGE_FORMAT).to_string()
}

/// UTC time `days` days from now, in storage format.
pub fn days_from_now_string(days: i64) -> String {
    (Utc::now() + Duration::days(days))
        .format(STORAGE_FORMAT)
        .to_string()
}

/// Parse a storage-format timestamp back into a UTC datetime.
///
/// Returns `None` if the string does not match the storage format.
pub fn parse_storage(datetime_str: &str) -> Option<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(datetime_str, STORAGE_FORMAT)
        .ok()
        .map(|naive| naive.and_utc())
}
