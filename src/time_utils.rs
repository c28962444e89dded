// SPDX-License-Identifier: MIT
// Copyright 2026 The RunZa Authors

//! Shared helpers for date/time formatting.
//!
//! Stored timestamps use fixed-width RFC3339 with microseconds so that
//! comparing the text in SQL matches comparing the instants.

use chrono::{DateTime, Days, NaiveDate, SecondsFormat, Utc};

/// Format a UTC timestamp for storage (`2024-01-15T10:30:00.000000Z`).
pub fn format_db_timestamp(date: DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Current time, formatted for storage.
pub fn now_db_timestamp() -> String {
    format_db_timestamp(Utc::now())
}

/// Calendar-day key (`YYYY-MM-DD`) used by the daily stats ledger.
pub fn day_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Day key `days` before `date`, saturating at the calendar minimum.
pub fn day_key_before(date: NaiveDate, days: u64) -> String {
    day_key(date.checked_sub_days(Days::new(days)).unwrap_or(NaiveDate::MIN))
}
