//! Time utilities
//!
//! Repositories and models store timestamps as `i64` Unix millis.

/// Current UTC timestamp in milliseconds
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Timestamp `hours` hours from now, in milliseconds
pub fn hours_from_now_millis(hours: i64) -> i64 {
    now_millis() + hours * 60 * 60 * 1000
}
