use chrono::{DateTime, Utc};

/// Get current Unix timestamp in UTC (milliseconds)
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Current wall-clock time as an ISO 8601 (RFC 3339) string
pub fn now_rfc3339() -> String {
    Utc::now().to_rfc3339()
}

/// Convert a millisecond Unix timestamp to an ISO 8601 (RFC 3339) string
pub fn millis_to_rfc3339(millis: i64) -> String {
    DateTime::<Utc>::from_timestamp_millis(millis)
        .map(|dt| dt.to_rfc3339())
        .unwrap_or_default()
}
