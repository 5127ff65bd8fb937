//! Clock abstraction and JST formatting helpers.
//!
//! Every timestamp the server produces (connection open time, question submission time) is a
//! Unix timestamp in milliseconds. Registration timestamps sent by clients use the same unit so
//! that tabs opened by the same browser profile compare numerically.

use chrono::{DateTime, FixedOffset, Utc};

/// JST is UTC+9.
const JST_OFFSET_SECS: i32 = 9 * 3600;

/// Clock trait for dependency injection and testing
pub trait Clock: Send + Sync {
    /// Current Unix timestamp in milliseconds
    fn now_millis(&self) -> i64;
}

/// System clock implementation (uses actual system time)
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> i64 {
        get_jst_timestamp()
    }
}

/// Fixed clock implementation for testing (returns a fixed time)
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    fixed_time: i64,
}

impl FixedClock {
    /// Create a new fixed clock with the given timestamp
    pub fn new(fixed_time_millis: i64) -> Self {
        Self {
            fixed_time: fixed_time_millis,
        }
    }
}

impl Clock for FixedClock {
    fn now_millis(&self) -> i64 {
        self.fixed_time
    }
}

fn jst() -> Option<FixedOffset> {
    FixedOffset::east_opt(JST_OFFSET_SECS)
}

/// Get current Unix timestamp (milliseconds), taken from the JST clock
pub fn get_jst_timestamp() -> i64 {
    match jst() {
        Some(offset) => {
            let now_jst: DateTime<FixedOffset> = Utc::now().with_timezone(&offset);
            now_jst.timestamp_millis()
        }
        None => Utc::now().timestamp_millis(),
    }
}

/// Convert a Unix timestamp (milliseconds) to JST RFC 3339 format.
///
/// Out-of-range timestamps render as an empty string.
pub fn timestamp_to_jst_rfc3339(timestamp_millis: i64) -> String {
    match (jst(), DateTime::from_timestamp_millis(timestamp_millis)) {
        (Some(offset), Some(dt)) => dt.with_timezone(&offset).to_rfc3339(),
        _ => String::new(),
    }
}
