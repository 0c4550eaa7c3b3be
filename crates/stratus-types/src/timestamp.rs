//! Epoch-millisecond timestamp helpers.
//!
//! The wire protocol carries timestamps as integer milliseconds since the
//! Unix epoch; these helpers convert to and from [`chrono`] types at the
//! API boundary.

use chrono::{DateTime, TimeZone, Utc};

/// The platform's epoch floor: datapoint timestamps must be strictly
/// greater than this.
pub const MIN_TIMESTAMP_MS: i64 = 0;

/// Converts a UTC instant to epoch milliseconds.
#[must_use]
pub fn to_ms(dt: DateTime<Utc>) -> i64 {
    dt.timestamp_millis()
}

/// Converts epoch milliseconds to a UTC instant. Returns `None` when the
/// value is outside chrono's representable range.
#[must_use]
pub fn from_ms(ms: i64) -> Option<DateTime<Utc>> {
    Utc.timestamp_millis_opt(ms).single()
}
