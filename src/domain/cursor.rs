//! Source cursor type
//!
//! The cursor is a scalar epoch-millisecond timestamp reflecting how far into
//! the source record stream the pipeline has consumed. The persisted value of
//! the cursor (the checkpoint) is the only durable progress marker; it is read
//! at pipeline start and advanced only after a batch has been fully committed.

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Monotonically non-decreasing position in the source record stream
///
/// Wraps the epoch-millisecond timestamp of the most recently consumed source
/// record. Ordering and equality follow the underlying integer, so cursors can
/// be compared, checkpointed and restored directly.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct SourceCursor(i64);

impl SourceCursor {
    /// Cursor before any record has been consumed
    pub const ZERO: SourceCursor = SourceCursor(0);

    /// Create a cursor from an epoch-millisecond timestamp
    pub fn from_millis(millis: i64) -> Self {
        SourceCursor(millis)
    }

    /// The underlying epoch-millisecond value
    pub fn as_millis(&self) -> i64 {
        self.0
    }

    /// The cursor as a UTC timestamp, if representable
    pub fn as_datetime(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_millis_opt(self.0).single()
    }
}

impl fmt::Display for SourceCursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for SourceCursor {
    fn from(millis: i64) -> Self {
        SourceCursor(millis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cursor_ordering() {
        let earlier = SourceCursor::from_millis(1_000);
        let later = SourceCursor::from_millis(2_000);

        assert!(earlier < later);
        assert_eq!(earlier.max(later), later);
    }

    #[test]
    fn test_cursor_default_is_zero() {
        assert_eq!(SourceCursor::default(), SourceCursor::ZERO);
    }

    #[test]
    fn test_cursor_datetime_conversion() {
        let cursor = SourceCursor::from_millis(1_700_000_000_000);
        let dt = cursor.as_datetime().unwrap();
        assert_eq!(dt.timestamp_millis(), 1_700_000_000_000);
    }

    #[test]
    fn test_cursor_serialization_is_transparent() {
        let cursor = SourceCursor::from_millis(42);
        let json = serde_json::to_string(&cursor).unwrap();
        assert_eq!(json, "42");

        let back: SourceCursor = serde_json::from_str(&json).unwrap();
        assert_eq!(back, cursor);
    }
}
