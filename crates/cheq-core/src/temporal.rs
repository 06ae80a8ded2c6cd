//! # Temporal Types — UTC-Only Timestamps
//!
//! Defines `Timestamp`, a UTC-only timestamp type truncated to seconds
//! precision and rendered as ISO8601 with a `Z` suffix.
//!
//! Audit entries and state transitions are stamped with this type so a
//! replayed trail renders identically regardless of the host timezone.
//! Non-UTC inputs are rejected at construction rather than silently
//! converted.

use chrono::{DateTime, Timelike, Utc};
use serde::{Deserialize, Serialize};

use crate::error::CheqError;

/// A UTC-only timestamp, truncated to seconds precision.
///
/// # Construction
///
/// - [`Timestamp::now()`] — current UTC time, truncated.
/// - [`Timestamp::from_utc()`] — from a `DateTime<Utc>`, truncating sub-seconds.
/// - [`Timestamp::parse()`] — from an ISO8601 string, rejecting non-UTC offsets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Create a timestamp from the current UTC time, truncated to seconds.
    pub fn now() -> Self {
        Self(truncate_to_seconds(Utc::now()))
    }

    /// Create a timestamp from a `chrono::DateTime<Utc>`, truncating sub-seconds.
    pub fn from_utc(dt: DateTime<Utc>) -> Self {
        Self(truncate_to_seconds(dt))
    }

    /// Parse a timestamp from an RFC 3339 / ISO8601 string.
    ///
    /// Only timestamps with the `Z` suffix are accepted. Explicit offsets
    /// like `+00:00` or `+05:30` are rejected, even when semantically
    /// equivalent to UTC.
    ///
    /// # Errors
    ///
    /// Returns [`CheqError::InvalidTimestamp`] if the string is not valid
    /// RFC 3339 or uses a non-Z offset.
    pub fn parse(s: &str) -> Result<Self, CheqError> {
        if !s.ends_with('Z') {
            return Err(CheqError::InvalidTimestamp(format!(
                "timestamp must use Z suffix (UTC only), got: {s:?}"
            )));
        }

        let dt = DateTime::parse_from_rfc3339(s)
            .map_err(|e| CheqError::InvalidTimestamp(format!("{s:?}: {e}")))?;

        Ok(Self(truncate_to_seconds(dt.with_timezone(&Utc))))
    }

    /// Access the inner `DateTime<Utc>`.
    pub fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }

    /// Render as ISO8601 with Z suffix (e.g., `2026-01-15T12:00:00Z`).
    pub fn to_iso8601(&self) -> String {
        self.0.format("%Y-%m-%dT%H:%M:%SZ").to_string()
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_iso8601())
    }
}

/// Truncate a `DateTime<Utc>` to seconds precision (discard nanoseconds).
fn truncate_to_seconds(dt: DateTime<Utc>) -> DateTime<Utc> {
    dt.with_nanosecond(0).unwrap_or(dt)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_now_has_no_subseconds() {
        let ts = Timestamp::now();
        assert_eq!(ts.as_datetime().nanosecond(), 0);
    }

    #[test]
    fn test_from_utc_truncates() {
        let dt = Utc.with_ymd_and_hms(2026, 1, 15, 12, 30, 45).unwrap();
        let dt_with_nanos = dt.with_nanosecond(123_456_789).unwrap();
        let ts = Timestamp::from_utc(dt_with_nanos);
        assert_eq!(ts.as_datetime().nanosecond(), 0);
        assert_eq!(ts.to_iso8601(), "2026-01-15T12:30:45Z");
    }

    #[test]
    fn test_parse_z_suffix_accepted() {
        let ts = Timestamp::parse("2026-01-15T12:00:00Z").unwrap();
        assert_eq!(ts.to_iso8601(), "2026-01-15T12:00:00Z");
    }

    #[test]
    fn test_parse_offset_rejected() {
        assert!(Timestamp::parse("2026-01-15T12:00:00+00:00").is_err());
        assert!(Timestamp::parse("2026-01-15T17:00:00+05:00").is_err());
    }

    #[test]
    fn test_parse_invalid_format() {
        assert!(Timestamp::parse("not-a-date").is_err());
        assert!(Timestamp::parse("2026-01-15").is_err());
        assert!(Timestamp::parse("").is_err());
    }

    #[test]
    fn test_ordering() {
        let earlier = Timestamp::parse("2026-01-15T12:00:00Z").unwrap();
        let later = Timestamp::parse("2026-01-15T12:00:01Z").unwrap();
        assert!(earlier < later);
    }

    #[test]
    fn test_display_matches_iso8601() {
        let ts = Timestamp::parse("2026-06-30T23:59:59Z").unwrap();
        assert_eq!(format!("{ts}"), "2026-06-30T23:59:59Z");
    }

    #[test]
    fn test_serde_roundtrip() {
        let ts = Timestamp::parse("2026-01-15T12:00:00Z").unwrap();
        let json = serde_json::to_string(&ts).unwrap();
        let parsed: Timestamp = serde_json::from_str(&json).unwrap();
        assert_eq!(ts, parsed);
    }
}
