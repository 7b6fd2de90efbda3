//! # Temporal Types — UTC-Only Timestamps
//!
//! Defines [`Timestamp`], the type behind `createdAt` and `updatedAt`.
//! Values are UTC, truncated to whole seconds, and render as
//! `YYYY-MM-DDTHH:MM:SSZ`.
//!
//! Supplied timestamps must carry the `Z` suffix. Explicit offsets, even
//! `+00:00`, are rejected so that a record's mapping view has exactly one
//! textual form per instant.

use chrono::{DateTime, Timelike, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::JobError;

/// A UTC-only timestamp, truncated to seconds precision.
///
/// # Construction
///
/// - [`Timestamp::now()`] — current UTC time, truncated.
/// - [`Timestamp::from_utc()`] — from a `DateTime<Utc>`, truncating sub-seconds.
/// - [`Timestamp::parse()`] — from an RFC 3339 string, rejecting non-`Z` offsets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
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

    /// Parse a timestamp from an RFC 3339 string with a `Z` suffix.
    ///
    /// # Errors
    ///
    /// Returns [`JobError::SchemaViolation`] if the string is not valid
    /// RFC 3339 or uses an offset other than `Z`.
    pub fn parse(s: &str) -> Result<Self, JobError> {
        parse_utc(s).map(Self).map_err(JobError::schema)
    }

    /// Access the inner `DateTime<Utc>`.
    pub fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }

    /// Render as ISO 8601 with Z suffix (e.g., `2026-01-15T12:00:00Z`).
    pub fn to_iso8601(&self) -> String {
        self.0.format("%Y-%m-%dT%H:%M:%SZ").to_string()
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_iso8601())
    }
}

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_iso8601())
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse_utc(&raw).map(Self).map_err(serde::de::Error::custom)
    }
}

/// Parse a `Z`-suffixed RFC 3339 string, returning the bare failure reason.
fn parse_utc(s: &str) -> Result<DateTime<Utc>, String> {
    if !s.ends_with('Z') {
        return Err(format!("timestamp must use Z suffix (UTC only), got: {s:?}"));
    }

    let dt = DateTime::parse_from_rfc3339(s)
        .map_err(|e| format!("invalid RFC 3339 timestamp {s:?}: {e}"))?;

    Ok(truncate_to_seconds(dt.with_timezone(&Utc)))
}

fn truncate_to_seconds(dt: DateTime<Utc>) -> DateTime<Utc> {
    dt.with_nanosecond(0).unwrap_or(dt)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn now_has_no_subseconds() {
        let ts = Timestamp::now();
        assert_eq!(ts.as_datetime().nanosecond(), 0);
    }

    #[test]
    fn from_utc_truncates() {
        let dt = Utc
            .with_ymd_and_hms(2026, 10, 16, 9, 30, 45)
            .unwrap()
            .with_nanosecond(987_654_321)
            .unwrap();
        let ts = Timestamp::from_utc(dt);
        assert_eq!(ts.to_iso8601(), "2026-10-16T09:30:45Z");
    }

    #[test]
    fn parse_accepts_z_suffix() {
        let ts = Timestamp::parse("2026-10-16T09:30:00Z").unwrap();
        assert_eq!(ts.to_string(), "2026-10-16T09:30:00Z");
    }

    #[test]
    fn parse_rejects_offsets() {
        assert!(Timestamp::parse("2026-10-16T09:30:00+00:00").is_err());
        assert!(Timestamp::parse("2026-10-16T14:30:00+05:00").is_err());
    }

    #[test]
    fn parse_rejects_garbage() {
        let err = Timestamp::parse("yesterday").unwrap_err();
        assert!(matches!(err, JobError::SchemaViolation { .. }));
        assert!(Timestamp::parse("").is_err());
    }

    #[test]
    fn parse_truncates_fraction() {
        let ts = Timestamp::parse("2026-10-16T09:30:00.250Z").unwrap();
        assert_eq!(ts.as_datetime().nanosecond(), 0);
    }

    #[test]
    fn serializes_as_iso_string() {
        let ts = Timestamp::parse("2026-10-16T09:30:00Z").unwrap();
        assert_eq!(
            serde_json::to_value(ts).unwrap(),
            serde_json::json!("2026-10-16T09:30:00Z")
        );
    }

    #[test]
    fn deserialize_rejects_offset() {
        let result: Result<Timestamp, _> = serde_json::from_str("\"2026-10-16T09:30:00-04:00\"");
        assert!(result.is_err());
    }

    #[test]
    fn deserialize_error_carries_bare_reason() {
        let err = serde_json::from_str::<Timestamp>("\"2026-02-30T00:00:00Z\"").unwrap_err();
        let message = err.to_string();
        assert!(message.starts_with("invalid RFC 3339 timestamp"), "{message}");
        assert!(!message.contains("schema violation"), "{message}");
    }

    #[test]
    fn parse_rejects_impossible_date() {
        let err = Timestamp::parse("2026-02-30T00:00:00Z").unwrap_err();
        assert_eq!(err.field(), None);
        assert!(err.to_string().starts_with("schema violation: invalid RFC 3339"));
    }

    #[test]
    fn ordering_follows_time() {
        let a = Timestamp::parse("2026-10-16T09:30:00Z").unwrap();
        let b = Timestamp::parse("2026-10-16T09:30:01Z").unwrap();
        assert!(a < b);
    }
}
