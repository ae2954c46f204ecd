//! Stored expiry dates and their normalization.
//!
//! Pantry items written by older clients carry their expiry as an ISO-8601
//! string, newer ones as a native timestamp. Both are normalized to a
//! single `DateTime<Utc>` when an item is loaded.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

/// Expiry as it was stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ExpiryDate {
    /// Native timestamp.
    Timestamp(DateTime<Utc>),
    /// Free-form text, expected to be ISO-8601.
    Text(String),
}

impl ExpiryDate {
    /// Normalize to a UTC instant. Unparseable text yields `None`.
    pub fn normalize(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::Timestamp(at) => Some(*at),
            Self::Text(raw) => parse_text(raw),
        }
    }
}

impl From<DateTime<Utc>> for ExpiryDate {
    fn from(at: DateTime<Utc>) -> Self {
        Self::Timestamp(at)
    }
}

/// Parse an ISO-8601 expiry string.
///
/// Accepts RFC 3339, a naive date-time (taken as UTC), or a bare date
/// (midnight UTC).
pub fn parse_text(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(at) = DateTime::parse_from_rfc3339(raw) {
        return Some(at.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_timestamp_passes_through() {
        let at = Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap();
        assert_eq!(ExpiryDate::Timestamp(at).normalize(), Some(at));
    }

    #[test]
    fn test_rfc3339_with_offset() {
        let parsed = parse_text("2024-05-01T12:00:00+02:00").unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap());
    }

    #[test]
    fn test_javascript_iso_string() {
        let parsed = parse_text("2024-05-01T10:00:00.000Z").unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap());
    }

    #[test]
    fn test_naive_datetime_is_utc() {
        let parsed = parse_text("2024-05-01T10:00:00").unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap());
    }

    #[test]
    fn test_bare_date_is_midnight() {
        let parsed = parse_text("2024-05-01").unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_garbage_is_none() {
        assert_eq!(ExpiryDate::Text("next tuesday".into()).normalize(), None);
        assert_eq!(ExpiryDate::Text(String::new()).normalize(), None);
    }

    #[test]
    fn test_untagged_deserialize() {
        let ts: ExpiryDate = serde_json::from_str("\"2024-05-01T10:00:00Z\"").unwrap();
        assert!(matches!(ts, ExpiryDate::Timestamp(_)));
        let text: ExpiryDate = serde_json::from_str("\"2024-05-01\"").unwrap();
        assert_eq!(text, ExpiryDate::Text("2024-05-01".into()));
    }
}
