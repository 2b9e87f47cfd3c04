//! Point-in-time repository telemetry.
//!
//! A [`RepoTelemetry`] is the immutable snapshot the telemetry provider returns
//! for one repository. Everything the forecast knows about a repository flows
//! from here.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::error::DomainError;
use super::id::RepoName;

/// Language recorded when the provider reports none.
pub const UNKNOWN_LANGUAGE: &str = "Unknown";

/// Observable attributes of a repository at one instant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepoTelemetry {
    pub full_name: RepoName,
    pub html_url: String,
    pub stars_now: u64,
    pub forks_now: u64,
    pub open_issues_now: u64,
    pub language: String,
    pub created_at: DateTime<Utc>,
    pub pushed_at: DateTime<Utc>,
}

/// Telemetry as recorded in a dated snapshot batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub date_utc: NaiveDate,
    #[serde(flatten)]
    pub telemetry: RepoTelemetry,
}

impl Snapshot {
    #[must_use]
    pub fn new(date_utc: NaiveDate, telemetry: RepoTelemetry) -> Self {
        Self {
            date_utc,
            telemetry,
        }
    }
}

/// Normalize an optional language into the recorded form.
#[must_use]
pub fn language_or_unknown(language: Option<String>) -> String {
    match language {
        Some(lang) if !lang.trim().is_empty() => lang,
        _ => UNKNOWN_LANGUAGE.to_string(),
    }
}

/// Parse an RFC 3339 timestamp (`Z` suffix included) into UTC.
///
/// # Errors
///
/// Returns [`DomainError::InvalidTimestamp`] naming the field on failure.
pub fn parse_timestamp(field: &'static str, value: &str) -> Result<DateTime<Utc>, DomainError> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| DomainError::InvalidTimestamp {
            field,
            value: value.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn parses_github_style_timestamps() {
        let dt = parse_timestamp("created_at", "2026-10-01T12:30:00Z").unwrap();
        assert_eq!(dt, Utc.with_ymd_and_hms(2026, 10, 1, 12, 30, 0).unwrap());
    }

    #[test]
    fn malformed_timestamp_is_an_error_not_a_default() {
        let err = parse_timestamp("pushed_at", "yesterday").unwrap_err();
        assert_eq!(
            err,
            DomainError::InvalidTimestamp {
                field: "pushed_at",
                value: "yesterday".into()
            }
        );
    }

    #[test]
    fn missing_language_becomes_unknown() {
        assert_eq!(language_or_unknown(None), "Unknown");
        assert_eq!(language_or_unknown(Some(" ".into())), "Unknown");
        assert_eq!(language_or_unknown(Some("Rust".into())), "Rust");
    }
}
