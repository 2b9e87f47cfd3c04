//! Feature extraction from repository telemetry.
//!
//! Turns a [`RepoTelemetry`] and a reference instant into the handful of
//! numeric signals the breakout model consumes. Age is floored at one day so
//! that repositories created within the last 24 hours do not explode the
//! star velocity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::telemetry::RepoTelemetry;

const SECONDS_PER_DAY: f64 = 86_400.0;

/// Minimum repository age used for velocity calculations.
pub const MIN_AGE_DAYS: f64 = 1.0;

/// Derived signals for one repository at one instant. Never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureSet {
    /// Days since creation, floored at [`MIN_AGE_DAYS`].
    pub age_days: f64,
    /// Days since the last push, floored at zero.
    pub since_push_days: f64,
    /// `stars_now / age_days`.
    pub stars_per_day: f64,
    pub forks_now: u64,
    pub open_issues_now: u64,
    pub language: String,
}

impl FeatureSet {
    /// Extract features from a telemetry snapshot as of `now`.
    #[must_use]
    pub fn extract(telemetry: &RepoTelemetry, now: DateTime<Utc>) -> Self {
        let age_days = days_between(telemetry.created_at, now).max(MIN_AGE_DAYS);
        let since_push_days = days_between(telemetry.pushed_at, now).max(0.0);
        let stars_per_day = telemetry.stars_now as f64 / age_days;

        Self {
            age_days,
            since_push_days,
            stars_per_day,
            forks_now: telemetry.forks_now,
            open_issues_now: telemetry.open_issues_now,
            language: telemetry.language.clone(),
        }
    }
}

fn days_between(earlier: DateTime<Utc>, later: DateTime<Utc>) -> f64 {
    let millis = (later - earlier).num_milliseconds() as f64;
    millis / 1000.0 / SECONDS_PER_DAY
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::id::RepoName;
    use chrono::{Duration, TimeZone};

    fn telemetry(
        stars: u64,
        age: Duration,
        since_push: Duration,
    ) -> (RepoTelemetry, DateTime<Utc>) {
        let now = Utc.with_ymd_and_hms(2026, 10, 19, 0, 0, 0).unwrap();
        let t = RepoTelemetry {
            full_name: RepoName::new("o/r"),
            html_url: "https://github.com/o/r".into(),
            stars_now: stars,
            forks_now: 7,
            open_issues_now: 3,
            language: "Rust".into(),
            created_at: now - age,
            pushed_at: now - since_push,
        };
        (t, now)
    }

    #[test]
    fn velocity_is_stars_over_age() {
        let (t, now) = telemetry(1000, Duration::days(10), Duration::hours(12));
        let f = FeatureSet::extract(&t, now);

        assert!((f.age_days - 10.0).abs() < 1e-9);
        assert!((f.since_push_days - 0.5).abs() < 1e-9);
        assert!((f.stars_per_day - 100.0).abs() < 1e-9);
        assert_eq!(f.forks_now, 7);
        assert_eq!(f.open_issues_now, 3);
        assert_eq!(f.language, "Rust");
    }

    #[test]
    fn brand_new_repo_is_floored_to_one_day() {
        let (t, now) = telemetry(300, Duration::hours(2), Duration::minutes(5));
        let f = FeatureSet::extract(&t, now);

        assert_eq!(f.age_days, 1.0);
        assert!((f.stars_per_day - 300.0).abs() < 1e-9);
    }

    #[test]
    fn push_in_the_future_floors_at_zero() {
        let (mut t, now) = telemetry(10, Duration::days(3), Duration::zero());
        t.pushed_at = now + Duration::minutes(10);
        let f = FeatureSet::extract(&t, now);

        assert_eq!(f.since_push_days, 0.0);
    }
}
