//! Builders for domain values used across tests.
//!
//! All fixtures share one fixed clock, [`now`], so features and forecasts
//! are deterministic.

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};

use crate::domain::{
    feature::FeatureSet,
    id::RepoName,
    model::{BreakoutModel, ModelSpec},
    outcome::Outcome,
    prediction::Prediction,
    telemetry::RepoTelemetry,
};

/// The reference instant: 2026-10-12 12:00 UTC.
pub fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 10, 12, 12, 0, 0)
        .single()
        .unwrap_or_default()
}

/// The run date matching [`now`].
pub fn prediction_date() -> NaiveDate {
    now().date_naive()
}

/// `days` whole days before [`now`].
pub fn created_days_ago(days: i64) -> DateTime<Utc> {
    now() - Duration::days(days)
}

/// A five-day-old repository pushed two hours ago.
pub fn telemetry(name: &str, stars: u64) -> RepoTelemetry {
    RepoTelemetry {
        full_name: RepoName::new(name),
        html_url: format!("https://github.com/{name}"),
        stars_now: stars,
        forks_now: stars / 20,
        open_issues_now: 3,
        language: "Rust".into(),
        created_at: created_days_ago(5),
        pushed_at: now() - Duration::hours(2),
    }
}

/// A prediction made on [`prediction_date`] with the default model.
pub fn prediction(name: &str, stars: u64) -> Prediction {
    let repo = telemetry(name, stars);
    let features = FeatureSet::extract(&repo, now());
    let model = BreakoutModel::new(ModelSpec::default());
    let forecast = model.forecast(&features, repo.stars_now);
    Prediction::new(prediction_date(), &repo, features, &forecast, model.tag())
}

/// An outcome for `name` predicted on `date`, scored a week later with
/// stars unchanged.
pub fn outcome(name: &str, date: NaiveDate) -> Outcome {
    let mut prediction = prediction(name, 500);
    prediction.date_utc = date;
    Outcome::score(&prediction, 500, date + Duration::days(7))
}
