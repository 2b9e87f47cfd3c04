//! Dated prediction records.
//!
//! A [`Prediction`] is created once per repository per run date and never
//! changes afterwards. It is identified by `(date_utc, full_name)`.

use std::cmp::Ordering;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::feature::FeatureSet;
use super::id::RepoName;
use super::model::Forecast;
use super::telemetry::RepoTelemetry;

/// Decimal places kept for the published probability.
const PROBABILITY_DECIMALS: i32 = 4;

/// Decimal places kept for the recorded fractional features.
const FEATURE_DECIMALS: i32 = 3;

/// One repository's 7-day breakout forecast made on `date_utc`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub date_utc: NaiveDate,
    pub full_name: RepoName,
    pub html_url: String,
    pub stars_now: u64,
    pub breakout_threshold_7d: u64,
    pub p_breakout_7d: f64,
    pub stars_pred_7d: u64,
    pub stars_pred_low_7d: u64,
    pub stars_pred_high_7d: u64,
    pub features: FeatureSet,
    pub model_tag: String,
}

impl Prediction {
    /// Assemble a prediction from its telemetry, features and forecast.
    ///
    /// The probability and the fractional features are recorded at the
    /// published precision; the star forecast was already computed from the
    /// unrounded values.
    #[must_use]
    pub fn new(
        date_utc: NaiveDate,
        telemetry: &RepoTelemetry,
        features: FeatureSet,
        forecast: &Forecast,
        model_tag: &str,
    ) -> Self {
        Self {
            date_utc,
            full_name: telemetry.full_name.clone(),
            html_url: telemetry.html_url.clone(),
            stars_now: telemetry.stars_now,
            breakout_threshold_7d: forecast.breakout_threshold,
            p_breakout_7d: round_to(forecast.p_breakout, PROBABILITY_DECIMALS),
            stars_pred_7d: forecast.point,
            stars_pred_low_7d: forecast.low,
            stars_pred_high_7d: forecast.high,
            features: FeatureSet {
                age_days: round_to(features.age_days, FEATURE_DECIMALS),
                since_push_days: round_to(features.since_push_days, FEATURE_DECIMALS),
                stars_per_day: round_to(features.stars_per_day, FEATURE_DECIMALS),
                ..features
            },
            model_tag: model_tag.to_string(),
        }
    }

    /// Probability as a whole percentage for display.
    #[must_use]
    pub fn probability_percent(&self) -> u32 {
        (100.0 * self.p_breakout_7d).round() as u32
    }
}

/// All predictions produced by one run, in discovery order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PredictionBatch {
    date_utc: NaiveDate,
    predictions: Vec<Prediction>,
}

impl PredictionBatch {
    #[must_use]
    pub fn new(date_utc: NaiveDate, predictions: Vec<Prediction>) -> Self {
        Self {
            date_utc,
            predictions,
        }
    }

    #[must_use]
    pub const fn date_utc(&self) -> NaiveDate {
        self.date_utc
    }

    #[must_use]
    pub fn predictions(&self) -> &[Prediction] {
        &self.predictions
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.predictions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.predictions.is_empty()
    }

    /// The `n` most likely breakouts, highest probability first.
    ///
    /// Ties keep discovery order.
    #[must_use]
    pub fn top_by_probability(&self, n: usize) -> Vec<&Prediction> {
        let mut ranked: Vec<&Prediction> = self.predictions.iter().collect();
        ranked.sort_by(|a, b| {
            b.p_breakout_7d
                .partial_cmp(&a.p_breakout_7d)
                .unwrap_or(Ordering::Equal)
        });
        ranked.truncate(n);
        ranked
    }
}

pub(crate) fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prediction(name: &str, p: f64) -> Prediction {
        Prediction {
            date_utc: NaiveDate::from_ymd_opt(2026, 10, 12).unwrap(),
            full_name: RepoName::new(name),
            html_url: format!("https://github.com/{name}"),
            stars_now: 100,
            breakout_threshold_7d: 200,
            p_breakout_7d: p,
            stars_pred_7d: 150,
            stars_pred_low_7d: 100,
            stars_pred_high_7d: 200,
            features: FeatureSet {
                age_days: 2.0,
                since_push_days: 0.0,
                stars_per_day: 50.0,
                forks_now: 1,
                open_issues_now: 0,
                language: "Go".into(),
            },
            model_tag: "heuristic_logistic_v1".into(),
        }
    }

    #[test]
    fn top_by_probability_ranks_descending_and_truncates() {
        let batch = PredictionBatch::new(
            NaiveDate::from_ymd_opt(2026, 10, 12).unwrap(),
            vec![
                prediction("a/low", 0.1),
                prediction("a/high", 0.9),
                prediction("a/mid", 0.5),
                prediction("a/mid2", 0.5),
            ],
        );

        let top: Vec<_> = batch
            .top_by_probability(3)
            .iter()
            .map(|p| p.full_name.as_str())
            .collect();
        assert_eq!(top, vec!["a/high", "a/mid", "a/mid2"]);
    }

    #[test]
    fn probability_percent_rounds() {
        assert_eq!(prediction("a/b", 0.8866).probability_percent(), 89);
        assert_eq!(prediction("a/b", 0.0).probability_percent(), 0);
    }

    #[test]
    fn recorded_features_are_rounded_but_forecast_is_not() {
        let telemetry = crate::testkit::domain::telemetry("acme/rocket", 1000);
        let features = FeatureSet {
            age_days: 3.141_592,
            since_push_days: 0.083_333,
            stars_per_day: 318.309_886,
            forks_now: 50,
            open_issues_now: 3,
            language: "Rust".into(),
        };
        let model = crate::domain::model::BreakoutModel::default();
        let forecast = model.forecast(&features, telemetry.stars_now);

        let p = Prediction::new(
            NaiveDate::from_ymd_opt(2026, 10, 12).unwrap(),
            &telemetry,
            features,
            &forecast,
            model.tag(),
        );

        assert_eq!(p.features.age_days, 3.142);
        assert_eq!(p.features.since_push_days, 0.083);
        assert_eq!(p.features.stars_per_day, 318.31);
        assert_eq!(p.features.forks_now, 50);
        assert_eq!(p.stars_pred_7d, forecast.point);
    }

    #[test]
    fn round_to_keeps_requested_precision() {
        assert_eq!(round_to(0.886_562, 4), 0.8866);
        assert_eq!(round_to(1.0, 4), 1.0);
    }
}
