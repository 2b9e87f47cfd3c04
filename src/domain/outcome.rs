//! Realized outcomes and per-date scoring summaries.
//!
//! An [`Outcome`] reconciles one [`Prediction`] with the star count observed
//! a horizon later. Outcomes are append-only: each `(prediction_date,
//! full_name)` key is scored exactly once.
//!
//! # Examples
//!
//! ```
//! use repopulse::domain::outcome::brier;
//!
//! assert!((brier(0.886, true) - 0.013).abs() < 1e-3);
//! assert_eq!(brier(0.25, false), 0.0625);
//! ```

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::id::RepoName;
use super::prediction::{round_to, Prediction};

const BRIER_DECIMALS: i32 = 6;
const MAE_DECIMALS: i32 = 3;
const RATE_DECIMALS: i32 = 4;

/// Squared error between a probability and a binary outcome.
#[must_use]
pub fn brier(p: f64, happened: bool) -> f64 {
    let y = if happened { 1.0 } else { 0.0 };
    (p - y).powi(2)
}

/// Ledger key: one outcome per repository per prediction date.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OutcomeKey {
    pub prediction_date: NaiveDate,
    pub full_name: RepoName,
}

/// The realized result of one prediction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Outcome {
    pub prediction_date_utc: NaiveDate,
    pub scored_date_utc: NaiveDate,
    pub full_name: RepoName,
    pub html_url: String,
    pub stars_at_prediction: u64,
    pub stars_after_7d: u64,
    pub delta_stars: i64,
    pub breakout_threshold: u64,
    pub breakout_actual: bool,
    pub p_breakout_7d: f64,
    pub brier_score: f64,
    pub stars_pred_7d: u64,
    pub stars_pred_low_7d: u64,
    pub stars_pred_high_7d: u64,
    pub within_band: bool,
    pub abs_error_stars: u64,
    pub model_tag: String,
}

impl Outcome {
    /// Score `prediction` against the star count observed on `scored_date`.
    #[must_use]
    pub fn score(prediction: &Prediction, stars_after: u64, scored_date: NaiveDate) -> Self {
        let delta_stars = stars_after as i64 - prediction.stars_now as i64;
        let breakout_actual = delta_stars >= prediction.breakout_threshold_7d as i64;
        let brier_score = round_to(
            brier(prediction.p_breakout_7d, breakout_actual),
            BRIER_DECIMALS,
        );

        Self {
            prediction_date_utc: prediction.date_utc,
            scored_date_utc: scored_date,
            full_name: prediction.full_name.clone(),
            html_url: prediction.html_url.clone(),
            stars_at_prediction: prediction.stars_now,
            stars_after_7d: stars_after,
            delta_stars,
            breakout_threshold: prediction.breakout_threshold_7d,
            breakout_actual,
            p_breakout_7d: prediction.p_breakout_7d,
            brier_score,
            stars_pred_7d: prediction.stars_pred_7d,
            stars_pred_low_7d: prediction.stars_pred_low_7d,
            stars_pred_high_7d: prediction.stars_pred_high_7d,
            within_band: (prediction.stars_pred_low_7d..=prediction.stars_pred_high_7d)
                .contains(&stars_after),
            abs_error_stars: stars_after.abs_diff(prediction.stars_pred_7d),
            model_tag: prediction.model_tag.clone(),
        }
    }

    #[must_use]
    pub fn key(&self) -> OutcomeKey {
        OutcomeKey {
            prediction_date: self.prediction_date_utc,
            full_name: self.full_name.clone(),
        }
    }
}

/// Calibration summary for one prediction date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreSummary {
    pub prediction_date_utc: NaiveDate,
    pub scored_date_utc: NaiveDate,
    /// Outcomes on the ledger for this prediction date.
    pub n: usize,
    /// Outcomes appended by this run.
    pub newly_scored: usize,
    /// Predictions that could not be scored (repository gone or fetch failed).
    pub skipped: usize,
    pub mean_brier: f64,
    pub mean_mae_stars: f64,
    pub breakouts_actual: usize,
    pub mean_p_breakout: f64,
    /// Share of outcomes that landed inside the forecast interval.
    pub band_coverage: f64,
}

impl ScoreSummary {
    /// Summarize every ledger outcome for `prediction_date`.
    ///
    /// An empty slice yields zero means (division floor of one).
    #[must_use]
    pub fn from_outcomes(
        prediction_date: NaiveDate,
        scored_date: NaiveDate,
        outcomes: &[Outcome],
        newly_scored: usize,
        skipped: usize,
    ) -> Self {
        let n = outcomes.len();
        let denom = n.max(1) as f64;
        let brier_sum: f64 = outcomes.iter().map(|o| o.brier_score).sum();
        let mae_sum: f64 = outcomes.iter().map(|o| o.abs_error_stars as f64).sum();
        let p_sum: f64 = outcomes.iter().map(|o| o.p_breakout_7d).sum();
        let covered = outcomes.iter().filter(|o| o.within_band).count();

        Self {
            prediction_date_utc: prediction_date,
            scored_date_utc: scored_date,
            n,
            newly_scored,
            skipped,
            mean_brier: round_to(brier_sum / denom, BRIER_DECIMALS),
            mean_mae_stars: round_to(mae_sum / denom, MAE_DECIMALS),
            breakouts_actual: outcomes.iter().filter(|o| o.breakout_actual).count(),
            mean_p_breakout: round_to(p_sum / denom, RATE_DECIMALS),
            band_coverage: round_to(covered as f64 / denom, RATE_DECIMALS),
        }
    }
}
