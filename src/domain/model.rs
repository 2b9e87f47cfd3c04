//! The breakout model: features in, probability and star forecast out.
//!
//! This is a fixed, hand-specified heuristic, not a learned artifact. The
//! coefficient set is versioned by [`ModelSpec::tag`]; any change to a
//! coefficient must come with a new tag so that ledger rows from different
//! model variants never mix silently.
//!
//! # Formulas
//!
//! ```text
//! z         = 0.9·log10(stars_per_day + 0.01) − 0.25·since_push_days + 0.15·log10(forks + 1)
//! p         = clamp(sigmoid(z), 0, 1)
//! threshold = max(200, round(0.5·stars_now))
//! point     = round(stars_now + 7·stars_per_day·(0.8 + 0.6·p))
//! band      = round(max(25, 0.25·threshold·(1 − p)))
//! interval  = [max(0, point − band), point + band]
//! ```
//!
//! # Examples
//!
//! ```
//! use repopulse::domain::feature::FeatureSet;
//! use repopulse::domain::model::BreakoutModel;
//!
//! let features = FeatureSet {
//!     age_days: 10.0,
//!     since_push_days: 0.0,
//!     stars_per_day: 100.0,
//!     forks_now: 50,
//!     open_issues_now: 4,
//!     language: "Rust".into(),
//! };
//!
//! let forecast = BreakoutModel::default().forecast(&features, 1000);
//! assert_eq!(forecast.breakout_threshold, 500);
//! assert_eq!((forecast.low, forecast.point, forecast.high), (1907, 1932, 1957));
//! ```

use serde::{Deserialize, Serialize};

use super::error::DomainError;
use super::feature::FeatureSet;

/// Tag of the baseline coefficient set.
pub const DEFAULT_MODEL_TAG: &str = "heuristic_logistic_v1";

/// Coefficients of the heuristic logistic model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Coefficients {
    /// Weight on `log10(stars_per_day + velocity_offset)`.
    pub velocity_weight: f64,
    pub velocity_offset: f64,
    /// Penalty per day since the last push.
    pub staleness_weight: f64,
    /// Weight on `log10(forks + forks_offset)`.
    pub forks_weight: f64,
    pub forks_offset: f64,
    /// Absolute breakout floor in stars.
    pub threshold_floor: u64,
    /// Relative breakout floor as a fraction of current stars.
    pub threshold_fraction: f64,
    /// Forecast horizon in days.
    pub horizon_days: u32,
    /// Growth multiplier at `p = 0`.
    pub growth_base: f64,
    /// Extra growth multiplier at `p = 1`.
    pub growth_boost: f64,
    /// Minimum half-width of the forecast interval.
    pub band_floor: f64,
    /// Half-width as a fraction of the threshold, scaled by `1 − p`.
    pub band_fraction: f64,
}

impl Default for Coefficients {
    fn default() -> Self {
        Self {
            velocity_weight: 0.9,
            velocity_offset: 0.01,
            staleness_weight: 0.25,
            forks_weight: 0.15,
            forks_offset: 1.0,
            threshold_floor: 200,
            threshold_fraction: 0.5,
            horizon_days: 7,
            growth_base: 0.8,
            growth_boost: 0.6,
            band_floor: 25.0,
            band_fraction: 0.25,
        }
    }
}

impl Coefficients {
    /// Reject coefficient sets that would produce non-finite forecasts.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::NonFiniteCoefficient`] for NaN or infinite values.
    pub fn validate(&self) -> Result<(), DomainError> {
        let named = [
            ("velocity_weight", self.velocity_weight),
            ("velocity_offset", self.velocity_offset),
            ("staleness_weight", self.staleness_weight),
            ("forks_weight", self.forks_weight),
            ("forks_offset", self.forks_offset),
            ("threshold_fraction", self.threshold_fraction),
            ("growth_base", self.growth_base),
            ("growth_boost", self.growth_boost),
            ("band_floor", self.band_floor),
            ("band_fraction", self.band_fraction),
        ];
        for (name, value) in named {
            if !value.is_finite() {
                return Err(DomainError::NonFiniteCoefficient { name, value });
            }
        }
        Ok(())
    }
}

/// A versioned, swappable model definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelSpec {
    pub tag: String,
    pub coefficients: Coefficients,
}

impl Default for ModelSpec {
    fn default() -> Self {
        Self {
            tag: DEFAULT_MODEL_TAG.to_string(),
            coefficients: Coefficients::default(),
        }
    }
}

/// Probability and star-count forecast for one repository.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Forecast {
    /// Unrounded breakout probability in `[0, 1]`.
    pub p_breakout: f64,
    pub breakout_threshold: u64,
    pub point: u64,
    pub band: u64,
    pub low: u64,
    pub high: u64,
}

/// Deterministic breakout model over a [`ModelSpec`].
#[derive(Debug, Clone, Default)]
pub struct BreakoutModel {
    spec: ModelSpec,
}

impl BreakoutModel {
    #[must_use]
    pub const fn new(spec: ModelSpec) -> Self {
        Self { spec }
    }

    #[must_use]
    pub fn tag(&self) -> &str {
        &self.spec.tag
    }

    #[must_use]
    pub const fn coefficients(&self) -> &Coefficients {
        &self.spec.coefficients
    }

    /// Linear score fed into the logistic link.
    #[must_use]
    pub fn linear_score(&self, features: &FeatureSet) -> f64 {
        let c = &self.spec.coefficients;
        c.velocity_weight * (features.stars_per_day + c.velocity_offset).log10()
            - c.staleness_weight * features.since_push_days
            + c.forks_weight * (features.forks_now as f64 + c.forks_offset).log10()
    }

    /// Breakout probability for a feature set.
    #[must_use]
    pub fn probability(&self, features: &FeatureSet) -> f64 {
        clamp_unit(sigmoid(self.linear_score(features)))
    }

    /// Star increment that counts as a breakout for a repository at `stars_now`.
    #[must_use]
    pub fn breakout_threshold(&self, stars_now: u64) -> u64 {
        let c = &self.spec.coefficients;
        let relative = (c.threshold_fraction * stars_now as f64).round().max(0.0) as u64;
        c.threshold_floor.max(relative)
    }

    /// Velocity multiplier: growth accelerates with breakout probability.
    #[must_use]
    pub fn growth_multiplier(&self, p: f64) -> f64 {
        let c = &self.spec.coefficients;
        c.growth_base + c.growth_boost * p
    }

    /// Interval half-width before rounding; narrows as `p` rises.
    #[must_use]
    pub fn raw_band(&self, breakout_threshold: u64, p: f64) -> f64 {
        let c = &self.spec.coefficients;
        c.band_floor.max(c.band_fraction * breakout_threshold as f64 * (1.0 - p))
    }

    /// Full forecast for a repository currently at `stars_now`.
    #[must_use]
    pub fn forecast(&self, features: &FeatureSet, stars_now: u64) -> Forecast {
        let c = &self.spec.coefficients;
        let p_breakout = self.probability(features);
        let breakout_threshold = self.breakout_threshold(stars_now);

        let growth =
            f64::from(c.horizon_days) * features.stars_per_day * self.growth_multiplier(p_breakout);
        let point = round_count(stars_now as f64 + growth);
        let band = round_count(self.raw_band(breakout_threshold, p_breakout));

        Forecast {
            p_breakout,
            breakout_threshold,
            point,
            band,
            low: point.saturating_sub(band),
            high: point.saturating_add(band),
        }
    }
}

/// Logistic link `1 / (1 + e^-z)`.
#[must_use]
pub fn sigmoid(z: f64) -> f64 {
    1.0 / (1.0 + (-z).exp())
}

fn clamp_unit(p: f64) -> f64 {
    if p.is_nan() {
        0.0
    } else {
        p.clamp(0.0, 1.0)
    }
}

fn round_count(value: f64) -> u64 {
    if value.is_finite() {
        value.round().max(0.0) as u64
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn features(stars_per_day: f64, since_push_days: f64, forks_now: u64) -> FeatureSet {
        FeatureSet {
            age_days: 10.0,
            since_push_days,
            stars_per_day,
            forks_now,
            open_issues_now: 0,
            language: "Rust".into(),
        }
    }

    #[test]
    fn worked_example_matches_published_numbers() {
        let model = BreakoutModel::default();
        let f = features(100.0, 0.0, 50);

        let z = model.linear_score(&f);
        assert!((z - 2.0562).abs() < 1e-3, "z = {z}");

        let forecast = model.forecast(&f, 1000);
        assert!((forecast.p_breakout - 0.886).abs() < 1e-3);
        assert_eq!(forecast.breakout_threshold, 500);
        assert_eq!(forecast.point, 1932);
        assert_eq!(forecast.band, 25);
        assert_eq!(forecast.low, 1907);
        assert_eq!(forecast.high, 1957);
    }

    #[test]
    fn zero_stars_yields_finite_probability() {
        let model = BreakoutModel::default();
        let forecast = model.forecast(&features(0.0, 0.0, 0), 0);

        assert!(forecast.p_breakout.is_finite());
        assert!(forecast.p_breakout > 0.0 && forecast.p_breakout < 1.0);
        assert_eq!(forecast.point, 0);
        assert_eq!(forecast.low, 0);
        assert_eq!(forecast.breakout_threshold, 200);
    }

    #[test]
    fn probability_stays_in_unit_interval_across_inputs() {
        let model = BreakoutModel::default();
        for spd in [0.0, 0.001, 1.0, 50.0, 1e6, 1e12] {
            for push in [0.0, 0.5, 30.0, 10_000.0] {
                for forks in [0, 1, 100, 1_000_000] {
                    let p = model.probability(&features(spd, push, forks));
                    assert!((0.0..=1.0).contains(&p), "p = {p}");
                }
            }
        }
    }

    #[test]
    fn non_finite_scores_are_clamped() {
        assert_eq!(clamp_unit(sigmoid(f64::INFINITY)), 1.0);
        assert_eq!(clamp_unit(sigmoid(f64::NEG_INFINITY)), 0.0);
        assert_eq!(clamp_unit(f64::NAN), 0.0);
    }

    #[test]
    fn threshold_has_absolute_and_relative_floor() {
        let model = BreakoutModel::default();
        for stars in [0, 1, 399, 400, 401, 1000, 55_555] {
            let t = model.breakout_threshold(stars);
            assert!(t >= 200);
            assert!(t as f64 >= 0.5 * stars as f64);
        }
        assert_eq!(model.breakout_threshold(399), 200);
        assert_eq!(model.breakout_threshold(1001), 501);
    }

    #[test]
    fn interval_is_ordered_and_non_negative() {
        let model = BreakoutModel::default();
        for stars in [0, 60, 500, 12_000] {
            for spd in [0.0, 3.0, 400.0] {
                let fc = model.forecast(&features(spd, 1.0, 5), stars);
                assert!(fc.low <= fc.point && fc.point <= fc.high);
                assert!(fc.band >= 25);
            }
        }
    }

    #[test]
    fn higher_probability_narrows_band_and_raises_growth() {
        let model = BreakoutModel::default();
        let threshold = 4000;
        let mut last_band = f64::INFINITY;
        let mut last_growth = f64::NEG_INFINITY;
        for p in [0.0, 0.2, 0.4, 0.6, 0.8] {
            let band = model.raw_band(threshold, p);
            let growth = model.growth_multiplier(p);
            assert!(band < last_band);
            assert!(growth > last_growth);
            last_band = band;
            last_growth = growth;
        }
        assert_eq!(model.raw_band(threshold, 0.99), 25.0);
    }

    #[test]
    fn validate_rejects_non_finite_coefficients() {
        let mut c = Coefficients::default();
        assert!(c.validate().is_ok());
        c.growth_boost = f64::NAN;
        assert!(matches!(
            c.validate(),
            Err(DomainError::NonFiniteCoefficient { name: "growth_boost", .. })
        ));

        c.growth_boost = 0.6;
        c.band_floor = f64::INFINITY;
        assert_eq!(
            c.validate(),
            Err(DomainError::NonFiniteCoefficient {
                name: "band_floor",
                value: f64::INFINITY,
            })
        );
    }
}
