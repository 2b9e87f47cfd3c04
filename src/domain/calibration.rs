//! Ledger-wide calibration statistics.
//!
//! Aggregates every scored [`Outcome`] into running calibration metrics:
//! mean Brier score, mean absolute star error, interval coverage, and a
//! reliability table comparing predicted probability to observed breakout
//! frequency in ten equal-width bins.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use super::outcome::Outcome;

/// Number of equal-width probability bins in the reliability table.
pub const RELIABILITY_BINS: usize = 10;

/// One row of the reliability table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReliabilityBin {
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
    pub mean_predicted: f64,
    pub observed_rate: f64,
}

/// Metrics for the outcomes of a single model tag.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelCalibration {
    pub model_tag: String,
    pub n: usize,
    pub mean_brier: f64,
    pub mean_mae_stars: f64,
    pub band_coverage: f64,
}

/// Calibration over a set of outcomes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CalibrationReport {
    pub n: usize,
    pub prediction_dates: usize,
    pub mean_brier: f64,
    pub mean_mae_stars: f64,
    pub band_coverage: f64,
    pub mean_p_breakout: f64,
    pub breakout_rate: f64,
    pub bins: Vec<ReliabilityBin>,
    pub by_model: Vec<ModelCalibration>,
}

#[derive(Default)]
struct Totals {
    n: usize,
    brier: f64,
    abs_error: f64,
    covered: usize,
    p: f64,
    breakouts: usize,
}

impl Totals {
    fn add(&mut self, o: &Outcome) {
        self.n += 1;
        self.brier += o.brier_score;
        self.abs_error += o.abs_error_stars as f64;
        self.p += o.p_breakout_7d;
        self.covered += usize::from(o.within_band);
        self.breakouts += usize::from(o.breakout_actual);
    }

    fn mean(&self, sum: f64) -> f64 {
        sum / self.n.max(1) as f64
    }
}

impl CalibrationReport {
    #[must_use]
    pub fn from_outcomes(outcomes: &[Outcome]) -> Self {
        let mut overall = Totals::default();
        let mut bins: Vec<Totals> = (0..RELIABILITY_BINS).map(|_| Totals::default()).collect();
        let mut models: BTreeMap<&str, Totals> = BTreeMap::new();
        let mut dates = BTreeSet::new();

        for o in outcomes {
            overall.add(o);
            bins[bin_index(o.p_breakout_7d)].add(o);
            models.entry(o.model_tag.as_str()).or_default().add(o);
            dates.insert(o.prediction_date_utc);
        }

        let width = 1.0 / RELIABILITY_BINS as f64;
        let bins = bins
            .iter()
            .enumerate()
            .map(|(i, t)| ReliabilityBin {
                lower: i as f64 * width,
                upper: (i + 1) as f64 * width,
                count: t.n,
                mean_predicted: t.mean(t.p),
                observed_rate: t.mean(t.breakouts as f64),
            })
            .collect();

        let by_model = models
            .into_iter()
            .map(|(tag, t)| ModelCalibration {
                model_tag: tag.to_string(),
                n: t.n,
                mean_brier: t.mean(t.brier),
                mean_mae_stars: t.mean(t.abs_error),
                band_coverage: t.mean(t.covered as f64),
            })
            .collect();

        Self {
            n: overall.n,
            prediction_dates: dates.len(),
            mean_brier: overall.mean(overall.brier),
            mean_mae_stars: overall.mean(overall.abs_error),
            band_coverage: overall.mean(overall.covered as f64),
            mean_p_breakout: overall.mean(overall.p),
            breakout_rate: overall.mean(overall.breakouts as f64),
            bins,
            by_model,
        }
    }
}

fn bin_index(p: f64) -> usize {
    let scaled = (p.clamp(0.0, 1.0) * RELIABILITY_BINS as f64).floor() as usize;
    scaled.min(RELIABILITY_BINS - 1)
}
