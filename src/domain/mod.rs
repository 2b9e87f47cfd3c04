//! Transport-agnostic domain logic: features, model, and scoring.
//!
//! Nothing in this module performs I/O. Every computation is a pure function
//! of its inputs plus an explicit reference instant.

pub mod calibration;
pub mod digest;
pub mod error;
pub mod feature;
pub mod id;
pub mod model;
pub mod outcome;
pub mod prediction;
pub mod telemetry;

pub use calibration::{CalibrationReport, ModelCalibration, ReliabilityBin};
pub use digest::{DigestTemplate, Post};
pub use feature::FeatureSet;
pub use id::RepoName;
pub use model::{BreakoutModel, Coefficients, Forecast, ModelSpec};
pub use outcome::{Outcome, OutcomeKey, ScoreSummary};
pub use prediction::{Prediction, PredictionBatch};
pub use telemetry::{RepoTelemetry, Snapshot};
