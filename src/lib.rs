//! RepoPulse - daily 7-day breakout forecasts for young GitHub repositories.
//!
//! Each run discovers recently created repositories, extracts a small set of
//! features from their public telemetry, and records a probability of
//! "breaking out" within seven days together with a point and interval star
//! forecast. A week later the same batch is scored against the realized star
//! counts and appended to a CSV ledger, so the model's calibration can be
//! audited over time.
//!
//! # Architecture
//!
//! - **`domain`** - Pure feature extraction, the heuristic logistic model,
//!   scoring math (Brier, MAE, interval coverage) and calibration summaries
//! - **`port`** - Traits for telemetry, artifact storage, the outcome ledger
//!   and notification sinks
//! - **`adapter`** - GitHub REST client, flat-file store and CSV ledger,
//!   webhook notifier, in-memory doubles, and the CLI
//! - **`application`** - Forecast, scoring and publish use cases
//! - **`infrastructure`** - Configuration loading and the composition root
//!
//! # Example
//!
//! ```no_run
//! use repopulse::domain::{BreakoutModel, FeatureSet, ModelSpec};
//! use repopulse::domain::RepoTelemetry;
//!
//! fn forecast(telemetry: &RepoTelemetry) -> f64 {
//!     let model = BreakoutModel::new(ModelSpec::default());
//!     let features = FeatureSet::extract(telemetry, chrono::Utc::now());
//!     model.forecast(&features, telemetry.stars_now).p_breakout
//! }
//! ```

pub mod adapter;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod port;

#[cfg(any(test, feature = "testkit"))]
pub mod testkit;
