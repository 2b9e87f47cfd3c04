//! Persistence ports for dated artifacts and the outcome ledger.

use std::fmt;

use chrono::NaiveDate;

use crate::domain::{
    digest::Post,
    outcome::{Outcome, ScoreSummary},
    prediction::PredictionBatch,
    telemetry::Snapshot,
};
use crate::error::Result;

/// Kinds of dated artifact a run produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    Snapshots,
    Predictions,
    Post,
    Summary,
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Snapshots => write!(f, "snapshots"),
            Self::Predictions => write!(f, "predictions"),
            Self::Post => write!(f, "post"),
            Self::Summary => write!(f, "summary"),
        }
    }
}

/// Storage for dated, whole-file artifacts.
///
/// Each artifact is keyed by its run date. Prediction batches are written
/// once per date; callers check [`ArtifactStore::load_predictions`] first.
pub trait ArtifactStore: Send + Sync {
    /// Record the raw telemetry observed on `date`.
    fn save_snapshots(&self, date: NaiveDate, snapshots: &[Snapshot]) -> Result<()>;

    /// Record a prediction batch under its own date.
    fn save_predictions(&self, batch: &PredictionBatch) -> Result<()>;

    /// Load the prediction batch for `date`, if one was recorded.
    fn load_predictions(&self, date: NaiveDate) -> Result<Option<PredictionBatch>>;

    /// Record the digest post for its date.
    fn save_post(&self, post: &Post) -> Result<()>;

    /// Load the digest post for `date`, if one was recorded.
    fn load_post(&self, date: NaiveDate) -> Result<Option<Post>>;

    /// Record the scoring summary for its prediction date.
    fn save_summary(&self, summary: &ScoreSummary) -> Result<()>;

    /// Human-readable location of an artifact, for messages.
    fn locate(&self, kind: ArtifactKind, date: NaiveDate) -> String;
}

/// The permanent, append-only outcome ledger.
///
/// Rows are never rewritten. `append` skips outcomes whose
/// `(prediction_date, full_name)` key is already present, so scoring a date
/// twice cannot duplicate rows.
pub trait OutcomeLedger: Send + Sync {
    /// All outcomes recorded for predictions made on `date`.
    fn outcomes_for(&self, date: NaiveDate) -> Result<Vec<Outcome>>;

    /// Every outcome on the ledger, in append order.
    fn all_outcomes(&self) -> Result<Vec<Outcome>>;

    /// Append outcomes with unseen keys. Returns the number appended.
    fn append(&self, outcomes: &[Outcome]) -> Result<usize>;

    /// Human-readable location of the ledger, for messages.
    fn location(&self) -> String;
}
