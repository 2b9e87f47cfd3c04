//! In-memory artifact store and ledger.
//!
//! Backs dry runs and tests. Nothing survives the process.

use std::collections::{BTreeMap, HashSet};

use chrono::NaiveDate;
use parking_lot::RwLock;

use crate::domain::{
    digest::Post,
    outcome::{Outcome, OutcomeKey, ScoreSummary},
    prediction::PredictionBatch,
    telemetry::Snapshot,
};
use crate::error::Result;
use crate::port::outbound::store::{ArtifactKind, ArtifactStore, OutcomeLedger};

/// Artifact store holding everything in maps keyed by date.
#[derive(Debug, Default)]
pub struct MemoryStore {
    snapshots: RwLock<BTreeMap<NaiveDate, Vec<Snapshot>>>,
    predictions: RwLock<BTreeMap<NaiveDate, PredictionBatch>>,
    posts: RwLock<BTreeMap<NaiveDate, Post>>,
    summaries: RwLock<BTreeMap<NaiveDate, ScoreSummary>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshots recorded for `date`.
    #[must_use]
    pub fn snapshots(&self, date: NaiveDate) -> Option<Vec<Snapshot>> {
        self.snapshots.read().get(&date).cloned()
    }

    /// Summary recorded for prediction date `date`.
    #[must_use]
    pub fn summary(&self, date: NaiveDate) -> Option<ScoreSummary> {
        self.summaries.read().get(&date).cloned()
    }
}

impl ArtifactStore for MemoryStore {
    fn save_snapshots(&self, date: NaiveDate, snapshots: &[Snapshot]) -> Result<()> {
        self.snapshots.write().insert(date, snapshots.to_vec());
        Ok(())
    }

    fn save_predictions(&self, batch: &PredictionBatch) -> Result<()> {
        self.predictions
            .write()
            .insert(batch.date_utc(), batch.clone());
        Ok(())
    }

    fn load_predictions(&self, date: NaiveDate) -> Result<Option<PredictionBatch>> {
        Ok(self.predictions.read().get(&date).cloned())
    }

    fn save_post(&self, post: &Post) -> Result<()> {
        self.posts.write().insert(post.date_utc, post.clone());
        Ok(())
    }

    fn load_post(&self, date: NaiveDate) -> Result<Option<Post>> {
        Ok(self.posts.read().get(&date).cloned())
    }

    fn save_summary(&self, summary: &ScoreSummary) -> Result<()> {
        self.summaries
            .write()
            .insert(summary.prediction_date_utc, summary.clone());
        Ok(())
    }

    fn locate(&self, kind: ArtifactKind, date: NaiveDate) -> String {
        format!("memory://{kind}/{date}")
    }
}

/// Outcome ledger held in a vector, append order preserved.
#[derive(Debug, Default)]
pub struct MemoryLedger {
    rows: RwLock<Vec<Outcome>>,
}

impl MemoryLedger {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Ledger pre-populated with `rows`, as if read from disk.
    #[must_use]
    pub fn with_rows(rows: Vec<Outcome>) -> Self {
        Self {
            rows: RwLock::new(rows),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.read().is_empty()
    }
}

impl OutcomeLedger for MemoryLedger {
    fn outcomes_for(&self, date: NaiveDate) -> Result<Vec<Outcome>> {
        Ok(self
            .rows
            .read()
            .iter()
            .filter(|o| o.prediction_date_utc == date)
            .cloned()
            .collect())
    }

    fn all_outcomes(&self) -> Result<Vec<Outcome>> {
        Ok(self.rows.read().clone())
    }

    fn append(&self, outcomes: &[Outcome]) -> Result<usize> {
        let mut rows = self.rows.write();
        let mut seen: HashSet<OutcomeKey> = rows.iter().map(Outcome::key).collect();
        let before = rows.len();
        for outcome in outcomes {
            if seen.insert(outcome.key()) {
                rows.push(outcome.clone());
            }
        }
        Ok(rows.len() - before)
    }

    fn location(&self) -> String {
        "memory://outcomes".into()
    }
}
