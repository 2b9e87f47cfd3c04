//! Daily forecast run.
//!
//! ```text
//! RepoDiscovery --names--> TelemetryProvider --telemetry--> FeatureSet
//!                                                               |
//!                                                          BreakoutModel
//!                                                               |
//!                      ArtifactStore <-- snapshots, batch, post --+
//! ```
//!
//! Fetches are awaited one at a time. Any fetch failure aborts the run
//! before anything is recorded, so a partial batch is never written. A date
//! that already has a recorded batch is refused before discovery.

use std::sync::Arc;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use tracing::{debug, info};

use crate::domain::{
    digest::{DigestTemplate, Post},
    feature::FeatureSet,
    model::BreakoutModel,
    prediction::{Prediction, PredictionBatch},
    telemetry::Snapshot,
};
use crate::error::{Error, Result};
use crate::port::outbound::store::{ArtifactKind, ArtifactStore};
use crate::port::outbound::telemetry::{DiscoveryQuery, RepoDiscovery, TelemetryProvider};

/// Which repositories count as candidates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiscoveryWindow {
    /// Only repositories created this many days before the run.
    pub created_within_days: u32,
    pub min_stars: u64,
    /// Maximum number of candidates per run.
    pub limit: usize,
}

impl DiscoveryWindow {
    /// The discovery query for a run at `now`.
    #[must_use]
    pub fn query(&self, now: DateTime<Utc>) -> DiscoveryQuery {
        DiscoveryQuery {
            created_since: (now - Duration::days(i64::from(self.created_within_days))).date_naive(),
            min_stars: self.min_stars,
            limit: self.limit,
        }
    }
}

impl Default for DiscoveryWindow {
    fn default() -> Self {
        Self {
            created_within_days: 14,
            min_stars: 50,
            limit: 30,
        }
    }
}

/// What one forecast run produced.
#[derive(Debug, Clone)]
pub struct ForecastReport {
    pub date_utc: NaiveDate,
    pub snapshots: Vec<Snapshot>,
    pub batch: PredictionBatch,
    pub post: Post,
}

/// Runs discovery, feature extraction and the model, then records the batch.
pub struct ForecastService {
    discovery: Arc<dyn RepoDiscovery>,
    telemetry: Arc<dyn TelemetryProvider>,
    store: Arc<dyn ArtifactStore>,
    model: BreakoutModel,
    window: DiscoveryWindow,
    template: DigestTemplate,
}

impl ForecastService {
    #[must_use]
    pub fn new(
        discovery: Arc<dyn RepoDiscovery>,
        telemetry: Arc<dyn TelemetryProvider>,
        store: Arc<dyn ArtifactStore>,
        model: BreakoutModel,
        window: DiscoveryWindow,
        template: DigestTemplate,
    ) -> Self {
        Self {
            discovery,
            telemetry,
            store,
            model,
            window,
            template,
        }
    }

    /// Where this service records `kind` for `date`.
    #[must_use]
    pub fn locate(&self, kind: ArtifactKind, date: NaiveDate) -> String {
        self.store.locate(kind, date)
    }

    /// Forecast every candidate as of `now` and record the results.
    ///
    /// # Errors
    ///
    /// Returns [`Error::BatchExists`] when `now`'s date was already
    /// forecast. Otherwise fails on the first discovery, fetch, or storage
    /// error.
    pub async fn run(&self, now: DateTime<Utc>) -> Result<ForecastReport> {
        let date_utc = now.date_naive();
        if self.store.load_predictions(date_utc)?.is_some() {
            return Err(Error::BatchExists {
                date: date_utc,
                path: self.store.locate(ArtifactKind::Predictions, date_utc),
            });
        }

        let query = self.window.query(now);
        let names = self.discovery.discover(&query).await?;
        info!(
            date = %date_utc,
            candidates = names.len(),
            created_since = %query.created_since,
            "Discovered candidates"
        );

        let mut snapshots = Vec::with_capacity(names.len());
        let mut predictions = Vec::with_capacity(names.len());
        for name in &names {
            let telemetry = self.telemetry.fetch(name).await?;
            let features = FeatureSet::extract(&telemetry, now);
            let forecast = self.model.forecast(&features, telemetry.stars_now);
            debug!(
                repo = %name,
                p = forecast.p_breakout,
                point = forecast.point,
                "Forecast"
            );
            predictions.push(Prediction::new(
                date_utc,
                &telemetry,
                features,
                &forecast,
                self.model.tag(),
            ));
            snapshots.push(Snapshot::new(date_utc, telemetry));
        }

        let batch = PredictionBatch::new(date_utc, predictions);
        let post = Post::compose(&batch, &self.template);

        self.store.save_snapshots(date_utc, &snapshots)?;
        self.store.save_predictions(&batch)?;
        self.store.save_post(&post)?;

        info!(
            date = %date_utc,
            predictions = batch.len(),
            model = self.model.tag(),
            provider = self.telemetry.provider_name(),
            "Forecast recorded"
        );

        Ok(ForecastReport {
            date_utc,
            snapshots,
            batch,
            post,
        })
    }
}
