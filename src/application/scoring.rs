//! Retrospective scoring of a past prediction batch.
//!
//! Reconciles the batch made on a prediction date `D` with telemetry fetched
//! at least one horizon later, appends one [`Outcome`] per prediction to the
//! ledger, and writes a [`ScoreSummary`] for `D`.
//!
//! Scoring is idempotent. Keys already on the ledger are skipped before any
//! fetch, the ledger re-checks keys when appending, and the summary is always
//! computed over every ledger row for `D`.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use tracing::{debug, info, warn};

use crate::domain::{
    id::RepoName,
    outcome::{Outcome, OutcomeKey, ScoreSummary},
};
use crate::error::{Error, Result};
use crate::port::outbound::store::{ArtifactKind, ArtifactStore, OutcomeLedger};
use crate::port::outbound::telemetry::TelemetryProvider;

/// A prediction that could not be scored this run.
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedRow {
    pub full_name: RepoName,
    /// The repository is gone rather than unreachable.
    pub not_found: bool,
    pub reason: String,
}

/// Result of a scoring run.
#[derive(Debug, Clone)]
pub enum ScoringReport {
    /// No batch was recorded for the prediction date.
    NoBatch {
        prediction_date: NaiveDate,
        expected: String,
    },
    Scored {
        summary: ScoreSummary,
        /// Outcomes computed by this run. Keys a concurrent run appended
        /// first are left out of the ledger but still listed here.
        scored: Vec<Outcome>,
        /// Predictions already on the ledger before this run.
        already_scored: usize,
        skipped: Vec<SkippedRow>,
    },
}

/// Scores prediction batches against fresh telemetry.
pub struct ScoringService {
    telemetry: Arc<dyn TelemetryProvider>,
    store: Arc<dyn ArtifactStore>,
    ledger: Arc<dyn OutcomeLedger>,
    horizon_days: u32,
}

impl ScoringService {
    #[must_use]
    pub fn new(
        telemetry: Arc<dyn TelemetryProvider>,
        store: Arc<dyn ArtifactStore>,
        ledger: Arc<dyn OutcomeLedger>,
        horizon_days: u32,
    ) -> Self {
        Self {
            telemetry,
            store,
            ledger,
            horizon_days,
        }
    }

    fn horizon(&self) -> Duration {
        Duration::days(i64::from(self.horizon_days))
    }

    /// The prediction date that becomes scorable at `now`.
    #[must_use]
    pub fn default_prediction_date(&self, now: DateTime<Utc>) -> NaiveDate {
        now.date_naive() - self.horizon()
    }

    /// Score the batch for `prediction_date` (default: one horizon ago).
    ///
    /// # Errors
    ///
    /// Returns [`Error::ScoringTooEarly`] when the requested date is less
    /// than one horizon old. Storage and ledger failures are propagated;
    /// per-repository fetch failures are not.
    pub async fn run(
        &self,
        now: DateTime<Utc>,
        prediction_date: Option<NaiveDate>,
    ) -> Result<ScoringReport> {
        let scored_date = now.date_naive();
        let prediction_date = prediction_date.unwrap_or_else(|| self.default_prediction_date(now));

        let earliest = prediction_date + self.horizon();
        if scored_date < earliest {
            return Err(Error::ScoringTooEarly {
                prediction_date,
                earliest,
                horizon_days: self.horizon_days,
            });
        }

        let Some(batch) = self.store.load_predictions(prediction_date)? else {
            let expected = self.store.locate(ArtifactKind::Predictions, prediction_date);
            info!(
                date = %prediction_date,
                expected = %expected,
                "No prediction batch recorded, nothing to score"
            );
            return Ok(ScoringReport::NoBatch {
                prediction_date,
                expected,
            });
        };

        let known: HashSet<OutcomeKey> = self
            .ledger
            .outcomes_for(prediction_date)?
            .iter()
            .map(Outcome::key)
            .collect();

        let mut fresh = Vec::new();
        let mut skipped = Vec::new();
        let mut already_scored = 0;
        for prediction in batch.predictions() {
            let key = OutcomeKey {
                prediction_date,
                full_name: prediction.full_name.clone(),
            };
            if known.contains(&key) {
                already_scored += 1;
                debug!(repo = %prediction.full_name, "Already scored");
                continue;
            }

            match self.telemetry.fetch(&prediction.full_name).await {
                Ok(telemetry) => {
                    fresh.push(Outcome::score(prediction, telemetry.stars_now, scored_date));
                }
                Err(err) => {
                    warn!(
                        repo = %prediction.full_name,
                        error = %err,
                        "Skipping prediction, telemetry unavailable"
                    );
                    skipped.push(SkippedRow {
                        full_name: prediction.full_name.clone(),
                        not_found: err.is_not_found(),
                        reason: err.to_string(),
                    });
                }
            }
        }

        let appended_count = self.ledger.append(&fresh)?;

        let rows = self.ledger.outcomes_for(prediction_date)?;
        let summary = ScoreSummary::from_outcomes(
            prediction_date,
            scored_date,
            &rows,
            appended_count,
            skipped.len(),
        );
        self.store.save_summary(&summary)?;

        info!(
            date = %prediction_date,
            n = summary.n,
            appended = appended_count,
            already_scored,
            skipped = skipped.len(),
            mean_brier = summary.mean_brier,
            mean_mae_stars = summary.mean_mae_stars,
            ledger = %self.ledger.location(),
            "Scored prediction batch"
        );

        Ok(ScoringReport::Scored {
            summary,
            scored: fresh,
            already_scored,
            skipped,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::outbound::memory::{MemoryLedger, MemoryStore, StaticTelemetry};
    use crate::domain::prediction::PredictionBatch;
    use crate::testkit::domain::{now, prediction, prediction_date, telemetry};

    struct Fixture {
        provider: Arc<StaticTelemetry>,
        store: Arc<MemoryStore>,
        ledger: Arc<MemoryLedger>,
        service: ScoringService,
    }

    fn fixture(names: &[&str]) -> Fixture {
        let provider = Arc::new(StaticTelemetry::new(
            names.iter().map(|n| telemetry(n, 900)).collect(),
        ));
        let store = Arc::new(MemoryStore::new());
        store
            .save_predictions(&PredictionBatch::new(
                prediction_date(),
                names.iter().map(|n| prediction(n, 500)).collect(),
            ))
            .unwrap();
        let ledger = Arc::new(MemoryLedger::new());
        let service = ScoringService::new(provider.clone(), store.clone(), ledger.clone(), 7);
        Fixture {
            provider,
            store,
            ledger,
            service,
        }
    }

    fn week_later() -> DateTime<Utc> {
        now() + Duration::days(7)
    }

    #[tokio::test]
    async fn default_date_is_one_horizon_back() {
        let f = fixture(&["acme/a"]);
        assert_eq!(f.service.default_prediction_date(week_later()), prediction_date());

        match f.service.run(week_later(), None).await.unwrap() {
            ScoringReport::Scored { summary, .. } => assert_eq!(summary.n, 1),
            other => panic!("expected scored, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn too_early_is_a_usage_error() {
        let f = fixture(&["acme/a"]);
        let err = f
            .service
            .run(now() + Duration::days(6), Some(prediction_date()))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::ScoringTooEarly { horizon_days: 7, .. }));
        assert_eq!(f.provider.fetch_count(), 0);
    }

    #[tokio::test]
    async fn missing_batch_is_a_no_op() {
        let f = fixture(&[]);
        let other = prediction_date() - Duration::days(1);
        match f.service.run(week_later(), Some(other)).await.unwrap() {
            ScoringReport::NoBatch { prediction_date, expected } => {
                assert_eq!(prediction_date, other);
                assert_eq!(expected, "memory://predictions/2026-10-11");
            }
            other => panic!("expected no batch, got {other:?}"),
        }
        assert!(f.ledger.is_empty());
        assert!(f.store.summary(other).is_none());
    }

    #[tokio::test]
    async fn deleted_and_failing_repos_are_skipped_and_counted() {
        let f = fixture(&["acme/a", "acme/gone", "acme/flaky"]);
        f.provider.remove(&RepoName::new("acme/gone"));
        f.provider.fail_on(&RepoName::new("acme/flaky"));

        let ScoringReport::Scored { summary, skipped, .. } =
            f.service.run(week_later(), None).await.unwrap()
        else {
            panic!("expected scored");
        };

        assert_eq!(summary.n, 1);
        assert_eq!(summary.skipped, 2);
        assert_eq!(skipped.len(), 2);
        assert!(skipped.iter().any(|s| s.full_name.as_str() == "acme/gone" && s.not_found));
        assert!(skipped.iter().any(|s| s.full_name.as_str() == "acme/flaky" && !s.not_found));
        assert_eq!(f.store.summary(prediction_date()), Some(summary));
    }

    #[tokio::test]
    async fn rescoring_is_idempotent() {
        let f = fixture(&["acme/a", "acme/b"]);

        let ScoringReport::Scored { summary: first, .. } =
            f.service.run(week_later(), None).await.unwrap()
        else {
            panic!("expected scored");
        };
        assert_eq!(f.provider.fetch_count(), 2);

        let ScoringReport::Scored {
            summary: second,
            scored,
            already_scored,
            ..
        } = f.service.run(week_later(), None).await.unwrap()
        else {
            panic!("expected scored");
        };

        assert_eq!(f.ledger.len(), 2);
        assert_eq!(f.provider.fetch_count(), 2);
        assert!(scored.is_empty());
        assert_eq!(already_scored, 2);
        assert_eq!(second.n, first.n);
        assert_eq!(second.mean_brier, first.mean_brier);
        assert_eq!(second.mean_mae_stars, first.mean_mae_stars);
        assert_eq!(second.newly_scored, 0);
    }

    #[tokio::test]
    async fn late_retry_scores_only_the_missing_rows() {
        let f = fixture(&["acme/a", "acme/b"]);
        f.provider.fail_on(&RepoName::new("acme/b"));
        f.service.run(week_later(), None).await.unwrap();
        assert_eq!(f.ledger.len(), 1);

        let retry = ScoringService::new(
            Arc::new(StaticTelemetry::new(vec![telemetry("acme/b", 700)])),
            f.store.clone(),
            f.ledger.clone(),
            7,
        );
        let ScoringReport::Scored { summary, scored, .. } =
            retry.run(week_later() + Duration::days(1), Some(prediction_date())).await.unwrap()
        else {
            panic!("expected scored");
        };

        assert_eq!(scored.len(), 1);
        assert_eq!(scored[0].full_name.as_str(), "acme/b");
        assert_eq!(summary.n, 2);
        assert_eq!(summary.newly_scored, 1);
    }
}
