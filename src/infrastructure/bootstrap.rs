//! Composition root: wires adapters from configuration into services.
//!
//! CLI handlers call these builders and never construct adapters directly.

use std::sync::Arc;

use tracing::{info, warn};

use crate::adapter::outbound::filesystem::{CsvLedger, FileStore};
use crate::adapter::outbound::github::GithubClient;
use crate::adapter::outbound::memory::MemoryStore;
use crate::adapter::outbound::notifier::{WebhookConfig, WebhookNotifier};
use crate::application::{ForecastService, PublishService, ScoringService};
use crate::domain::model::BreakoutModel;
use crate::error::Result;
use crate::infrastructure::config::settings::Config;
use crate::port::outbound::notifier::{LogNotifier, NotifierRegistry};
use crate::port::outbound::store::{ArtifactStore, OutcomeLedger};

/// Filesystem artifact store for the configured storage root.
#[must_use]
pub fn build_store(config: &Config) -> Arc<dyn ArtifactStore> {
    Arc::new(FileStore::new(config.storage.clone()))
}

/// CSV ledger for the configured storage root.
#[must_use]
pub fn build_ledger(config: &Config) -> Arc<dyn OutcomeLedger> {
    Arc::new(CsvLedger::from_config(&config.storage))
}

fn build_github(config: &Config) -> Arc<GithubClient> {
    if config.github.token.is_none() {
        warn!("GH_TOKEN not set, using unauthenticated GitHub rate limits");
    }
    Arc::new(GithubClient::from_config(&config.github))
}

/// Forecast service backed by GitHub. A dry run records into memory only.
#[must_use]
pub fn build_forecast_service(config: &Config, dry_run: bool) -> ForecastService {
    let github = build_github(config);
    let store: Arc<dyn ArtifactStore> = if dry_run {
        info!("Dry run: artifacts will not be written");
        Arc::new(MemoryStore::new())
    } else {
        build_store(config)
    };

    ForecastService::new(
        github.clone(),
        github,
        store,
        BreakoutModel::new(config.model.clone()),
        config.discovery_window(),
        config.digest.clone(),
    )
}

/// Scoring service backed by GitHub, the file store and the CSV ledger.
#[must_use]
pub fn build_scoring_service(config: &Config) -> ScoringService {
    ScoringService::new(
        build_github(config),
        build_store(config),
        build_ledger(config),
        config.scoring.horizon_days,
    )
}

/// Build the notifier registry from configuration.
///
/// # Errors
///
/// Returns a config error when the webhook is enabled but
/// `MAKE_WEBHOOK_URL` is unset or malformed.
pub fn build_notifier_registry(config: &Config) -> Result<NotifierRegistry> {
    let mut registry = NotifierRegistry::new();
    registry.register(Box::new(LogNotifier));

    if config.webhook.enabled {
        let webhook = WebhookConfig::new(config.webhook.url.as_deref(), config.webhook.timeout_ms)?;
        registry.register(Box::new(WebhookNotifier::new(webhook)));
        info!("Webhook notifier enabled");
    } else {
        info!("Webhook disabled, posts are only logged");
    }

    Ok(registry)
}

/// Publish service for stored posts.
///
/// # Errors
///
/// See [`build_notifier_registry`].
pub fn build_publish_service(config: &Config) -> Result<PublishService> {
    Ok(PublishService::new(
        build_store(config),
        build_notifier_registry(config)?,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ConfigError, Error};
    use crate::port::outbound::store::ArtifactKind;
    use crate::testkit::config::rooted_at;
    use tempfile::TempDir;

    #[test]
    fn dry_run_records_into_memory() {
        let dir = TempDir::new().unwrap();
        let config = rooted_at(dir.path());
        let date = crate::testkit::domain::prediction_date();

        let dry = build_forecast_service(&config, true);
        assert_eq!(
            dry.locate(ArtifactKind::Predictions, date),
            "memory://predictions/2026-10-12"
        );

        let live = build_forecast_service(&config, false);
        assert!(live
            .locate(ArtifactKind::Predictions, date)
            .ends_with("predictions_2026-10-12.json"));
    }

    #[test]
    fn enabled_webhook_without_url_is_fatal() {
        let dir = TempDir::new().unwrap();
        let config = rooted_at(dir.path());
        assert!(matches!(
            build_notifier_registry(&config),
            Err(Error::Config(ConfigError::MissingField {
                field: "MAKE_WEBHOOK_URL"
            }))
        ));
    }

    #[test]
    fn registry_has_log_and_webhook_sinks() {
        let dir = TempDir::new().unwrap();
        let mut config = rooted_at(dir.path());
        config.webhook.url = Some("https://hook.example.com/x".into());
        assert_eq!(build_notifier_registry(&config).unwrap().len(), 2);

        config.webhook.enabled = false;
        assert_eq!(build_notifier_registry(&config).unwrap().len(), 1);
    }
}
