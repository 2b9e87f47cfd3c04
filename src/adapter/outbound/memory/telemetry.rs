//! Fixture-backed telemetry provider.

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::domain::{id::RepoName, telemetry::RepoTelemetry};
use crate::error::{FetchError, Result};
use crate::port::outbound::telemetry::{DiscoveryQuery, RepoDiscovery, TelemetryProvider};

const PROVIDER_NAME: &str = "static";

/// Serves telemetry from a fixed set of repositories.
///
/// Repositories can be mutated between runs to simulate growth, removed to
/// simulate deletion, or marked as failing to simulate transport errors.
#[derive(Debug, Default)]
pub struct StaticTelemetry {
    repos: RwLock<Vec<RepoTelemetry>>,
    failing: RwLock<HashSet<RepoName>>,
    fetches: AtomicUsize,
}

impl StaticTelemetry {
    #[must_use]
    pub fn new(repos: Vec<RepoTelemetry>) -> Self {
        Self {
            repos: RwLock::new(repos),
            ..Self::default()
        }
    }

    /// Update the star count of a known repository.
    pub fn set_stars(&self, name: &RepoName, stars: u64) {
        if let Some(repo) = self.repos.write().iter_mut().find(|r| &r.full_name == name) {
            repo.stars_now = stars;
        }
    }

    /// Forget a repository; later fetches report it as not found.
    pub fn remove(&self, name: &RepoName) {
        self.repos.write().retain(|r| &r.full_name != name);
    }

    /// Make fetches of `name` fail with a server error.
    pub fn fail_on(&self, name: &RepoName) {
        self.failing.write().insert(name.clone());
    }

    /// Number of `fetch` calls served so far.
    #[must_use]
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RepoDiscovery for StaticTelemetry {
    async fn discover(&self, query: &DiscoveryQuery) -> Result<Vec<RepoName>> {
        let mut matches: Vec<RepoTelemetry> = self
            .repos
            .read()
            .iter()
            .filter(|r| r.stars_now >= query.min_stars)
            .filter(|r| r.created_at.date_naive() >= query.created_since)
            .cloned()
            .collect();
        matches.sort_by(|a, b| b.stars_now.cmp(&a.stars_now));
        Ok(matches
            .into_iter()
            .take(query.limit)
            .map(|r| r.full_name)
            .collect())
    }
}

#[async_trait]
impl TelemetryProvider for StaticTelemetry {
    async fn fetch(&self, name: &RepoName) -> Result<RepoTelemetry> {
        self.fetches.fetch_add(1, Ordering::SeqCst);

        if self.failing.read().contains(name) {
            return Err(FetchError::Status {
                status: 500,
                url: format!("static://repos/{name}"),
            }
            .into());
        }

        self.repos
            .read()
            .iter()
            .find(|r| &r.full_name == name)
            .cloned()
            .ok_or_else(|| {
                FetchError::NotFound {
                    full_name: name.to_string(),
                }
                .into()
            })
    }

    fn provider_name(&self) -> &'static str {
        PROVIDER_NAME
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testkit::domain::{created_days_ago, now, telemetry};
    use chrono::Duration;

    fn query() -> DiscoveryQuery {
        DiscoveryQuery {
            created_since: (now() - Duration::days(14)).date_naive(),
            min_stars: 50,
            limit: 2,
        }
    }

    #[tokio::test]
    async fn discover_filters_and_ranks_by_stars() {
        let mut old = telemetry("acme/old", 5000);
        old.created_at = created_days_ago(30);
        let provider = StaticTelemetry::new(vec![
            telemetry("acme/small", 60),
            telemetry("acme/tiny", 10),
            old,
            telemetry("acme/big", 900),
            telemetry("acme/mid", 300),
        ]);

        let names = provider.discover(&query()).await.unwrap();
        let names: Vec<&str> = names.iter().map(RepoName::as_str).collect();
        assert_eq!(names, vec!["acme/big", "acme/mid"]);
    }

    #[tokio::test]
    async fn removed_repo_is_not_found_and_failing_repo_is_status() {
        let provider =
            StaticTelemetry::new(vec![telemetry("acme/a", 100), telemetry("acme/b", 100)]);
        provider.remove(&RepoName::new("acme/a"));
        provider.fail_on(&RepoName::new("acme/b"));

        let gone = provider.fetch(&RepoName::new("acme/a")).await.unwrap_err();
        assert!(gone.is_not_found());

        let failed = provider.fetch(&RepoName::new("acme/b")).await.unwrap_err();
        assert!(!failed.is_not_found());
        assert_eq!(provider.fetch_count(), 2);
    }

    #[tokio::test]
    async fn set_stars_changes_later_fetches() {
        let provider = StaticTelemetry::new(vec![telemetry("acme/a", 100)]);
        provider.set_stars(&RepoName::new("acme/a"), 450);

        let repo = provider.fetch(&RepoName::new("acme/a")).await.unwrap();
        assert_eq!(repo.stars_now, 450);
    }
}
