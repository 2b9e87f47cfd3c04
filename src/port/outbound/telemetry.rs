//! Telemetry ports for repository discovery and point-in-time snapshots.
//!
//! The core consumes telemetry only through these traits; whether the data
//! comes from REST, GraphQL, or a fixture map is irrelevant to it.

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::domain::{id::RepoName, telemetry::RepoTelemetry};
use crate::error::Result;

/// Search parameters for candidate repositories.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveryQuery {
    /// Only repositories created on or after this date.
    pub created_since: NaiveDate,
    /// Minimum current star count.
    pub min_stars: u64,
    /// Maximum number of repositories returned, highest stars first.
    pub limit: usize,
}

/// Finds recently created, fast-growing repositories.
#[async_trait]
pub trait RepoDiscovery: Send + Sync {
    /// Return candidate repository names, ordered by stars descending.
    async fn discover(&self, query: &DiscoveryQuery) -> Result<Vec<RepoName>>;
}

/// Returns a telemetry snapshot for a repository.
///
/// Implementations report a deleted or missing repository as
/// [`FetchError::NotFound`](crate::error::FetchError::NotFound) so callers
/// can tell it apart from transport failures.
#[async_trait]
pub trait TelemetryProvider: Send + Sync {
    /// Fetch the current telemetry for `name`.
    async fn fetch(&self, name: &RepoName) -> Result<RepoTelemetry>;

    /// Name used in logs.
    fn provider_name(&self) -> &'static str;
}
