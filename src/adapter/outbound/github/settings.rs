//! GitHub API configuration.

use serde::Deserialize;

/// Repository search settings.
#[derive(Debug, Clone, Deserialize)]
pub struct GithubSearchConfig {
    /// Only repositories created within this many days are candidates.
    #[serde(default = "default_created_within_days")]
    pub created_within_days: u32,
    /// Minimum star count for a candidate.
    #[serde(default = "default_min_stars")]
    pub min_stars: u64,
    /// Candidates per run (one search page, max 100).
    #[serde(default = "default_per_page")]
    pub per_page: usize,
}

const fn default_created_within_days() -> u32 {
    14
}

const fn default_min_stars() -> u64 {
    50
}

const fn default_per_page() -> usize {
    30
}

impl Default for GithubSearchConfig {
    fn default() -> Self {
        Self {
            created_within_days: default_created_within_days(),
            min_stars: default_min_stars(),
            per_page: default_per_page(),
        }
    }
}

/// GitHub HTTP client configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct GithubHttpConfig {
    /// Request timeout in milliseconds.
    #[serde(default = "default_http_timeout_ms")]
    pub timeout_ms: u64,
    /// Connect timeout in milliseconds.
    #[serde(default = "default_http_connect_timeout_ms")]
    pub connect_timeout_ms: u64,
    /// Maximum number of attempts for transient failures.
    #[serde(default = "default_http_retry_max_attempts")]
    pub retry_max_attempts: u32,
    /// Backoff between retries in milliseconds.
    #[serde(default = "default_http_retry_backoff_ms")]
    pub retry_backoff_ms: u64,
}

const fn default_http_timeout_ms() -> u64 {
    30_000
}

const fn default_http_connect_timeout_ms() -> u64 {
    5_000
}

const fn default_http_retry_max_attempts() -> u32 {
    3
}

const fn default_http_retry_backoff_ms() -> u64 {
    1_000
}

impl Default for GithubHttpConfig {
    fn default() -> Self {
        Self {
            timeout_ms: default_http_timeout_ms(),
            connect_timeout_ms: default_http_connect_timeout_ms(),
            retry_max_attempts: default_http_retry_max_attempts(),
            retry_backoff_ms: default_http_retry_backoff_ms(),
        }
    }
}

/// GitHub REST API configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct GithubConfig {
    /// REST API base URL.
    #[serde(default = "default_api_url")]
    pub api_url: String,
    /// `User-Agent` header; GitHub rejects requests without one.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    #[serde(default)]
    pub search: GithubSearchConfig,
    #[serde(default)]
    pub http: GithubHttpConfig,
    /// API token, loaded from `GH_TOKEN` (never from the config file).
    #[serde(skip)]
    pub token: Option<String>,
}

fn default_api_url() -> String {
    "https://api.github.com".into()
}

fn default_user_agent() -> String {
    concat!("repopulse/", env!("CARGO_PKG_VERSION")).into()
}

impl Default for GithubConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            user_agent: default_user_agent(),
            search: GithubSearchConfig::default(),
            http: GithubHttpConfig::default(),
            token: None,
        }
    }
}
