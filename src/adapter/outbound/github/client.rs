//! GitHub REST API client.
//!
//! Supports the two API surfaces the forecast needs:
//! - **Search** (`/search/repositories`) - candidate discovery
//! - **Repos** (`/repos/{owner}/{repo}`) - per-repository telemetry
//!
//! Requests are issued one at a time. Transport failures (timeouts, refused
//! connections) and 5xx responses are retried with a fixed backoff; 4xx
//! responses are classified and returned immediately.

use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use reqwest::{Client as HttpClient, Response, StatusCode};
use tokio::time::sleep;
use tracing::{debug, info, warn};
use url::Url;

use super::dto::{GithubErrorBody, GithubRepo, SearchResponse};
use super::settings::GithubConfig;
use crate::domain::{id::RepoName, telemetry::RepoTelemetry};
use crate::error::{Error, FetchError, Result};
use crate::port::outbound::telemetry::{DiscoveryQuery, RepoDiscovery, TelemetryProvider};

const GITHUB_JSON: &str = "application/vnd.github+json";
const API_NAME: &str = "GitHub";

/// HTTP client for the GitHub REST API.
pub struct GithubClient {
    http: HttpClient,
    api_url: String,
    retry_max_attempts: u32,
    retry_backoff_ms: u64,
}

impl GithubClient {
    /// Create an unauthenticated client with default timeouts.
    ///
    /// # Arguments
    ///
    /// * `api_url` - The base URL for the REST API (e.g., `https://api.github.com`)
    #[must_use]
    pub fn new(api_url: String) -> Self {
        Self::from_config(&GithubConfig {
            api_url,
            ..GithubConfig::default()
        })
    }

    #[must_use]
    pub fn from_config(config: &GithubConfig) -> Self {
        let http = HttpClient::builder()
            .timeout(Duration::from_millis(config.http.timeout_ms))
            .connect_timeout(Duration::from_millis(config.http.connect_timeout_ms))
            .user_agent(config.user_agent.clone())
            .default_headers(default_headers(config.token.as_deref()))
            .build()
            .unwrap_or_else(|err| {
                warn!(error = %err, "Failed to build HTTP client, using defaults");
                HttpClient::new()
            });

        Self {
            http,
            api_url: config.api_url.trim_end_matches('/').to_string(),
            retry_max_attempts: config.http.retry_max_attempts,
            retry_backoff_ms: config.http.retry_backoff_ms,
        }
    }

    /// Build the search URL for a discovery query.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured base URL is not a valid URL.
    pub fn search_url(&self, query: &DiscoveryQuery) -> Result<Url> {
        let q = search_qualifiers(query.created_since, query.min_stars);
        let url = Url::parse_with_params(
            &format!("{}/search/repositories", self.api_url),
            &[
                ("q", q.as_str()),
                ("sort", "stars"),
                ("order", "desc"),
                ("per_page", &query.limit.to_string()),
            ],
        )?;
        Ok(url)
    }

    fn repo_url(&self, name: &RepoName) -> String {
        format!("{}/repos/{}", self.api_url, name)
    }

    async fn get_with_retry<T>(&self, url: &str) -> Result<T>
    where
        T: serde::de::DeserializeOwned,
    {
        let mut attempt = 0;
        let max_attempts = self.retry_max_attempts.max(1);

        loop {
            attempt += 1;
            let response = match self.http.get(url).send().await {
                Ok(response) => response,
                Err(err) => {
                    if attempt >= max_attempts || !Self::should_retry(&err) {
                        return Err(err.into());
                    }
                    self.backoff(attempt, max_attempts, &err.to_string()).await;
                    continue;
                }
            };

            let status = response.status();
            if status.is_server_error() && attempt < max_attempts {
                self.backoff(attempt, max_attempts, &status.to_string()).await;
                continue;
            }
            if !status.is_success() {
                return Err(Self::classify(response, url).await.into());
            }

            return Ok(response.json::<T>().await?);
        }
    }

    fn should_retry(err: &reqwest::Error) -> bool {
        err.is_timeout() || err.is_connect()
    }

    async fn backoff(&self, attempt: u32, max_attempts: u32, reason: &str) {
        warn!(
            attempt,
            max_attempts,
            reason,
            "GitHub request failed, retrying"
        );
        if self.retry_backoff_ms > 0 {
            sleep(Duration::from_millis(self.retry_backoff_ms)).await;
        }
    }

    async fn classify(response: Response, url: &str) -> FetchError {
        let status = response.status();
        let headers = response.headers();
        let remaining = header_str(headers, "x-ratelimit-remaining");
        let reset = header_str(headers, "x-ratelimit-reset").and_then(|v| v.parse::<i64>().ok());

        let rate_limited = status == StatusCode::TOO_MANY_REQUESTS
            || (status == StatusCode::FORBIDDEN && remaining.as_deref() == Some("0"));
        if rate_limited {
            return FetchError::RateLimited {
                api: API_NAME.to_string(),
                reset,
            };
        }

        if let Ok(body) = response.json::<GithubErrorBody>().await {
            debug!(status = %status, message = %body.message, "GitHub error response");
        }
        FetchError::Status {
            status: status.as_u16(),
            url: url.to_string(),
        }
    }
}

fn default_headers(token: Option<&str>) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static(GITHUB_JSON));
    if let Some(token) = token.filter(|t| !t.is_empty()) {
        match HeaderValue::from_str(&format!("Bearer {token}")) {
            Ok(mut value) => {
                value.set_sensitive(true);
                headers.insert(AUTHORIZATION, value);
            }
            Err(_) => warn!("GH_TOKEN contains invalid header characters, ignoring it"),
        }
    }
    headers
}

fn header_str(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(ToOwned::to_owned)
}

/// Search qualifiers: recently created, minimum stars, not archived.
fn search_qualifiers(created_since: NaiveDate, min_stars: u64) -> String {
    format!("created:>={created_since} stars:>={min_stars} archived:false")
}

/// Statuses meaning the repository is gone rather than unreachable.
fn is_gone(status: u16) -> bool {
    matches!(status, 404 | 410 | 451)
}

#[async_trait]
impl RepoDiscovery for GithubClient {
    async fn discover(&self, query: &DiscoveryQuery) -> Result<Vec<RepoName>> {
        let url = self.search_url(query)?;
        info!(url = %url, "Searching repositories");

        let response: SearchResponse = self.get_with_retry(url.as_str()).await?;
        debug!(
            total = response.total_count,
            returned = response.items.len(),
            "Search complete"
        );

        let mut names = Vec::with_capacity(response.items.len());
        for item in response.items.into_iter().take(query.limit) {
            names.push(RepoName::parse(&item.full_name)?);
        }
        Ok(names)
    }
}

#[async_trait]
impl TelemetryProvider for GithubClient {
    async fn fetch(&self, name: &RepoName) -> Result<RepoTelemetry> {
        let url = self.repo_url(name);
        debug!(repo = %name, "Fetching telemetry");

        match self.get_with_retry::<GithubRepo>(&url).await {
            Ok(repo) => Ok(RepoTelemetry::try_from(repo)?),
            Err(Error::Fetch(FetchError::Status { status, .. })) if is_gone(status) => {
                Err(FetchError::NotFound {
                    full_name: name.to_string(),
                }
                .into())
            }
            Err(err) => Err(err),
        }
    }

    fn provider_name(&self) -> &'static str {
        API_NAME
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query() -> DiscoveryQuery {
        DiscoveryQuery {
            created_since: NaiveDate::from_ymd_opt(2026, 10, 5).unwrap(),
            min_stars: 50,
            limit: 30,
        }
    }

    #[test]
    fn search_url_encodes_qualifiers() {
        let client = GithubClient::new("https://api.github.com/".into());
        let url = client.search_url(&query()).unwrap();

        assert_eq!(url.path(), "/search/repositories");
        let pairs: Vec<(String, String)> = url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        assert!(pairs.contains(&(
            "q".into(),
            "created:>=2026-10-05 stars:>=50 archived:false".into()
        )));
        assert!(pairs.contains(&("sort".into(), "stars".into())));
        assert!(pairs.contains(&("order".into(), "desc".into())));
        assert!(pairs.contains(&("per_page".into(), "30".into())));
    }

    #[test]
    fn repo_url_joins_name() {
        let client = GithubClient::new("https://ghe.example.com/api/v3".into());
        assert_eq!(
            client.repo_url(&RepoName::new("acme/rocket")),
            "https://ghe.example.com/api/v3/repos/acme/rocket"
        );
    }

    #[test]
    fn token_becomes_sensitive_bearer_header() {
        let headers = default_headers(Some("abc123"));
        let auth = headers.get(AUTHORIZATION).unwrap();
        assert!(auth.is_sensitive());
        assert_eq!(auth.to_str().unwrap(), "Bearer abc123");
        assert!(default_headers(None).get(AUTHORIZATION).is_none());
        assert!(default_headers(Some("")).get(AUTHORIZATION).is_none());
    }

    #[test]
    fn gone_statuses() {
        assert!(is_gone(404));
        assert!(is_gone(451));
        assert!(!is_gone(500));
        assert!(!is_gone(403));
    }
}
