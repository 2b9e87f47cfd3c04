//! GitHub REST API response types.

use serde::Deserialize;

use crate::domain::error::DomainError;
use crate::domain::id::RepoName;
use crate::domain::telemetry::{language_or_unknown, parse_timestamp, RepoTelemetry};

/// Response of `GET /search/repositories`.
#[derive(Debug, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub total_count: u64,
    #[serde(default)]
    pub items: Vec<SearchItem>,
}

/// One search hit; only the name is used, telemetry is fetched separately.
#[derive(Debug, Deserialize)]
pub struct SearchItem {
    pub full_name: String,
}

/// Response of `GET /repos/{owner}/{repo}`.
#[derive(Debug, Deserialize)]
pub struct GithubRepo {
    pub full_name: String,
    pub html_url: String,
    #[serde(default)]
    pub stargazers_count: u64,
    #[serde(default)]
    pub forks_count: u64,
    #[serde(default)]
    pub open_issues_count: u64,
    #[serde(default)]
    pub language: Option<String>,
    pub created_at: String,
    #[serde(default)]
    pub pushed_at: Option<String>,
}

/// Body of GitHub error responses.
#[derive(Debug, Deserialize)]
pub struct GithubErrorBody {
    #[serde(default)]
    pub message: String,
}

impl TryFrom<GithubRepo> for RepoTelemetry {
    type Error = DomainError;

    fn try_from(repo: GithubRepo) -> Result<Self, Self::Error> {
        let full_name = RepoName::parse(&repo.full_name)?;
        let created_at = parse_timestamp("created_at", &repo.created_at)?;
        let pushed_at = match repo.pushed_at.as_deref() {
            Some(raw) => parse_timestamp("pushed_at", raw)?,
            None => {
                return Err(DomainError::InvalidTimestamp {
                    field: "pushed_at",
                    value: "null".into(),
                })
            }
        };

        Ok(Self {
            full_name,
            html_url: repo.html_url,
            stars_now: repo.stargazers_count,
            forks_now: repo.forks_count,
            open_issues_now: repo.open_issues_count,
            language: language_or_unknown(repo.language),
            created_at,
            pushed_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const REPO_JSON: &str = r#"{
        "id": 1,
        "full_name": "acme/rocket",
        "html_url": "https://github.com/acme/rocket",
        "stargazers_count": 1234,
        "forks_count": 56,
        "open_issues_count": 7,
        "language": null,
        "created_at": "2026-10-09T08:00:00Z",
        "pushed_at": "2026-10-18T20:15:00Z",
        "archived": false
    }"#;

    #[test]
    fn repo_converts_to_telemetry() {
        let repo: GithubRepo = serde_json::from_str(REPO_JSON).unwrap();
        let telemetry = RepoTelemetry::try_from(repo).unwrap();

        assert_eq!(telemetry.full_name.as_str(), "acme/rocket");
        assert_eq!(telemetry.stars_now, 1234);
        assert_eq!(telemetry.forks_now, 56);
        assert_eq!(telemetry.open_issues_now, 7);
        assert_eq!(telemetry.language, "Unknown");
        assert!(telemetry.pushed_at > telemetry.created_at);
    }

    #[test]
    fn bad_timestamp_fails_conversion() {
        let json = REPO_JSON.replace("2026-10-09T08:00:00Z", "last tuesday");
        let repo: GithubRepo = serde_json::from_str(&json).unwrap();
        let err = RepoTelemetry::try_from(repo).unwrap_err();
        assert!(matches!(err, DomainError::InvalidTimestamp { field: "created_at", .. }));
    }

    #[test]
    fn null_push_timestamp_is_rejected() {
        let json = REPO_JSON.replace("\"2026-10-18T20:15:00Z\"", "null");
        let repo: GithubRepo = serde_json::from_str(&json).unwrap();
        let err = RepoTelemetry::try_from(repo).unwrap_err();
        assert_eq!(
            err,
            DomainError::InvalidTimestamp {
                field: "pushed_at",
                value: "null".into(),
            }
        );
    }

    #[test]
    fn search_response_tolerates_missing_items() {
        let resp: SearchResponse = serde_json::from_str(r#"{"total_count": 0}"#).unwrap();
        assert!(resp.items.is_empty());
    }
}
