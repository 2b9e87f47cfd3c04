use thiserror::Error;

use crate::domain::error::DomainError;

/// Configuration-related errors with structured variants.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing required field: {field}")]
    MissingField { field: &'static str },

    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("failed to read config file: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[source] toml::de::Error),
}

/// Telemetry fetch errors reported by the code-hosting API.
#[derive(Error, Debug, Clone)]
pub enum FetchError {
    #[error("repository not found: {full_name}")]
    NotFound { full_name: String },

    #[error("rate limited by {api} (resets at {reset:?})")]
    RateLimited { api: String, reset: Option<i64> },

    #[error("unexpected status {status} from {url}")]
    Status { status: u16, url: String },
}

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),

    #[error("storage error: {0}")]
    Storage(String),

    #[error("predictions for {date} are already recorded at {path}")]
    BatchExists { date: chrono::NaiveDate, path: String },

    #[error("no post recorded for {date} (expected {path})")]
    MissingPost { date: chrono::NaiveDate, path: String },

    #[error(
        "predictions from {prediction_date} cannot be scored before {earliest} ({horizon_days}-day horizon)"
    )]
    ScoringTooEarly {
        prediction_date: chrono::NaiveDate,
        earliest: chrono::NaiveDate,
        horizon_days: u32,
    },
}

impl Error {
    /// True when the upstream API reported the repository as gone.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::Fetch(FetchError::NotFound { .. }))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
