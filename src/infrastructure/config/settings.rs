//! Application configuration loading and validation.
//!
//! Provides the main [`Config`] struct that aggregates all application settings.
//! Configuration is loaded from a TOML file; secrets (`GH_TOKEN`,
//! `MAKE_WEBHOOK_URL`) only ever come from the environment.
//!
//! # Example
//!
//! ```no_run
//! use repopulse::infrastructure::config::settings::Config;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load("config.toml")?;
//!     config.init_logging();
//!     Ok(())
//! }
//! ```

use std::path::Path;

use serde::Deserialize;
use url::Url;

use super::logging::LoggingConfig;
use super::scoring::ScoringConfig;
use super::webhook::WebhookAppConfig;
use crate::adapter::outbound::filesystem::StorageConfig;
use crate::adapter::outbound::github::GithubConfig;
use crate::adapter::outbound::notifier::WEBHOOK_URL_ENV;
use crate::application::forecast::DiscoveryWindow;
use crate::domain::digest::DigestTemplate;
use crate::domain::model::ModelSpec;
use crate::error::{ConfigError, Result};

/// Environment variable holding the GitHub API token.
pub const GITHUB_TOKEN_ENV: &str = "GH_TOKEN";

/// GitHub caps search pages at 100 results.
const MAX_PER_PAGE: usize = 100;

/// Main application configuration.
///
/// Every section is optional; a missing file or section falls back to the
/// defaults. Load from a TOML file using [`Config::load`] or parse directly
/// with [`Config::parse_toml`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Logging and tracing configuration.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// GitHub API endpoint, search window and HTTP behaviour.
    #[serde(default)]
    pub github: GithubConfig,

    /// Where dated artifacts and the outcome ledger are written.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Versioned model definition (tag plus coefficients).
    #[serde(default)]
    pub model: ModelSpec,

    #[serde(default)]
    pub scoring: ScoringConfig,

    /// Digest post layout.
    #[serde(default)]
    pub digest: DigestTemplate,

    /// Webhook delivery of digest posts.
    #[serde(default)]
    pub webhook: WebhookAppConfig,
}

impl Config {
    /// Parse configuration from TOML content.
    ///
    /// Loads secrets from the environment after parsing.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML content is malformed or validation fails.
    pub fn parse_toml(content: &str) -> Result<Self> {
        let mut config: Self = toml::from_str(content).map_err(ConfigError::Parse)?;
        config.apply_env(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, the TOML content is
    /// malformed, or validation fails.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        Self::parse_toml(&content)
    }

    /// Load `path` if it exists, otherwise use the defaults.
    ///
    /// # Errors
    ///
    /// Same as [`Config::load`] when the file exists.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        if path.as_ref().exists() {
            return Self::load(path);
        }
        let mut config = Self::default();
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Fill secrets from an environment lookup. Blank values count as unset.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        self.github.token = read(GITHUB_TOKEN_ENV);
        self.webhook.url = read(WEBHOOK_URL_ENV);
    }

    /// Initialize the tracing subscriber from the `[logging]` section.
    pub fn init_logging(&self) {
        self.logging.init();
    }

    /// Candidate selection derived from the `[github.search]` section.
    #[must_use]
    pub fn discovery_window(&self) -> DiscoveryWindow {
        DiscoveryWindow {
            created_within_days: self.github.search.created_within_days,
            min_stars: self.github.search.min_stars,
            limit: self.github.search.per_page,
        }
    }

    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] naming the first offending field.
    pub fn validate(&self) -> Result<()> {
        if !matches!(self.logging.format.as_str(), "pretty" | "json") {
            return Err(invalid("logging.format", "must be \"pretty\" or \"json\""));
        }

        Url::parse(&self.github.api_url)
            .map_err(|e| invalid("github.api_url", &e.to_string()))?;
        let search = &self.github.search;
        if search.per_page == 0 || search.per_page > MAX_PER_PAGE {
            return Err(invalid("github.search.per_page", "must be between 1 and 100"));
        }
        if search.created_within_days == 0 {
            return Err(invalid(
                "github.search.created_within_days",
                "must be greater than 0",
            ));
        }
        if self.github.http.timeout_ms == 0 {
            return Err(invalid("github.http.timeout_ms", "must be greater than 0"));
        }
        if self.github.http.retry_max_attempts == 0 {
            return Err(invalid("github.http.retry_max_attempts", "must be at least 1"));
        }

        if self.storage.ledger_file.trim().is_empty() {
            return Err(ConfigError::MissingField {
                field: "storage.ledger_file",
            }
            .into());
        }

        let tag = self.model.tag.trim();
        if tag.is_empty() {
            return Err(ConfigError::MissingField { field: "model.tag" }.into());
        }
        if tag.contains([',', '"', '\n']) {
            return Err(invalid(
                "model.tag",
                "must not contain commas, quotes or line breaks",
            ));
        }
        let coefficients = &self.model.coefficients;
        coefficients
            .validate()
            .map_err(|e| invalid("model.coefficients", &e.to_string()))?;
        if coefficients.threshold_fraction < 0.0
            || coefficients.band_floor < 0.0
            || coefficients.band_fraction < 0.0
        {
            return Err(invalid(
                "model.coefficients",
                "threshold and band parameters must be 0 or greater",
            ));
        }
        if coefficients.horizon_days == 0 {
            return Err(invalid(
                "model.coefficients.horizon_days",
                "must be greater than 0",
            ));
        }

        if self.scoring.horizon_days != coefficients.horizon_days {
            return Err(invalid(
                "scoring.horizon_days",
                &format!(
                    "must match model.coefficients.horizon_days ({})",
                    coefficients.horizon_days
                ),
            ));
        }

        if self.digest.top_n == 0 {
            return Err(invalid("digest.top_n", "must be greater than 0"));
        }
        if self.webhook.timeout_ms == 0 {
            return Err(invalid("webhook.timeout_ms", "must be greater than 0"));
        }

        Ok(())
    }
}

fn invalid(field: &'static str, reason: &str) -> crate::error::Error {
    ConfigError::InvalidValue {
        field,
        reason: reason.to_string(),
    }
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    fn parse(content: &str) -> Result<Config> {
        let config: Config = toml::from_str(content).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    fn invalid_field(content: &str) -> &'static str {
        match parse(content) {
            Err(Error::Config(ConfigError::InvalidValue { field, .. })) => field,
            other => panic!("expected invalid value, got {other:?}"),
        }
    }

    #[test]
    fn empty_file_uses_defaults() {
        let config = parse("").unwrap();
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.github.api_url, "https://api.github.com");
        assert_eq!(config.github.search.per_page, 30);
        assert_eq!(config.model.tag, "heuristic_logistic_v1");
        assert_eq!(config.scoring.horizon_days, 7);
        assert_eq!(config.digest.top_n, 5);
        assert!(config.webhook.enabled);
        assert!(config.github.token.is_none());
    }

    #[test]
    fn sections_override_defaults() {
        let config = parse(
            r#"
[github.search]
created_within_days = 7
min_stars = 100

[storage]
root = "/srv/repopulse"

[model]
tag = "heuristic_logistic_v2"

[model.coefficients]
staleness_weight = 0.5

[digest]
top_n = 10
"#,
        )
        .unwrap();

        let window = config.discovery_window();
        assert_eq!(window.created_within_days, 7);
        assert_eq!(window.min_stars, 100);
        assert_eq!(window.limit, 30);
        assert_eq!(
            config.storage.ledger_path(),
            Path::new("/srv/repopulse/data/outcomes.csv")
        );
        assert_eq!(config.model.coefficients.staleness_weight, 0.5);
        assert_eq!(config.model.coefficients.velocity_weight, 0.9);
        assert_eq!(config.digest.top_n, 10);
        assert_eq!(config.digest.title, "RepoPulse forecast (7-day breakout watchlist)");
    }

    #[test]
    fn out_of_range_values_name_their_field() {
        assert_eq!(
            invalid_field("[github.search]\nper_page = 101\n"),
            "github.search.per_page"
        );
        assert_eq!(invalid_field("[logging]\nformat = \"xml\"\n"), "logging.format");
        assert_eq!(invalid_field("[model]\ntag = \"a,b\"\n"), "model.tag");
        assert_eq!(invalid_field("[digest]\ntop_n = 0\n"), "digest.top_n");
        assert_eq!(
            invalid_field("[scoring]\nhorizon_days = 14\n"),
            "scoring.horizon_days"
        );
        assert_eq!(
            invalid_field("[model.coefficients]\nvelocity_weight = nan\n"),
            "model.coefficients"
        );
    }

    #[test]
    fn model_section_requires_tag() {
        assert!(matches!(
            parse("[model]\ntag = \"  \"\n"),
            Err(Error::Config(ConfigError::MissingField { field: "model.tag" }))
        ));
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        assert!(matches!(
            parse("[github\n"),
            Err(Error::Config(ConfigError::Parse(_)))
        ));
    }

    #[test]
    fn secrets_come_from_lookup_and_ignore_blanks() {
        let mut config = Config::default();
        config.apply_env(|key| match key {
            "GH_TOKEN" => Some("ghp_abc".into()),
            "MAKE_WEBHOOK_URL" => Some("  ".into()),
            _ => None,
        });
        assert_eq!(config.github.token.as_deref(), Some("ghp_abc"));
        assert!(config.webhook.url.is_none());
    }
}
