//! Webhook delivery of digest posts.
//!
//! POSTs the [`Post`] as JSON to an automation endpoint. The URL is a
//! secret and only ever comes from the environment.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client as HttpClient;
use tracing::{info, warn};
use url::Url;

use crate::domain::digest::Post;
use crate::error::{ConfigError, Result};
use crate::port::outbound::notifier::Notifier;

/// Environment variable holding the webhook URL.
pub const WEBHOOK_URL_ENV: &str = "MAKE_WEBHOOK_URL";

/// Resolved webhook target.
#[derive(Debug, Clone)]
pub struct WebhookConfig {
    pub url: Url,
    pub timeout_ms: u64,
}

impl WebhookConfig {
    /// Build from an optional raw URL.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingField`] when the URL is absent or
    /// blank, and [`ConfigError::InvalidValue`] when it does not parse.
    pub fn new(url: Option<&str>, timeout_ms: u64) -> Result<Self> {
        let raw = url
            .map(str::trim)
            .filter(|u| !u.is_empty())
            .ok_or(ConfigError::MissingField {
                field: WEBHOOK_URL_ENV,
            })?;
        let url = Url::parse(raw).map_err(|e| ConfigError::InvalidValue {
            field: WEBHOOK_URL_ENV,
            reason: e.to_string(),
        })?;
        Ok(Self { url, timeout_ms })
    }
}

/// Notifier that POSTs posts to a webhook.
pub struct WebhookNotifier {
    http: HttpClient,
    url: Url,
}

impl WebhookNotifier {
    #[must_use]
    pub fn new(config: WebhookConfig) -> Self {
        let http = HttpClient::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .unwrap_or_else(|err| {
                warn!(error = %err, "Failed to build HTTP client, using defaults");
                HttpClient::new()
            });
        Self {
            http,
            url: config.url,
        }
    }
}

#[async_trait]
impl Notifier for WebhookNotifier {
    async fn deliver(&self, post: &Post) -> Result<()> {
        let response = self
            .http
            .post(self.url.clone())
            .json(post)
            .send()
            .await?
            .error_for_status()?;

        info!(
            post_id = %post.post_id,
            status = %response.status(),
            "Posted digest to webhook"
        );
        Ok(())
    }

    fn name(&self) -> &'static str {
        "webhook"
    }
}
