//! Webhook notification configuration.

use serde::Deserialize;

/// Webhook notification configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct WebhookAppConfig {
    /// Deliver posts to the webhook on `notify`.
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Request timeout in milliseconds (default: 20000).
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    /// Target URL, loaded from `MAKE_WEBHOOK_URL` (never from the config file).
    #[serde(skip)]
    pub url: Option<String>,
}

const fn default_enabled() -> bool {
    true
}

const fn default_timeout_ms() -> u64 {
    20_000
}

impl Default for WebhookAppConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            timeout_ms: default_timeout_ms(),
            url: None,
        }
    }
}
