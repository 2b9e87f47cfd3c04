//! Notification adapters.
//!
//! Implements the `port::Notifier` trait for the digest delivery backends.

pub mod webhook;

pub use webhook::{WebhookConfig, WebhookNotifier, WEBHOOK_URL_ENV};
