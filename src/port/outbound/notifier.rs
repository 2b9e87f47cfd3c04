//! Notifier port for digest delivery.
//!
//! This module defines the trait for delivering a composed [`Post`] to an
//! external sink. The sink's transport is the adapter's business.

use async_trait::async_trait;
use tracing::info;

use crate::domain::digest::Post;
use crate::error::Result;

/// Trait for notification sinks.
///
/// # Implementation Notes
///
/// - Implementations must be thread-safe (`Send + Sync`)
/// - A delivery failure is returned, not swallowed; the caller decides
///   whether it is fatal
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Deliver a post.
    async fn deliver(&self, post: &Post) -> Result<()>;

    /// Name used in logs and CLI output.
    fn name(&self) -> &'static str;
}

/// Registry of notifiers (composite pattern).
///
/// Delivers a post to every registered notifier in registration order.
pub struct NotifierRegistry {
    notifiers: Vec<Box<dyn Notifier>>,
}

impl NotifierRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self { notifiers: vec![] }
    }

    /// Register a notifier.
    pub fn register(&mut self, notifier: Box<dyn Notifier>) {
        self.notifiers.push(notifier);
    }

    /// Deliver to all registered notifiers, stopping at the first failure.
    ///
    /// Returns the names of the sinks that accepted the post.
    pub async fn deliver_all(&self, post: &Post) -> Result<Vec<&'static str>> {
        let mut delivered = Vec::with_capacity(self.notifiers.len());
        for notifier in &self.notifiers {
            notifier.deliver(post).await?;
            delivered.push(notifier.name());
        }
        Ok(delivered)
    }

    /// Number of registered notifiers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.notifiers.len()
    }

    /// Check if registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.notifiers.is_empty()
    }
}

impl Default for NotifierRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// A no-op notifier for testing or when notifications are disabled.
pub struct NullNotifier;

#[async_trait]
impl Notifier for NullNotifier {
    async fn deliver(&self, _post: &Post) -> Result<()> {
        Ok(())
    }

    fn name(&self) -> &'static str {
        "null"
    }
}

/// A logging notifier that logs posts via tracing.
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn deliver(&self, post: &Post) -> Result<()> {
        info!(
            post_id = %post.post_id,
            date = %post.date_utc,
            chars = post.text.chars().count(),
            "Digest post"
        );
        Ok(())
    }

    fn name(&self) -> &'static str {
        "log"
    }
}
