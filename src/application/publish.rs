//! Delivery of a recorded digest post.

use std::sync::Arc;

use chrono::NaiveDate;
use tracing::info;

use crate::domain::digest::Post;
use crate::error::{Error, Result};
use crate::port::outbound::notifier::NotifierRegistry;
use crate::port::outbound::store::{ArtifactKind, ArtifactStore};

/// Loads the post for a date and hands it to every notifier.
pub struct PublishService {
    store: Arc<dyn ArtifactStore>,
    notifiers: NotifierRegistry,
}

/// A post and the sinks that accepted it.
#[derive(Debug, Clone)]
pub struct Delivery {
    pub post: Post,
    pub sinks: Vec<&'static str>,
}

impl PublishService {
    #[must_use]
    pub fn new(store: Arc<dyn ArtifactStore>, notifiers: NotifierRegistry) -> Self {
        Self { store, notifiers }
    }

    /// Deliver the post recorded for `date`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingPost`] when no post was recorded, or the first
    /// delivery failure.
    pub async fn publish(&self, date: NaiveDate) -> Result<Delivery> {
        let post = self.store.load_post(date)?.ok_or_else(|| Error::MissingPost {
            date,
            path: self.store.locate(ArtifactKind::Post, date),
        })?;

        let sinks = self.notifiers.deliver_all(&post).await?;
        info!(post_id = %post.post_id, sinks = ?sinks, "Post delivered");
        Ok(Delivery { post, sinks })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::outbound::memory::MemoryStore;
    use crate::port::outbound::notifier::LogNotifier;
    use crate::testkit::domain::prediction_date;

    fn registry() -> NotifierRegistry {
        let mut registry = NotifierRegistry::new();
        registry.register(Box::new(LogNotifier));
        registry
    }

    #[tokio::test]
    async fn missing_post_names_the_expected_location() {
        let service = PublishService::new(Arc::new(MemoryStore::new()), registry());
        match service.publish(prediction_date()).await {
            Err(Error::MissingPost { date, path }) => {
                assert_eq!(date, prediction_date());
                assert_eq!(path, "memory://post/2026-10-12");
            }
            other => panic!("expected missing post, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn recorded_post_is_delivered() {
        let store = Arc::new(MemoryStore::new());
        let post = Post {
            post_id: Post::id_for(prediction_date()),
            date_utc: prediction_date(),
            text: "hello".into(),
        };
        store.save_post(&post).unwrap();

        let delivery = PublishService::new(store, registry())
            .publish(prediction_date())
            .await
            .unwrap();
        assert_eq!(delivery.post, post);
        assert_eq!(delivery.sinks, vec!["log"]);
    }
}
