//! In-memory `WebhookConfigRepository` adapter.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::ports::{WebhookConfigPersistenceError, WebhookConfigRepository};
use crate::domain::{EventType, WebhookConfig, WebhookConfigId};

/// Process-local webhook subscription store.
#[derive(Default)]
pub struct MemoryWebhookConfigRepository {
    configs: RwLock<HashMap<WebhookConfigId, WebhookConfig>>,
}

impl MemoryWebhookConfigRepository {
    /// Create an empty repository.
    pub fn new() -> Self {
        Self::default()
    }
}

fn by_creation(mut configs: Vec<WebhookConfig>) -> Vec<WebhookConfig> {
    configs.sort_by(|a, b| {
        a.created_at()
            .cmp(&b.created_at())
            .then_with(|| a.id().cmp(b.id()))
    });
    configs
}

#[async_trait]
impl WebhookConfigRepository for MemoryWebhookConfigRepository {
    async fn insert(&self, config: &WebhookConfig) -> Result<(), WebhookConfigPersistenceError> {
        let mut configs = self.configs.write().await;
        if configs.contains_key(config.id()) {
            return Err(WebhookConfigPersistenceError::query(format!(
                "webhook config {} already exists",
                config.id()
            )));
        }
        configs.insert(*config.id(), config.clone());
        Ok(())
    }

    async fn update(&self, config: &WebhookConfig) -> Result<(), WebhookConfigPersistenceError> {
        let mut configs = self.configs.write().await;
        let stored = configs
            .get_mut(config.id())
            .ok_or_else(|| WebhookConfigPersistenceError::missing(config.id().to_string()))?;
        *stored = config.clone();
        Ok(())
    }

    async fn delete(&self, id: &WebhookConfigId) -> Result<bool, WebhookConfigPersistenceError> {
        Ok(self.configs.write().await.remove(id).is_some())
    }

    async fn find_by_id(
        &self,
        id: &WebhookConfigId,
    ) -> Result<Option<WebhookConfig>, WebhookConfigPersistenceError> {
        Ok(self.configs.read().await.get(id).cloned())
    }

    async fn list(&self) -> Result<Vec<WebhookConfig>, WebhookConfigPersistenceError> {
        let configs = self.configs.read().await;
        Ok(by_creation(configs.values().cloned().collect()))
    }

    async fn subscribers(
        &self,
        event: &EventType,
    ) -> Result<Vec<WebhookConfig>, WebhookConfigPersistenceError> {
        let configs = self.configs.read().await;
        Ok(by_creation(
            configs
                .values()
                .filter(|config| config.wants(event))
                .cloned()
                .collect(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;
    use crate::domain::{WebhookConfigDraft, WebhookConfigPatch, WebhookUrl};
    use crate::test_support::fixture_timestamp;

    fn config(events: &[EventType], active: bool) -> WebhookConfig {
        WebhookConfig::create(
            WebhookConfigId::random(),
            WebhookConfigDraft {
                url: WebhookUrl::parse("https://hooks.example/in").expect("valid url"),
                events: events.iter().cloned().collect(),
                active,
            },
            fixture_timestamp(),
        )
    }

    #[tokio::test]
    async fn subscribers_are_active_configs_listing_the_event() {
        let repo = MemoryWebhookConfigRepository::new();
        let wanted = config(&[EventType::status_changed()], true);
        let inactive = config(&[EventType::status_changed()], false);
        let other_event = config(&[EventType::order_created()], true);
        for config in [&wanted, &inactive, &other_event] {
            repo.insert(config).await.expect("insert");
        }

        let subscribers = repo
            .subscribers(&EventType::status_changed())
            .await
            .expect("query succeeds");

        assert_eq!(subscribers, vec![wanted]);
    }

    #[tokio::test]
    async fn update_replaces_stored_config() {
        let repo = MemoryWebhookConfigRepository::new();
        let mut stored = config(&[EventType::order_created()], true);
        repo.insert(&stored).await.expect("insert");

        stored.apply(
            WebhookConfigPatch {
                events: Some(BTreeSet::from([EventType::order_deleted()])),
                ..WebhookConfigPatch::default()
            },
            fixture_timestamp(),
        );
        repo.update(&stored).await.expect("update");

        let fetched = repo
            .find_by_id(stored.id())
            .await
            .expect("lookup")
            .expect("config stored");
        assert_eq!(fetched, stored);
    }

    #[tokio::test]
    async fn update_of_missing_config_fails() {
        let repo = MemoryWebhookConfigRepository::new();

        let error = repo
            .update(&config(&[EventType::test()], true))
            .await
            .expect_err("config absent");

        assert!(matches!(
            error,
            WebhookConfigPersistenceError::Missing { .. }
        ));
    }
}
