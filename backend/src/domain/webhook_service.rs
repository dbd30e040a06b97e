//! Webhook subscription management and event fan-out.
//!
//! [`WebhookService::fan_out`] is what the background dispatcher runs for each
//! queued event; it never reports failures upward, only logs them.

use std::sync::Arc;

use async_trait::async_trait;
use futures_util::future::join_all;
use mockable::Clock;
use serde_json::{Value, json};
use tracing::{debug, info, warn};

use crate::domain::ports::{
    TestDelivery, WebhookAdmin, WebhookConfigPersistenceError, WebhookConfigRepository,
    WebhookTransport,
};
use crate::domain::{
    Error, EventType, Operation, Principal, WebhookConfig, WebhookConfigDraft, WebhookConfigId,
    WebhookConfigPatch, WebhookEnvelope, WebhookUrl, require,
};

fn map_repository_error(error: WebhookConfigPersistenceError) -> Error {
    match error {
        WebhookConfigPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("webhook config repository unavailable: {message}"))
        }
        WebhookConfigPersistenceError::Query { message } => {
            Error::internal(format!("webhook config repository error: {message}"))
        }
        WebhookConfigPersistenceError::Missing { config_id } => {
            Error::not_found(format!("webhook config {config_id} not found"))
        }
    }
}

fn config_not_found(id: &WebhookConfigId) -> Error {
    Error::not_found(format!("webhook config {id} not found"))
}

/// Webhook service implementing [`WebhookAdmin`] and event fan-out.
#[derive(Clone)]
pub struct WebhookService<R, T> {
    configs: Arc<R>,
    transport: Arc<T>,
    clock: Arc<dyn Clock>,
}

impl<R, T> WebhookService<R, T> {
    /// Wire the service to its subscription store and transport.
    pub fn new(configs: Arc<R>, transport: Arc<T>, clock: Arc<dyn Clock>) -> Self {
        Self {
            configs,
            transport,
            clock,
        }
    }
}

impl<R, T> WebhookService<R, T>
where
    R: WebhookConfigRepository,
    T: WebhookTransport,
{
    /// Deliver `event` to every active subscriber, concurrently and
    /// independently. Returns the number of successful deliveries.
    pub async fn fan_out(&self, event: EventType, data: Value) -> usize {
        let subscribers = match self.configs.subscribers(&event).await {
            Ok(subscribers) => subscribers,
            Err(error) => {
                warn!(event = %event, error = %error, "failed to load webhook subscribers");
                return 0;
            }
        };
        if subscribers.is_empty() {
            debug!(event = %event, "no webhook subscribers");
            return 0;
        }

        let deliveries = subscribers.iter().map(|config| {
            // Each delivery is independent and carries its own envelope id.
            let envelope = WebhookEnvelope::new(event.clone(), data.clone(), self.clock.utc());
            async move {
                match self.transport.deliver(config.url(), &envelope).await {
                    Ok(_) => {
                        info!(
                            event = %envelope.event,
                            url = %config.url(),
                            delivery_id = %envelope.id,
                            "webhook delivered"
                        );
                        true
                    }
                    Err(error) => {
                        warn!(
                            event = %envelope.event,
                            url = %config.url(),
                            delivery_id = %envelope.id,
                            error = %error,
                            "webhook delivery failed"
                        );
                        false
                    }
                }
            }
        });
        join_all(deliveries).await.into_iter().filter(|ok| *ok).count()
    }
}

#[async_trait]
impl<R, T> WebhookAdmin for WebhookService<R, T>
where
    R: WebhookConfigRepository,
    T: WebhookTransport,
{
    async fn create_config(
        &self,
        principal: &Principal,
        draft: WebhookConfigDraft,
    ) -> Result<WebhookConfig, Error> {
        require(principal, Operation::ManageWebhooks)?;
        let config = WebhookConfig::create(WebhookConfigId::random(), draft, self.clock.utc());
        self.configs
            .insert(&config)
            .await
            .map_err(map_repository_error)?;
        info!(config_id = %config.id(), url = %config.url(), "webhook config created");
        Ok(config)
    }

    async fn list_configs(&self, principal: &Principal) -> Result<Vec<WebhookConfig>, Error> {
        require(principal, Operation::ManageWebhooks)?;
        self.configs.list().await.map_err(map_repository_error)
    }

    async fn update_config(
        &self,
        principal: &Principal,
        id: &WebhookConfigId,
        patch: WebhookConfigPatch,
    ) -> Result<WebhookConfig, Error> {
        require(principal, Operation::ManageWebhooks)?;
        let mut config = self
            .configs
            .find_by_id(id)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| config_not_found(id))?;
        config.apply(patch, self.clock.utc());
        self.configs
            .update(&config)
            .await
            .map_err(map_repository_error)?;
        Ok(config)
    }

    async fn delete_config(
        &self,
        principal: &Principal,
        id: &WebhookConfigId,
    ) -> Result<(), Error> {
        require(principal, Operation::ManageWebhooks)?;
        let removed = self
            .configs
            .delete(id)
            .await
            .map_err(map_repository_error)?;
        if !removed {
            return Err(config_not_found(id));
        }
        Ok(())
    }

    async fn test_delivery(
        &self,
        principal: &Principal,
        url: &WebhookUrl,
    ) -> Result<TestDelivery, Error> {
        require(principal, Operation::ManageWebhooks)?;
        let envelope = WebhookEnvelope::new(
            EventType::test(),
            json!({"message": "This is a test webhook"}),
            self.clock.utc(),
        );
        let response = self
            .transport
            .deliver(url, &envelope)
            .await
            .map_err(|error| {
                Error::upstream_delivery_failed(format!("webhook test failed: {error}"))
            })?;
        Ok(TestDelivery { response })
    }
}

#[cfg(test)]
#[path = "webhook_service_tests.rs"]
mod tests;
