//! Port abstraction for webhook subscription storage.
use async_trait::async_trait;

use crate::domain::{EventType, WebhookConfig, WebhookConfigId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by webhook config repository adapters.
    pub enum WebhookConfigPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "webhook config repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "webhook config repository query failed: {message}",
        /// A mutation targeted a config that does not exist.
        Missing { config_id: String } => "webhook config {config_id} does not exist",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait WebhookConfigRepository: Send + Sync {
    async fn insert(&self, config: &WebhookConfig) -> Result<(), WebhookConfigPersistenceError>;

    async fn update(&self, config: &WebhookConfig) -> Result<(), WebhookConfigPersistenceError>;

    /// Remove a config, returning whether a record existed.
    async fn delete(&self, id: &WebhookConfigId) -> Result<bool, WebhookConfigPersistenceError>;

    async fn find_by_id(
        &self,
        id: &WebhookConfigId,
    ) -> Result<Option<WebhookConfig>, WebhookConfigPersistenceError>;

    /// Every config ordered by creation time.
    async fn list(&self) -> Result<Vec<WebhookConfig>, WebhookConfigPersistenceError>;

    /// Active configs subscribed to `event`.
    async fn subscribers(
        &self,
        event: &EventType,
    ) -> Result<Vec<WebhookConfig>, WebhookConfigPersistenceError>;
}
