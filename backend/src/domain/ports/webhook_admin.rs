//! Driving port for managing webhook subscriptions.

use async_trait::async_trait;

use crate::domain::{
    Error, Principal, WebhookConfig, WebhookConfigDraft, WebhookConfigId, WebhookConfigPatch,
    WebhookUrl,
};

/// Successful synchronous test delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestDelivery {
    /// Body returned by the endpoint.
    pub response: String,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait WebhookAdmin: Send + Sync {
    async fn create_config(
        &self,
        principal: &Principal,
        draft: WebhookConfigDraft,
    ) -> Result<WebhookConfig, Error>;

    async fn list_configs(&self, principal: &Principal) -> Result<Vec<WebhookConfig>, Error>;

    async fn update_config(
        &self,
        principal: &Principal,
        id: &WebhookConfigId,
        patch: WebhookConfigPatch,
    ) -> Result<WebhookConfig, Error>;

    async fn delete_config(&self, principal: &Principal, id: &WebhookConfigId)
    -> Result<(), Error>;

    /// POST a `test` event to `url` and wait for the answer.
    async fn test_delivery(
        &self,
        principal: &Principal,
        url: &WebhookUrl,
    ) -> Result<TestDelivery, Error>;
}
