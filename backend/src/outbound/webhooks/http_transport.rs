//! Reqwest-backed webhook transport.
//!
//! Owns transport details only: JSON serialisation of the envelope, the
//! per-request timeout and mapping of HTTP outcomes to port errors.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};

use crate::domain::ports::{WebhookTransport, WebhookTransportError};
use crate::domain::{WebhookEnvelope, WebhookUrl};

const USER_AGENT: &str = concat!("order-portal-webhooks/", env!("CARGO_PKG_VERSION"));

/// POSTs envelopes with a shared connection pool.
#[derive(Clone)]
pub struct ReqwestWebhookTransport {
    client: Client,
}

impl ReqwestWebhookTransport {
    /// Build a transport whose requests fail after `timeout`.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl WebhookTransport for ReqwestWebhookTransport {
    async fn deliver(
        &self,
        url: &WebhookUrl,
        envelope: &WebhookEnvelope,
    ) -> Result<String, WebhookTransportError> {
        let response = self
            .client
            .post(url.as_url().clone())
            .json(envelope)
            .send()
            .await
            .map_err(|error| map_transport_error(url, error))?;

        let status = response.status();
        if !status.is_success() {
            return Err(map_status_error(url, status));
        }
        response
            .text()
            .await
            .map_err(|error| map_transport_error(url, error))
    }
}

fn map_transport_error(url: &WebhookUrl, error: reqwest::Error) -> WebhookTransportError {
    if error.is_timeout() {
        WebhookTransportError::timeout(url.as_ref())
    } else {
        WebhookTransportError::network(url.as_ref(), error.to_string())
    }
}

fn map_status_error(url: &WebhookUrl, status: StatusCode) -> WebhookTransportError {
    WebhookTransportError::rejected(url.as_ref(), status.as_u16())
}
