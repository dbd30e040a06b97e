//! Port for delivering a single webhook envelope over the network.

use async_trait::async_trait;

use crate::domain::{WebhookEnvelope, WebhookUrl};

use super::define_port_error;

define_port_error! {
    /// Delivery failures reported by transport adapters.
    pub enum WebhookTransportError {
        /// The request timed out.
        Timeout { url: String } => "webhook delivery to {url} timed out",
        /// The endpoint could not be reached.
        Network { url: String, message: String } => "webhook delivery to {url} failed: {message}",
        /// The endpoint answered with a non-2xx status.
        Rejected { url: String, status: u16 } => "webhook endpoint {url} responded with status {status}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait WebhookTransport: Send + Sync {
    /// POST `envelope` as JSON; succeed only on a 2xx answer, returning its body.
    async fn deliver(
        &self,
        url: &WebhookUrl,
        envelope: &WebhookEnvelope,
    ) -> Result<String, WebhookTransportError>;
}
