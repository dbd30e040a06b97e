//! Webhook delivery adapters: the background queue and the HTTP transport.

mod dispatcher;
mod http_transport;

pub use dispatcher::WebhookDispatcher;
pub use http_transport::ReqwestWebhookTransport;
