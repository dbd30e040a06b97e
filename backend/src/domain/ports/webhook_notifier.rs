//! Port for fire-and-forget webhook notifications.

use serde_json::Value;

use crate::domain::EventType;

/// Hands an event to background delivery and returns immediately.
///
/// Implementations must never block on network I/O or report delivery
/// failures to the caller.
#[cfg_attr(test, mockall::automock)]
pub trait WebhookNotifier: Send + Sync {
    fn notify(&self, event: EventType, data: Value);
}

/// Notifier that discards every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOpWebhookNotifier;

impl WebhookNotifier for NoOpWebhookNotifier {
    fn notify(&self, _event: EventType, _data: Value) {}
}
