//! Background webhook dispatcher.
//!
//! [`WebhookDispatcher`] implements the [`WebhookNotifier`] port with a bounded
//! in-process queue. `notify` only enqueues; a worker task drains the queue and
//! runs [`WebhookService::fan_out`] for each event in its own task, inside the
//! trace scope that was active when the event was raised. Nothing is persisted:
//! queued events are lost on shutdown.

use std::sync::Arc;

use serde_json::Value;
use tokio::sync::mpsc::{self, error::TrySendError};
use tracing::{debug, warn};

use crate::domain::ports::{WebhookConfigRepository, WebhookNotifier, WebhookTransport};
use crate::domain::{EventType, TraceId, WebhookService};

struct QueuedEvent {
    event: EventType,
    data: Value,
    trace_id: Option<TraceId>,
}

/// Queue-backed notifier feeding a single worker task.
#[derive(Clone)]
pub struct WebhookDispatcher {
    sender: mpsc::Sender<QueuedEvent>,
}

impl WebhookDispatcher {
    /// Start the worker on the current Tokio runtime.
    ///
    /// The worker stops once every dispatcher handle has been dropped and the
    /// queue is drained.
    pub fn spawn<R, T>(service: Arc<WebhookService<R, T>>, queue_capacity: usize) -> Self
    where
        R: WebhookConfigRepository + 'static,
        T: WebhookTransport + 'static,
    {
        let (sender, mut receiver) = mpsc::channel::<QueuedEvent>(queue_capacity.max(1));
        tokio::spawn(async move {
            while let Some(queued) = receiver.recv().await {
                let service = Arc::clone(&service);
                let QueuedEvent {
                    event,
                    data,
                    trace_id,
                } = queued;
                tokio::spawn(TraceId::scope_optional(trace_id, async move {
                    let delivered = service.fan_out(event.clone(), data).await;
                    debug!(event = %event, delivered, "webhook fan-out finished");
                }));
            }
            debug!("webhook dispatcher stopped");
        });
        Self { sender }
    }
}

impl WebhookNotifier for WebhookDispatcher {
    fn notify(&self, event: EventType, data: Value) {
        let queued = QueuedEvent {
            event,
            data,
            trace_id: TraceId::current(),
        };
        match self.sender.try_send(queued) {
            Ok(()) => {}
            Err(TrySendError::Full(queued)) => {
                warn!(event = %queued.event, "webhook queue full; event dropped");
            }
            Err(TrySendError::Closed(queued)) => {
                warn!(event = %queued.event, "webhook dispatcher stopped; event dropped");
            }
        }
    }
}
