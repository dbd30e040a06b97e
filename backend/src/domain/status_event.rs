//! Ledger entries recording what happened to an order, and the event-type tags
//! shared between the ledger and webhook subscriptions.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use super::identifier::define_uuid_identifier;
use super::{OrderId, OrderStatus, UserId};

define_uuid_identifier! {
    /// Identifier of a single ledger entry.
    StatusEventId => "status event id"
}

/// Maximum length of an event-type tag.
pub const EVENT_TYPE_MAX: usize = 100;

/// Raised when an event-type tag is malformed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EventTypeValidationError {
    #[error("event type must not be empty")]
    Empty,
    #[error("event type must be at most {max} characters")]
    TooLong { max: usize },
    #[error("event type may only contain ASCII letters, digits, '.', '_' or '-'")]
    InvalidCharacters,
}

/// Free-form dotted tag naming an event, such as `order.created`.
///
/// # Examples
/// ```
/// use order_portal::domain::EventType;
///
/// let tag = EventType::new("status.changed").expect("valid tag");
/// assert_eq!(tag, EventType::status_changed());
/// assert!(EventType::new("has space").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EventType(String);

impl EventType {
    /// Validate an event-type tag.
    pub fn new(value: impl Into<String>) -> Result<Self, EventTypeValidationError> {
        let raw = value.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(EventTypeValidationError::Empty);
        }
        if trimmed.len() > EVENT_TYPE_MAX {
            return Err(EventTypeValidationError::TooLong {
                max: EVENT_TYPE_MAX,
            });
        }
        let valid = trimmed
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'));
        if !valid {
            return Err(EventTypeValidationError::InvalidCharacters);
        }
        Ok(Self(trimmed.to_owned()))
    }

    fn known(tag: &'static str) -> Self {
        Self(tag.to_owned())
    }

    /// Ledger and webhook tag for a newly submitted order.
    pub fn order_created() -> Self {
        Self::known("order.created")
    }

    /// Ledger and webhook tag for a status transition.
    pub fn status_changed() -> Self {
        Self::known("status.changed")
    }

    /// Webhook tag published when an order lands on `ready`.
    pub fn order_ready() -> Self {
        Self::known("order.ready")
    }

    /// Webhook tag published when a pickup time is set.
    pub fn pickup_scheduled() -> Self {
        Self::known("pickup.scheduled")
    }

    /// Webhook tag published after an order is removed.
    pub fn order_deleted() -> Self {
        Self::known("order.deleted")
    }

    /// Tag used by synchronous test deliveries.
    pub fn test() -> Self {
        Self::known("test")
    }
}

impl AsRef<str> for EventType {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<EventType> for String {
    fn from(value: EventType) -> Self {
        value.0
    }
}

impl TryFrom<String> for EventType {
    type Error = EventTypeValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// One append-only ledger entry.
///
/// ## Invariants
/// - `old_status` is `None` only for the creation event of an order.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusEvent {
    pub id: StatusEventId,
    pub order_id: OrderId,
    pub actor_id: UserId,
    pub old_status: Option<OrderStatus>,
    pub new_status: OrderStatus,
    pub event_type: EventType,
    pub metadata: Option<Value>,
    pub recorded_at: DateTime<Utc>,
}
