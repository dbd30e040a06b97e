//! Webhook subscriptions and the envelope delivered to subscribers.

use std::collections::BTreeSet;
use std::fmt;
use std::time::Duration;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Serialize, Serializer};
use serde_json::Value;
use thiserror::Error;
use url::Url;
use uuid::Uuid;

use super::EventType;
use super::identifier::define_uuid_identifier;

define_uuid_identifier! {
    /// Identifier of a webhook subscription.
    WebhookConfigId => "webhook config id"
}

/// Raised when a webhook target URL is unusable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WebhookUrlError {
    #[error("webhook url is not a valid absolute URL: {reason}")]
    Malformed { reason: String },
    #[error("webhook url must use http or https, got {scheme}")]
    UnsupportedScheme { scheme: String },
}

/// Absolute `http`/`https` delivery target.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct WebhookUrl(Url);

impl WebhookUrl {
    /// Parse an absolute `http` or `https` URL.
    pub fn parse(raw: &str) -> Result<Self, WebhookUrlError> {
        let url = Url::parse(raw.trim()).map_err(|err| WebhookUrlError::Malformed {
            reason: err.to_string(),
        })?;
        match url.scheme() {
            "http" | "https" => Ok(Self(url)),
            other => Err(WebhookUrlError::UnsupportedScheme {
                scheme: other.to_owned(),
            }),
        }
    }

    /// Borrow the parsed URL.
    pub fn as_url(&self) -> &Url {
        &self.0
    }
}

impl AsRef<str> for WebhookUrl {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for WebhookUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

/// Validated input for a new subscription.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebhookConfigDraft {
    pub url: WebhookUrl,
    pub events: BTreeSet<EventType>,
    pub active: bool,
}

/// Partial update of a subscription. A present `events` set replaces the old
/// one wholesale.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WebhookConfigPatch {
    pub url: Option<WebhookUrl>,
    pub events: Option<BTreeSet<EventType>>,
    pub active: Option<bool>,
}

/// A subscriber endpoint and the event tags it wants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebhookConfig {
    id: WebhookConfigId,
    url: WebhookUrl,
    events: BTreeSet<EventType>,
    active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl WebhookConfig {
    /// Build a new subscription from a validated draft.
    pub fn create(id: WebhookConfigId, draft: WebhookConfigDraft, now: DateTime<Utc>) -> Self {
        Self {
            id,
            url: draft.url,
            events: draft.events,
            active: draft.active,
            created_at: now,
            updated_at: now,
        }
    }

    /// Subscription identifier.
    pub fn id(&self) -> &WebhookConfigId {
        &self.id
    }

    /// Delivery target.
    pub fn url(&self) -> &WebhookUrl {
        &self.url
    }

    /// Subscribed event tags.
    pub fn events(&self) -> &BTreeSet<EventType> {
        &self.events
    }

    /// Whether deliveries are enabled.
    pub fn active(&self) -> bool {
        self.active
    }

    /// Creation timestamp.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Timestamp of the last change.
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Whether this subscription should receive `event`.
    pub fn wants(&self, event: &EventType) -> bool {
        self.active && self.events.contains(event)
    }

    /// Apply a partial update, bumping `updated_at`.
    pub fn apply(&mut self, patch: WebhookConfigPatch, now: DateTime<Utc>) {
        if let Some(url) = patch.url {
            self.url = url;
        }
        if let Some(events) = patch.events {
            self.events = events;
        }
        if let Some(active) = patch.active {
            self.active = active;
        }
        self.updated_at = now;
    }
}

/// JSON body POSTed to subscribers.
///
/// `occurred_at` is rendered as ISO-8601 UTC with a trailing `Z`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WebhookEnvelope {
    pub id: Uuid,
    pub event: EventType,
    #[serde(serialize_with = "serialize_utc_z")]
    pub occurred_at: DateTime<Utc>,
    pub data: Value,
}

impl WebhookEnvelope {
    /// Envelope with a fresh delivery id.
    pub fn new(event: EventType, data: Value, occurred_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            event,
            occurred_at,
            data,
        }
    }
}

fn serialize_utc_z<S>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&value.to_rfc3339_opts(SecondsFormat::Micros, true))
}

/// Default timeout for a single webhook POST.
pub const DEFAULT_WEBHOOK_TIMEOUT: Duration = Duration::from_secs(10);
/// Default capacity of the in-process notification queue.
pub const DEFAULT_WEBHOOK_QUEUE_CAPACITY: usize = 1_024;

/// Tuning for outbound webhook delivery.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WebhookDeliverySettings {
    pub timeout: Duration,
    pub queue_capacity: usize,
}

impl Default for WebhookDeliverySettings {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_WEBHOOK_TIMEOUT,
            queue_capacity: DEFAULT_WEBHOOK_QUEUE_CAPACITY,
        }
    }
}
