//! HTTP server configuration object.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use mockable::{Clock, DefaultClock};

use crate::domain::{AttachmentPolicy, WebhookDeliverySettings};
use crate::settings::{BootstrapAdmin, DEFAULT_MAX_REQUEST_BYTES, PortalSettings, SettingsError};

/// Builder-style configuration for assembling the portal and its server.
#[derive(Clone)]
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) upload_dir: PathBuf,
    pub(crate) attachment_policy: AttachmentPolicy,
    pub(crate) webhook_delivery: WebhookDeliverySettings,
    pub(crate) max_request_bytes: usize,
    pub(crate) bootstrap_admin: Option<BootstrapAdmin>,
    pub(crate) clock: Arc<dyn Clock>,
}

impl ServerConfig {
    /// Defaults for everything except the listener and upload directory.
    #[must_use]
    pub fn new(bind_addr: SocketAddr, upload_dir: impl Into<PathBuf>) -> Self {
        Self {
            bind_addr,
            upload_dir: upload_dir.into(),
            attachment_policy: AttachmentPolicy::default(),
            webhook_delivery: WebhookDeliverySettings::default(),
            max_request_bytes: DEFAULT_MAX_REQUEST_BYTES,
            bootstrap_admin: None,
            clock: Arc::new(DefaultClock),
        }
    }

    /// Resolve a configuration from loaded settings.
    pub fn from_settings(settings: &PortalSettings) -> Result<Self, SettingsError> {
        let mut config = Self::new(settings.bind_addr()?, settings.upload_dir())
            .with_attachment_policy(settings.attachment_policy())
            .with_webhook_delivery(settings.webhook_delivery())
            .with_max_request_bytes(settings.max_request_bytes());
        config.bootstrap_admin = settings.bootstrap_admin()?;
        Ok(config)
    }

    /// Override the attachment size and type policy.
    #[must_use]
    pub fn with_attachment_policy(mut self, policy: AttachmentPolicy) -> Self {
        self.attachment_policy = policy;
        self
    }

    /// Override webhook timeout and queue capacity.
    #[must_use]
    pub fn with_webhook_delivery(mut self, delivery: WebhookDeliverySettings) -> Self {
        self.webhook_delivery = delivery;
        self
    }

    /// Override the JSON body limit.
    #[must_use]
    pub fn with_max_request_bytes(mut self, limit: usize) -> Self {
        self.max_request_bytes = limit;
        self
    }

    /// Seed an administrator account and token at startup.
    #[must_use]
    pub fn with_bootstrap_admin(mut self, admin: BootstrapAdmin) -> Self {
        self.bootstrap_admin = Some(admin);
        self
    }

    /// Replace the wall clock, typically with a fixture in tests.
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Address the server binds to.
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }

    /// JSON body limit in bytes.
    #[must_use]
    pub fn max_request_bytes(&self) -> usize {
        self.max_request_bytes
    }
}
