//! Portal configuration loaded via OrthoConfig.
//!
//! Every value can come from CLI flags, `ORDER_PORTAL_*` environment variables
//! or a config file. Unset values fall back to the defaults below; the derived
//! policy objects are what the rest of the crate consumes.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;
use thiserror::Error;

use crate::domain::{
    AttachmentPolicy, DEFAULT_ALLOWED_TYPES, DEFAULT_MAX_FILE_SIZE, DEFAULT_WEBHOOK_QUEUE_CAPACITY,
    DEFAULT_WEBHOOK_TIMEOUT, Email, WebhookDeliverySettings,
};

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_UPLOAD_DIR: &str = "uploads";
/// Large enough for a request carrying several base64-encoded attachments at
/// the default per-file limit.
pub const DEFAULT_MAX_REQUEST_BYTES: usize = 256 * 1024 * 1024;

/// Raised when a configured value cannot be used.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SettingsError {
    #[error("invalid bind address {value}: {reason}")]
    BindAddr { value: String, reason: String },
    #[error("invalid bootstrap admin email: {reason}")]
    BootstrapEmail { reason: String },
    #[error("bootstrap admin email and token must be set together")]
    IncompleteBootstrap,
}

/// Administrator account and token seeded at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BootstrapAdmin {
    pub email: Email,
    pub token: String,
}

/// Runtime configuration for the order portal.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "ORDER_PORTAL")]
pub struct PortalSettings {
    /// Socket address the HTTP server listens on.
    pub bind_addr: Option<String>,
    /// Root directory for stored attachments.
    pub upload_dir: Option<PathBuf>,
    /// Per-file size limit in bytes.
    pub max_file_size: Option<u64>,
    /// Comma-separated MIME allow-list.
    pub allowed_types: Option<String>,
    /// Timeout for one webhook delivery, in seconds.
    pub webhook_timeout_secs: Option<u64>,
    /// Capacity of the in-process webhook queue.
    pub webhook_queue_capacity: Option<usize>,
    /// Upper bound on a JSON request body, in bytes.
    pub max_request_bytes: Option<usize>,
    /// Email of an administrator created on startup when absent.
    pub bootstrap_admin_email: Option<String>,
    /// Bearer token registered for the bootstrap administrator.
    pub bootstrap_admin_token: Option<String>,
}

impl PortalSettings {
    /// Listening address, validated.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let raw = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        raw.trim().parse().map_err(|err: std::net::AddrParseError| {
            SettingsError::BindAddr {
                value: raw.to_owned(),
                reason: err.to_string(),
            }
        })
    }

    /// Root directory for attachment files.
    pub fn upload_dir(&self) -> PathBuf {
        self.upload_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_UPLOAD_DIR))
    }

    /// Upper bound on a JSON request body.
    pub fn max_request_bytes(&self) -> usize {
        self.max_request_bytes.unwrap_or(DEFAULT_MAX_REQUEST_BYTES)
    }

    /// Size limit and MIME allow-list applied to every upload.
    pub fn attachment_policy(&self) -> AttachmentPolicy {
        let max_file_size = self.max_file_size.unwrap_or(DEFAULT_MAX_FILE_SIZE);
        match self.allowed_types.as_deref() {
            Some(list) => AttachmentPolicy::new(max_file_size, list.split(',')),
            None => AttachmentPolicy::new(max_file_size, DEFAULT_ALLOWED_TYPES),
        }
    }

    /// Timeout and queue sizing for webhook delivery.
    pub fn webhook_delivery(&self) -> WebhookDeliverySettings {
        WebhookDeliverySettings {
            timeout: self
                .webhook_timeout_secs
                .map_or(DEFAULT_WEBHOOK_TIMEOUT, Duration::from_secs),
            queue_capacity: self
                .webhook_queue_capacity
                .unwrap_or(DEFAULT_WEBHOOK_QUEUE_CAPACITY),
        }
    }

    /// The bootstrap administrator, if one is configured.
    pub fn bootstrap_admin(&self) -> Result<Option<BootstrapAdmin>, SettingsError> {
        let email = self
            .bootstrap_admin_email
            .as_deref()
            .filter(|value| !value.trim().is_empty());
        let token = self
            .bootstrap_admin_token
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty());
        match (email, token) {
            (None, None) => Ok(None),
            (Some(email), Some(token)) => {
                let email = Email::new(email).map_err(|err| SettingsError::BootstrapEmail {
                    reason: err.to_string(),
                })?;
                Ok(Some(BootstrapAdmin {
                    email,
                    token: token.to_owned(),
                }))
            }
            _ => Err(SettingsError::IncompleteBootstrap),
        }
    }
}
