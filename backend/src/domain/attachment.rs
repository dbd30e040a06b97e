//! Files attached to an order and the policy that admits them.

use std::collections::BTreeSet;
use std::fmt;
use std::path::Path;

use chrono::{DateTime, Utc};
use thiserror::Error;

use super::OrderId;
use super::identifier::define_uuid_identifier;

define_uuid_identifier! {
    /// Identifier of a stored attachment.
    AttachmentId => "attachment id"
}

/// Default upper bound on a single upload: 50 MiB.
pub const DEFAULT_MAX_FILE_SIZE: u64 = 50 * 1024 * 1024;

/// MIME types accepted when no explicit allow-list is configured.
pub const DEFAULT_ALLOWED_TYPES: [&str; 5] = [
    "application/octet-stream",
    "application/zip",
    "image/png",
    "image/jpeg",
    "image/jpg",
];

/// Longest extension carried over from the uploaded filename.
const MAX_EXTENSION_LEN: usize = 16;

/// Reasons an upload is refused.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AttachmentRejection {
    #[error("file {filename} is {size_bytes} bytes; the limit is {max_bytes} bytes")]
    FileTooLarge {
        filename: String,
        size_bytes: u64,
        max_bytes: u64,
    },
    #[error("file {filename} has unsupported type {mime_type}")]
    UnsupportedType { filename: String, mime_type: String },
    #[error("attachment filename must not be empty")]
    EmptyFilename,
}

/// An upload as received from a client, not yet persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttachmentUpload {
    filename: String,
    mime_type: String,
    content: Vec<u8>,
}

impl AttachmentUpload {
    /// Build an upload, keeping only the final path component of `filename`.
    pub fn new(
        filename: impl AsRef<str>,
        mime_type: impl AsRef<str>,
        content: Vec<u8>,
    ) -> Result<Self, AttachmentRejection> {
        let filename = Path::new(filename.as_ref().trim())
            .file_name()
            .and_then(|name| name.to_str())
            .map(str::to_owned)
            .ok_or(AttachmentRejection::EmptyFilename)?;
        Ok(Self {
            filename,
            mime_type: mime_type.as_ref().trim().to_ascii_lowercase(),
            content,
        })
    }

    /// Client-supplied file name.
    pub fn filename(&self) -> &str {
        self.filename.as_str()
    }

    /// Declared MIME type.
    pub fn mime_type(&self) -> &str {
        self.mime_type.as_str()
    }

    /// Raw file bytes.
    pub fn content(&self) -> &[u8] {
        self.content.as_slice()
    }

    /// Content length in bytes.
    pub fn size_bytes(&self) -> u64 {
        self.content.len() as u64
    }
}

/// Size and type constraints applied at upload time.
///
/// # Examples
/// ```
/// use order_portal::domain::{AttachmentPolicy, AttachmentUpload};
///
/// let policy = AttachmentPolicy::default();
/// let png = AttachmentUpload::new("logo.png", "image/png", vec![0; 16]).unwrap();
/// assert!(policy.check(&png).is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttachmentPolicy {
    max_file_size: u64,
    allowed_types: BTreeSet<String>,
}

impl AttachmentPolicy {
    /// Policy with a per-file size limit and a MIME allow-list.
    pub fn new<I, S>(max_file_size: u64, allowed_types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            max_file_size,
            allowed_types: allowed_types
                .into_iter()
                .map(|mime| mime.as_ref().trim().to_ascii_lowercase())
                .filter(|mime| !mime.is_empty())
                .collect(),
        }
    }

    /// Per-file size limit in bytes.
    pub fn max_file_size(&self) -> u64 {
        self.max_file_size
    }

    /// Accepted MIME types.
    pub fn allowed_types(&self) -> impl Iterator<Item = &str> {
        self.allowed_types.iter().map(String::as_str)
    }

    /// Check a single upload against the size limit and the allow-list.
    pub fn check(&self, upload: &AttachmentUpload) -> Result<(), AttachmentRejection> {
        if upload.size_bytes() > self.max_file_size {
            return Err(AttachmentRejection::FileTooLarge {
                filename: upload.filename().to_owned(),
                size_bytes: upload.size_bytes(),
                max_bytes: self.max_file_size,
            });
        }
        if !self.allowed_types.contains(upload.mime_type()) {
            return Err(AttachmentRejection::UnsupportedType {
                filename: upload.filename().to_owned(),
                mime_type: upload.mime_type().to_owned(),
            });
        }
        Ok(())
    }
}

impl Default for AttachmentPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_FILE_SIZE, DEFAULT_ALLOWED_TYPES)
    }
}

/// Relative storage path `<order_id>/<attachment_id><ext>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StorageLocator(String);

impl StorageLocator {
    /// Derive the locator for an upload, keeping a sane original extension.
    ///
    /// # Examples
    /// ```
    /// use order_portal::domain::{AttachmentId, OrderId, StorageLocator};
    ///
    /// let order = OrderId::random();
    /// let file = AttachmentId::random();
    /// let locator = StorageLocator::for_upload(&order, &file, "drawing.PNG");
    /// assert_eq!(locator.as_ref(), format!("{order}/{file}.PNG"));
    /// ```
    pub fn for_upload(order_id: &OrderId, attachment_id: &AttachmentId, filename: &str) -> Self {
        let extension = Path::new(filename)
            .extension()
            .and_then(|ext| ext.to_str())
            .filter(|ext| {
                !ext.is_empty()
                    && ext.len() <= MAX_EXTENSION_LEN
                    && ext.chars().all(|c| c.is_ascii_alphanumeric())
            })
            .map(|ext| format!(".{ext}"))
            .unwrap_or_default();
        Self(format!("{order_id}/{attachment_id}{extension}"))
    }

    /// Directory component (the order id).
    pub fn directory(&self) -> Option<&str> {
        self.0.split_once('/').map(|(dir, _)| dir)
    }

    /// File component within the order directory.
    pub fn file_name(&self) -> &str {
        self.0
            .split_once('/')
            .map_or(self.0.as_str(), |(_, file)| file)
    }
}

impl AsRef<str> for StorageLocator {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for StorageLocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

/// Metadata for a stored attachment. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub id: AttachmentId,
    pub order_id: OrderId,
    pub filename: String,
    pub mime_type: String,
    pub size_bytes: u64,
    pub locator: StorageLocator,
    pub created_at: DateTime<Utc>,
}

impl Attachment {
    /// Describe an accepted upload that will be stored for `order_id`.
    pub fn for_upload(order_id: OrderId, upload: &AttachmentUpload, now: DateTime<Utc>) -> Self {
        let id = AttachmentId::random();
        Self {
            locator: StorageLocator::for_upload(&order_id, &id, upload.filename()),
            id,
            order_id,
            filename: upload.filename().to_owned(),
            mime_type: upload.mime_type().to_owned(),
            size_bytes: upload.size_bytes(),
            created_at: now,
        }
    }
}
