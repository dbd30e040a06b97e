//! Attachment file storage rooted at the configured upload directory.

mod cap_std_attachment_store;

pub use cap_std_attachment_store::CapStdAttachmentStore;
