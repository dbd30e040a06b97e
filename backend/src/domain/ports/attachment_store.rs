//! Port abstraction for storing attachment bytes.
//!
//! Writes are synchronous: request handling blocks on them just as it would on
//! a local disk write.

use crate::domain::StorageLocator;

use super::define_port_error;

define_port_error! {
    /// Errors raised by attachment storage adapters.
    pub enum AttachmentStoreError {
        /// The storage root cannot be reached.
        Unavailable { message: String } => "attachment store unavailable: {message}",
        /// Writing the file failed.
        Write { locator: String, message: String } => "failed to write {locator}: {message}",
        /// Removing the file failed.
        Remove { locator: String, message: String } => "failed to remove {locator}: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
pub trait AttachmentStore: Send + Sync {
    /// Write `content` at `locator`, creating the order directory on demand.
    fn write(&self, locator: &StorageLocator, content: &[u8]) -> Result<(), AttachmentStoreError>;

    /// Remove the file at `locator`. A file that is already gone is not an error.
    fn remove(&self, locator: &StorageLocator) -> Result<(), AttachmentStoreError>;
}
