//! `AttachmentStore` adapter built on a capability-scoped `cap_std` directory.
//!
//! The store only ever touches paths beneath the upload root; locators are
//! relative `<order>/<file>` paths produced by the domain.

use std::io;
use std::path::Path;

use cap_std::{ambient_authority, fs::Dir};
use tracing::debug;

use crate::domain::StorageLocator;
use crate::domain::ports::{AttachmentStore, AttachmentStoreError};

/// Writes attachment bytes below a single root directory.
pub struct CapStdAttachmentStore {
    root: Dir,
}

impl CapStdAttachmentStore {
    /// Create `root` if needed and open it as the store's capability.
    ///
    /// # Errors
    ///
    /// Returns [`AttachmentStoreError::Unavailable`] when the directory cannot
    /// be created or opened.
    pub fn open(root: &Path) -> Result<Self, AttachmentStoreError> {
        Dir::create_ambient_dir_all(root, ambient_authority()).map_err(|error| {
            AttachmentStoreError::unavailable(format!("{}: {error}", root.display()))
        })?;
        let root = Dir::open_ambient_dir(root, ambient_authority()).map_err(|error| {
            AttachmentStoreError::unavailable(format!("{}: {error}", root.display()))
        })?;
        Ok(Self { root })
    }
}

impl AttachmentStore for CapStdAttachmentStore {
    fn write(&self, locator: &StorageLocator, content: &[u8]) -> Result<(), AttachmentStoreError> {
        if let Some(directory) = locator.directory() {
            self.root
                .create_dir_all(directory)
                .map_err(|error| AttachmentStoreError::write(locator.as_ref(), error.to_string()))?;
        }
        self.root
            .write(locator.as_ref(), content)
            .map_err(|error| AttachmentStoreError::write(locator.as_ref(), error.to_string()))
    }

    fn remove(&self, locator: &StorageLocator) -> Result<(), AttachmentStoreError> {
        match self.root.remove_file(locator.as_ref()) {
            Ok(()) => {}
            Err(error) if error.kind() == io::ErrorKind::NotFound => {
                debug!(locator = %locator, "attachment file already absent");
            }
            Err(error) => {
                return Err(AttachmentStoreError::remove(
                    locator.as_ref(),
                    error.to_string(),
                ));
            }
        }
        if let Some(directory) = locator.directory() {
            // Only succeeds once the order's last file is gone.
            if self.root.remove_dir(directory).is_ok() {
                debug!(directory, "removed empty order directory");
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use rstest::{fixture, rstest};
    use tempfile::TempDir;

    use super::*;
    use crate::domain::{AttachmentId, OrderId};

    #[fixture]
    fn upload_root() -> TempDir {
        tempfile::tempdir().expect("create temp dir")
    }

    fn locator(order_id: &OrderId, filename: &str) -> StorageLocator {
        StorageLocator::for_upload(order_id, &AttachmentId::random(), filename)
    }

    #[rstest]
    fn open_creates_missing_root(upload_root: TempDir) {
        let nested = upload_root.path().join("uploads/orders");

        CapStdAttachmentStore::open(&nested).expect("store opens");

        assert!(nested.is_dir());
    }

    #[rstest]
    fn write_places_file_under_order_directory(upload_root: TempDir) {
        let store = CapStdAttachmentStore::open(upload_root.path()).expect("store opens");
        let order_id = OrderId::random();
        let locator = locator(&order_id, "plan.png");

        store.write(&locator, b"png bytes").expect("write succeeds");

        let path = upload_root.path().join(locator.as_ref());
        assert_eq!(std::fs::read(&path).expect("file exists"), b"png bytes");
        assert!(path.starts_with(upload_root.path().join(order_id.to_string())));
    }

    #[rstest]
    fn remove_tolerates_missing_files(upload_root: TempDir) {
        let store = CapStdAttachmentStore::open(upload_root.path()).expect("store opens");
        let locator = locator(&OrderId::random(), "gone.zip");

        store.remove(&locator).expect("missing file is not an error");
    }

    #[rstest]
    fn remove_deletes_file_and_empty_order_directory(upload_root: TempDir) {
        let store = CapStdAttachmentStore::open(upload_root.path()).expect("store opens");
        let order_id = OrderId::random();
        let first = locator(&order_id, "a.png");
        let second = locator(&order_id, "b.png");
        store.write(&first, b"a").expect("write a");
        store.write(&second, b"b").expect("write b");

        store.remove(&first).expect("remove a");
        assert!(upload_root.path().join(order_id.to_string()).is_dir());

        store.remove(&second).expect("remove b");
        assert!(!upload_root.path().join(order_id.to_string()).exists());
    }
}
