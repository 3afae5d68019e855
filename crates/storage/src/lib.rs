//! Binary storage for customer profile images.
//!
//! [`ImageStorage`] abstracts where image bytes live. [`LocalImageStorage`]
//! writes them under a directory on disk; the API serves that directory
//! under `/uploads` so stored objects are reachable at a public URL.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use crm_core::customer::CustomerImage;
use crm_core::upload::ImageUpload;

/// Errors from the image storage layer.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// A filesystem operation failed.
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The storage key contains path components that would escape the root.
    #[error("Invalid storage key: {0}")]
    InvalidKey(String),
}

/// Stores and removes image objects.
#[async_trait]
pub trait ImageStorage: Send + Sync {
    /// Persist an upload and return the reference to embed in the record.
    async fn store(&self, upload: &ImageUpload) -> Result<CustomerImage, StorageError>;

    /// Remove a stored object. Removing a missing object is not an error.
    async fn delete(&self, storage_id: &str) -> Result<(), StorageError>;
}

/// Filesystem-backed image storage.
#[derive(Debug, Clone)]
pub struct LocalImageStorage {
    root: PathBuf,
    public_base_url: String,
}

impl LocalImageStorage {
    /// * `root` - Directory objects are written into (created on demand).
    /// * `public_base_url` - URL prefix the directory is served under,
    ///   e.g. `http://localhost:5000/uploads`.
    pub fn new(root: impl Into<PathBuf>, public_base_url: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            public_base_url: public_base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Public URL for a storage key.
    pub fn url_for(&self, storage_id: &str) -> String {
        format!("{}/{storage_id}", self.public_base_url)
    }

    fn path_for(&self, storage_id: &str) -> Result<PathBuf, StorageError> {
        let valid = !storage_id.is_empty()
            && storage_id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
            && !storage_id.starts_with('.');
        if !valid {
            return Err(StorageError::InvalidKey(storage_id.to_string()));
        }
        Ok(self.root.join(storage_id))
    }
}

#[async_trait]
impl ImageStorage for LocalImageStorage {
    async fn store(&self, upload: &ImageUpload) -> Result<CustomerImage, StorageError> {
        tokio::fs::create_dir_all(&self.root).await?;

        let storage_id = format!("{}.{}", uuid::Uuid::new_v4(), upload.kind.extension());
        let path = self.path_for(&storage_id)?;
        tokio::fs::write(&path, &upload.data).await?;

        tracing::debug!(
            storage_id = %storage_id,
            original_name = %upload.file_name,
            content_type = upload.kind.mime_type(),
            bytes = upload.data.len(),
            "Stored image"
        );

        Ok(CustomerImage {
            url: self.url_for(&storage_id),
            storage_id,
        })
    }

    async fn delete(&self, storage_id: &str) -> Result<(), StorageError> {
        let path = self.path_for(storage_id)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => {
                tracing::debug!(storage_id, "Deleted image");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
