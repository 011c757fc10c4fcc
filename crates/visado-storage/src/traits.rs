//! Storage abstraction trait
//!
//! This module defines the Storage trait that all storage backends must
//! implement, so the intake and review orchestrators can work with any
//! backend without coupling to implementation details.

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;
use visado_core::{AppError, StorageBackend};

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Download failed: {0}")]
    DownloadFailed(String),

    #[error("Delete failed: {0}")]
    DeleteFailed(String),

    #[error("File not found: {0}")]
    NotFound(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("Storage backend error: {0}")]
    BackendError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound(key) => {
                AppError::NotFound(format!("Stored object not found: {}", key))
            }
            StorageError::InvalidKey(msg) => AppError::Validation(msg),
            other => AppError::Storage(other.to_string()),
        }
    }
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Storage abstraction trait
///
/// Blobs are written private; the only way to read one from outside is the
/// presigned URL. **Key format:** `documents/{unix_millis}-{random12}{.ext}`,
/// see the crate root documentation.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Write a blob under the given key, private (no public ACL).
    async fn put(&self, storage_key: &str, content_type: &str, data: Vec<u8>)
        -> StorageResult<()>;

    /// Download a blob by its storage key.
    async fn download(&self, storage_key: &str) -> StorageResult<Vec<u8>>;

    /// Delete a blob by its storage key.
    async fn delete(&self, storage_key: &str) -> StorageResult<()>;

    /// Generate a presigned/temporary URL for direct GET access.
    ///
    /// The URL expires after `expires_in`; after that the blob is once again
    /// unreachable from outside.
    async fn presigned_get_url(
        &self,
        storage_key: &str,
        expires_in: Duration,
    ) -> StorageResult<String>;

    /// Check if a blob exists.
    async fn exists(&self, storage_key: &str) -> StorageResult<bool>;

    /// Get the storage backend type.
    fn backend_type(&self) -> StorageBackend;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_error_maps_to_app_error() {
        let err: AppError = StorageError::NotFound("documents/missing.pdf".to_string()).into();
        assert!(matches!(err, AppError::NotFound(_)));

        let err: AppError = StorageError::UploadFailed("connection reset".to_string()).into();
        assert!(matches!(err, AppError::Storage(_)));

        let err: AppError = StorageError::InvalidKey("key contains ..".to_string()).into();
        assert!(matches!(err, AppError::Validation(_)));
    }
}
