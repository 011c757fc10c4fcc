//! Collision-resistant key generation for uploaded documents.

use chrono::Utc;
use uuid::Uuid;
use visado_core::constants::DOCUMENT_KEY_PREFIX;

use crate::traits::{StorageError, StorageResult};

/// Generate a storage key for a new document upload.
///
/// Format: `documents/{unix_millis}-{random12}{.ext}`. The time prefix keeps
/// keys roughly sortable; the random suffix makes collisions with unrelated
/// blobs practically impossible. The original extension is preserved so the
/// blob stays identifiable in the bucket.
pub fn generate_document_key(original_filename: &str) -> StorageResult<String> {
    let extension = std::path::Path::new(original_filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .ok_or_else(|| {
            StorageError::InvalidKey(format!(
                "Filename has no extension: {}",
                original_filename
            ))
        })?;

    let suffix = &Uuid::new_v4().simple().to_string()[..12];
    Ok(format!(
        "{}/{}-{}.{}",
        DOCUMENT_KEY_PREFIX,
        Utc::now().timestamp_millis(),
        suffix,
        extension
    ))
}

/// Reject keys that could escape the document prefix.
pub fn validate_storage_key(storage_key: &str) -> StorageResult<()> {
    if storage_key.starts_with('/') || storage_key.contains("..") {
        return Err(StorageError::InvalidKey(storage_key.to_string()));
    }
    if !storage_key.starts_with(DOCUMENT_KEY_PREFIX) {
        return Err(StorageError::InvalidKey(format!(
            "Key outside the {} prefix: {}",
            DOCUMENT_KEY_PREFIX, storage_key
        )));
    }
    Ok(())
}
