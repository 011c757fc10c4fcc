//! Shared constants.

/// Maximum accepted upload size for a supporting document (10 MiB).
pub const MAX_DOCUMENT_SIZE_BYTES: usize = 10 * 1024 * 1024;

/// Content types accepted at every upload boundary.
pub const ALLOWED_CONTENT_TYPES: &[&str] =
    &["application/pdf", "image/jpeg", "image/jpg", "image/png"];

/// File extensions accepted at every upload boundary.
pub const ALLOWED_EXTENSIONS: &[&str] = &["pdf", "jpg", "jpeg", "png"];

/// Storage key prefix for uploaded documents.
pub const DOCUMENT_KEY_PREFIX: &str = "documents";

/// Lifetime of a presigned retrieval URL, in seconds.
pub const PRESIGNED_URL_EXPIRY_SECS: u64 = 3600;

/// Timeout for fetching a stored document back through its signed URL,
/// in seconds.
pub const DOCUMENT_FETCH_TIMEOUT_SECS: u64 = 30;
