//! Visado Storage Library
//!
//! Blob-store abstraction and implementations. Uploaded documents live under
//! opaque storage keys; retrieval always goes through a time-limited signed
//! URL minted here, never a public object URL.
//!
//! # Storage key format
//!
//! `documents/{unix_millis}-{random12}{.ext}` - a time-based prefix plus a
//! random suffix so two uploads can never collide, with the original file
//! extension preserved. Keys must not contain `..` or a leading `/`. Key
//! generation is centralized in the `keys` module.

pub mod factory;
pub mod keys;
#[cfg(feature = "storage-local")]
pub mod local;
#[cfg(feature = "storage-s3")]
pub mod s3;
pub mod traits;

// Re-export commonly used types
pub use factory::create_storage;
pub use keys::generate_document_key;
#[cfg(feature = "storage-local")]
pub use local::LocalStorage;
#[cfg(feature = "storage-s3")]
pub use s3::S3Storage;
pub use traits::{Storage, StorageError, StorageResult};
pub use visado_core::StorageBackend;
