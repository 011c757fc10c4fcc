//! Upload validation rules.
//!
//! These checks run before any network call: a rejected file must cause no
//! blob write and no registry insert. The same limits are duplicated at the
//! transport boundary (request body limit) for defense in depth.

use std::path::Path;

use crate::constants::{ALLOWED_CONTENT_TYPES, ALLOWED_EXTENSIONS, MAX_DOCUMENT_SIZE_BYTES};
use crate::error::AppError;

/// Validation failures for an uploaded document.
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("File size {size} bytes exceeds maximum of {max} bytes")]
    FileTooLarge { size: usize, max: usize },

    #[error("Invalid extension '{extension}', allowed: {allowed:?}")]
    InvalidExtension {
        extension: String,
        allowed: Vec<String>,
    },

    #[error("Invalid content type '{content_type}', allowed: {allowed:?}")]
    InvalidContentType {
        content_type: String,
        allowed: Vec<String>,
    },

    #[error("Content type '{content_type}' does not match extension '{extension}'")]
    ContentTypeExtensionMismatch {
        content_type: String,
        extension: String,
    },

    #[error("Missing file extension (filename: {0})")]
    MissingExtension(String),

    #[error("File is empty")]
    EmptyFile,

    #[error("Document type is required")]
    MissingDocumentType,
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        AppError::Validation(err.to_string())
    }
}

/// Size limit and allow-lists applied to document uploads.
#[derive(Debug, Clone)]
pub struct UploadLimits {
    pub max_file_size: usize,
    pub allowed_extensions: Vec<String>,
    pub allowed_content_types: Vec<String>,
}

impl Default for UploadLimits {
    fn default() -> Self {
        Self {
            max_file_size: MAX_DOCUMENT_SIZE_BYTES,
            allowed_extensions: ALLOWED_EXTENSIONS.iter().map(|s| s.to_string()).collect(),
            allowed_content_types: ALLOWED_CONTENT_TYPES
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

/// Extract the lowercase extension from a filename.
fn file_extension(filename: &str) -> Option<String> {
    Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
}

/// Validate that Content-Type matches the file extension. Prevents
/// Content-Type spoofing where a disallowed payload is uploaded with an
/// allowed Content-Type.
fn validate_extension_content_type_match(
    extension: &str,
    content_type: &str,
) -> Result<(), ValidationError> {
    let normalized = content_type.to_lowercase();
    let expected: &[&str] = match extension {
        "jpg" | "jpeg" => &["image/jpeg", "image/jpg"],
        "png" => &["image/png"],
        "pdf" => &["application/pdf"],
        // Unknown extensions are rejected by the allow-list before this point.
        _ => return Ok(()),
    };

    if !expected
        .iter()
        .any(|ct| normalized == *ct || normalized.starts_with(&format!("{};", ct)))
    {
        return Err(ValidationError::ContentTypeExtensionMismatch {
            content_type: content_type.to_string(),
            extension: extension.to_string(),
        });
    }

    Ok(())
}

/// Validate a document upload against the configured limits.
///
/// Checks run cheapest-first and fail fast; the caller must not have touched
/// storage or the database yet.
pub fn validate_document_upload(
    filename: &str,
    content_type: &str,
    size: usize,
    document_type: &str,
    limits: &UploadLimits,
) -> Result<(), ValidationError> {
    if document_type.trim().is_empty() {
        return Err(ValidationError::MissingDocumentType);
    }

    if size == 0 {
        return Err(ValidationError::EmptyFile);
    }

    if size > limits.max_file_size {
        return Err(ValidationError::FileTooLarge {
            size,
            max: limits.max_file_size,
        });
    }

    let normalized_ct = content_type
        .split(';')
        .next()
        .unwrap_or(content_type)
        .trim()
        .to_lowercase();
    if !limits
        .allowed_content_types
        .iter()
        .any(|ct| ct == &normalized_ct)
    {
        return Err(ValidationError::InvalidContentType {
            content_type: content_type.to_string(),
            allowed: limits.allowed_content_types.clone(),
        });
    }

    let extension = file_extension(filename)
        .ok_or_else(|| ValidationError::MissingExtension(filename.to_string()))?;
    if !limits.allowed_extensions.iter().any(|e| e == &extension) {
        return Err(ValidationError::InvalidExtension {
            extension,
            allowed: limits.allowed_extensions.clone(),
        });
    }

    validate_extension_content_type_match(&extension, content_type)?;

    Ok(())
}
