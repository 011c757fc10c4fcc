//! Error types module
//!
//! This module provides the core error types used throughout the Visado
//! application. All errors are unified under the `AppError` enum, which
//! covers client-input validation, authentication/authorization, missing
//! entities, and failures in the external collaborators (blob storage, the
//! vision model, the database).
//!
//! The `Persistence` variant and `From<sqlx::Error>` are gated behind the
//! `sqlx` feature.

use std::fmt;
use std::io;

#[cfg(feature = "sqlx")]
use sqlx::Error as SqlxError;

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected errors like validation failures
    Debug,
    /// Warning level - for recoverable issues like rate limits
    Warn,
    /// Error level - for unexpected failures
    Error,
}

/// Metadata for error responses - defines how an error should be presented
/// This trait allows errors to self-describe their HTTP response characteristics
pub trait ErrorMetadata {
    /// HTTP status code to return
    fn http_status_code(&self) -> u16;

    /// Machine-readable error code (e.g., "STORAGE_ERROR")
    fn error_code(&self) -> &'static str;

    /// Whether this error is recoverable (can be retried)
    fn is_recoverable(&self) -> bool;

    /// Suggested action for the client
    fn suggested_action(&self) -> Option<&'static str>;

    /// Client-facing message (may differ from internal error message)
    fn client_message(&self) -> String;

    /// Whether details should be hidden in production
    fn is_sensitive(&self) -> bool;

    /// Log level for this error
    fn log_level(&self) -> LogLevel;
}

/// Why a vision-model invocation failed. Callers need to distinguish these:
/// bad credentials are permanent, rate limits and transient faults are not.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelFailure {
    InvalidCredentials,
    RateLimited,
    Transient,
}

impl fmt::Display for ModelFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelFailure::InvalidCredentials => write!(f, "invalid credentials"),
            ModelFailure::RateLimited => write!(f, "rate limited"),
            ModelFailure::Transient => write!(f, "transient failure"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Unauthenticated: {0}")]
    Unauthenticated(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Upstream fetch error: {0}")]
    UpstreamFetch(String),

    #[error("Model invocation failed ({cause}): {message}")]
    ModelInvocation { cause: ModelFailure, message: String },

    #[error("Malformed model response: {0}")]
    MalformedResponse(String),

    #[cfg(feature = "sqlx")]
    #[error("Persistence error: {0}")]
    Persistence(#[source] SqlxError),

    #[cfg(not(feature = "sqlx"))]
    #[error("Persistence error: {0}")]
    Persistence(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Internal error with source")]
    InternalWithSource {
        message: String,
        #[source]
        source: anyhow::Error,
    },
}

// Error conversion implementations
#[cfg(feature = "sqlx")]
impl From<SqlxError> for AppError {
    fn from(err: SqlxError) -> Self {
        match err {
            SqlxError::RowNotFound => AppError::NotFound("Record not found".to_string()),
            other => AppError::Persistence(other),
        }
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::InternalWithSource {
            message: err.to_string(),
            source: err,
        }
    }
}

impl From<io::Error> for AppError {
    fn from(err: io::Error) -> Self {
        AppError::Internal(format!("IO error: {}", err))
    }
}

impl From<uuid::Error> for AppError {
    fn from(err: uuid::Error) -> Self {
        AppError::Validation(format!("UUID parsing error: {}", err))
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::Validation(format!("Validation error: {}", err))
    }
}

/// Static metadata for each variant: (http_status, error_code, recoverable,
/// suggested_action, sensitive, log_level). Reduces duplication in the
/// ErrorMetadata impl; client_message stays per-variant for dynamic content.
fn app_error_static_metadata(
    err: &AppError,
) -> (
    u16,
    &'static str,
    bool,
    Option<&'static str>,
    bool,
    LogLevel,
) {
    match err {
        AppError::Validation(_) => (
            400,
            "VALIDATION_ERROR",
            false,
            Some("Check request parameters and try again"),
            false,
            LogLevel::Debug,
        ),
        AppError::Unauthenticated(_) => (
            401,
            "UNAUTHENTICATED",
            false,
            Some("Log in and retry with a valid session token"),
            false,
            LogLevel::Debug,
        ),
        AppError::Forbidden(_) => (
            403,
            "FORBIDDEN",
            false,
            None,
            false,
            LogLevel::Debug,
        ),
        AppError::NotFound(_) => (
            404,
            "NOT_FOUND",
            false,
            Some("Verify the resource ID exists"),
            false,
            LogLevel::Debug,
        ),
        AppError::Storage(_) => (
            500,
            "STORAGE_ERROR",
            true,
            Some("Retry after a short delay"),
            true,
            LogLevel::Error,
        ),
        AppError::UpstreamFetch(_) => (
            502,
            "UPSTREAM_FETCH_ERROR",
            true,
            Some("Retry after a short delay"),
            true,
            LogLevel::Error,
        ),
        AppError::ModelInvocation { cause, .. } => match cause {
            ModelFailure::InvalidCredentials => (
                502,
                "MODEL_AUTH_ERROR",
                false,
                Some("Contact support if this error persists"),
                true,
                LogLevel::Error,
            ),
            ModelFailure::RateLimited => (
                503,
                "MODEL_RATE_LIMITED",
                true,
                Some("Wait 30-60 seconds and retry"),
                true,
                LogLevel::Warn,
            ),
            ModelFailure::Transient => (
                502,
                "MODEL_UNAVAILABLE",
                true,
                Some("Retry after a short delay"),
                true,
                LogLevel::Error,
            ),
        },
        AppError::MalformedResponse(_) => (
            502,
            "MALFORMED_MODEL_RESPONSE",
            false,
            Some("Trigger a new review"),
            true,
            LogLevel::Error,
        ),
        AppError::Persistence(_) => (
            500,
            "PERSISTENCE_ERROR",
            true,
            Some("Retry after a short delay"),
            true,
            LogLevel::Error,
        ),
        AppError::Internal(_) => (
            500,
            "INTERNAL_ERROR",
            true,
            Some("Retry after a short delay"),
            true,
            LogLevel::Error,
        ),
        AppError::InternalWithSource { .. } => (
            500,
            "INTERNAL_ERROR",
            true,
            Some("Retry after a short delay"),
            true,
            LogLevel::Error,
        ),
    }
}

impl AppError {
    /// Get the error type name for detailed error responses
    pub fn error_type(&self) -> &str {
        match self {
            AppError::Validation(_) => "Validation",
            AppError::Unauthenticated(_) => "Unauthenticated",
            AppError::Forbidden(_) => "Forbidden",
            AppError::NotFound(_) => "NotFound",
            AppError::Storage(_) => "Storage",
            AppError::UpstreamFetch(_) => "UpstreamFetch",
            AppError::ModelInvocation { .. } => "ModelInvocation",
            AppError::MalformedResponse(_) => "MalformedResponse",
            AppError::Persistence(_) => "Persistence",
            AppError::Internal(_) => "Internal",
            AppError::InternalWithSource { .. } => "Internal",
        }
    }

    /// Get detailed error information including error chain
    pub fn detailed_message(&self) -> String {
        use std::error::Error;

        let mut details = self.to_string();

        let mut source = self.source();
        let mut depth = 0;
        while let Some(err) = source {
            depth += 1;
            if depth > 5 {
                details.push_str("\n  ... (truncated)");
                break;
            }
            details.push_str(&format!("\n  Caused by: {}", err));
            source = err.source();
        }

        details
    }
}

impl ErrorMetadata for AppError {
    fn http_status_code(&self) -> u16 {
        app_error_static_metadata(self).0
    }

    fn error_code(&self) -> &'static str {
        app_error_static_metadata(self).1
    }

    fn is_recoverable(&self) -> bool {
        app_error_static_metadata(self).2
    }

    fn suggested_action(&self) -> Option<&'static str> {
        app_error_static_metadata(self).3
    }

    fn is_sensitive(&self) -> bool {
        app_error_static_metadata(self).4
    }

    fn log_level(&self) -> LogLevel {
        app_error_static_metadata(self).5
    }

    fn client_message(&self) -> String {
        match self {
            AppError::Validation(ref msg) => msg.clone(),
            AppError::Unauthenticated(_) => "Authentication required".to_string(),
            AppError::Forbidden(_) => "Not permitted".to_string(),
            AppError::NotFound(ref msg) => msg.clone(),
            AppError::Storage(_) => "Failed to access storage".to_string(),
            AppError::UpstreamFetch(_) => "Failed to fetch document, try again".to_string(),
            AppError::ModelInvocation { .. } => {
                "Document analysis is temporarily unavailable, try again".to_string()
            }
            AppError::MalformedResponse(_) => {
                "Document analysis produced an unusable result, try again".to_string()
            }
            AppError::Persistence(_) => "Failed to access database".to_string(),
            AppError::Internal(_) => "Internal server error".to_string(),
            AppError::InternalWithSource { .. } => "Internal server error".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_metadata_validation() {
        let err = AppError::Validation("File type not allowed".to_string());
        assert_eq!(err.http_status_code(), 400);
        assert_eq!(err.error_code(), "VALIDATION_ERROR");
        assert!(!err.is_recoverable());
        assert_eq!(err.client_message(), "File type not allowed");
        assert!(!err.is_sensitive());
        assert_eq!(err.log_level(), LogLevel::Debug);
    }

    #[test]
    fn test_error_metadata_not_found() {
        let err = AppError::NotFound("Document not found".to_string());
        assert_eq!(err.http_status_code(), 404);
        assert_eq!(err.error_code(), "NOT_FOUND");
        assert!(!err.is_recoverable());
        assert_eq!(err.client_message(), "Document not found");
        assert_eq!(err.log_level(), LogLevel::Debug);
    }

    #[test]
    fn test_error_metadata_forbidden_leaks_nothing() {
        let err = AppError::Forbidden("user 42 is not the owner of application 7".to_string());
        assert_eq!(err.http_status_code(), 403);
        assert_eq!(err.client_message(), "Not permitted");
    }

    #[test]
    fn test_model_invocation_causes_are_distinguishable() {
        let auth = AppError::ModelInvocation {
            cause: ModelFailure::InvalidCredentials,
            message: "401 from upstream".to_string(),
        };
        let rate = AppError::ModelInvocation {
            cause: ModelFailure::RateLimited,
            message: "429 from upstream".to_string(),
        };
        let transient = AppError::ModelInvocation {
            cause: ModelFailure::Transient,
            message: "connection reset".to_string(),
        };

        assert_eq!(auth.error_code(), "MODEL_AUTH_ERROR");
        assert!(!auth.is_recoverable());
        assert_eq!(rate.error_code(), "MODEL_RATE_LIMITED");
        assert!(rate.is_recoverable());
        assert_eq!(rate.http_status_code(), 503);
        assert_eq!(transient.error_code(), "MODEL_UNAVAILABLE");
        assert!(transient.is_recoverable());
    }

    #[test]
    fn test_sensitive_errors_hide_detail() {
        let err = AppError::Storage("s3 credentials rejected for bucket visado-prod".to_string());
        assert!(err.is_sensitive());
        assert_eq!(err.client_message(), "Failed to access storage");

        let err = AppError::MalformedResponse("missing isValid".to_string());
        assert!(err.is_sensitive());
        assert!(!err.client_message().contains("isValid"));
    }

    #[cfg(feature = "sqlx")]
    #[test]
    fn test_sqlx_row_not_found_maps_to_not_found() {
        let err = AppError::from(sqlx::Error::RowNotFound);
        assert_eq!(err.http_status_code(), 404);

        let err = AppError::from(sqlx::Error::PoolClosed);
        assert_eq!(err.error_code(), "PERSISTENCE_ERROR");
        assert!(err.is_recoverable());
        assert_eq!(err.log_level(), LogLevel::Error);
    }
}
