//! Vision-extraction provider abstraction.
//!
//! A provider receives a document image (or PDF) plus a natural-language
//! instruction and returns the model's raw text output. Parsing and schema
//! validation happen in [`crate::review`], not here.

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;
use visado_core::{AppError, ModelFailure};

/// Failures invoking the vision model. Callers must be able to tell apart
/// bad credentials, rate limiting, and transient faults.
#[derive(Debug, Error)]
pub enum VisionError {
    #[error("Invalid credentials: {0}")]
    InvalidCredentials(String),

    #[error("Rate limited: {0}")]
    RateLimited(String),

    #[error("Transient failure: {0}")]
    Transient(String),
}

impl From<VisionError> for AppError {
    fn from(err: VisionError) -> Self {
        let (cause, message) = match err {
            VisionError::InvalidCredentials(msg) => (ModelFailure::InvalidCredentials, msg),
            VisionError::RateLimited(msg) => (ModelFailure::RateLimited, msg),
            VisionError::Transient(msg) => (ModelFailure::Transient, msg),
        };
        AppError::ModelInvocation { cause, message }
    }
}

/// Provider for vision extraction. Implemented by Gemini (cloud); mocked in
/// tests.
#[async_trait]
pub trait VisionExtractor: Send + Sync {
    /// Human-readable model name for logging (e.g. "gemini-1.5-flash").
    fn model_name(&self) -> &str;

    /// Send document bytes plus an instruction prompt to the model and
    /// return the raw text of its reply. Single attempt, no retries: retry
    /// policy, if any, belongs to the caller.
    async fn extract(
        &self,
        document: Bytes,
        content_type: &str,
        prompt: &str,
    ) -> Result<String, VisionError>;
}
