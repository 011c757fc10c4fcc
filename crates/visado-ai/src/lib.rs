//! Visado AI Library
//!
//! Vision-extraction provider abstraction and the Gemini implementation,
//! plus the fixed review prompt and the defensive parser that turns the
//! model's untrusted free-text output into a validated [`AiReview`].
//!
//! [`AiReview`]: visado_core::models::AiReview

pub mod extractor;
pub mod gemini;
pub mod prompt;
pub mod review;

pub use extractor::{VisionError, VisionExtractor};
pub use gemini::GeminiClient;
pub use prompt::review_prompt;
pub use review::parse_review;
