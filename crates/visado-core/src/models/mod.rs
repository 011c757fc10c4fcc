//! Domain models.

pub mod ai_review;
pub mod application;
pub mod document;
pub mod user;

pub use ai_review::{AiReview, PersonalInfo};
pub use application::{
    Application, ApplicationResponse, ApplicationStatus, StatusTransition,
};
pub use document::{Document, DocumentResponse};
pub use user::{User, UserResponse, UserRole};
