//! HTTP handlers, one module per resource operation group.

pub mod application_status;
pub mod applications;
pub mod auth;
pub mod document_delete;
pub mod document_get;
pub mod document_review;
pub mod document_upload;
pub mod health;
