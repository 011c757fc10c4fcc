//! Visado Services Layer
//!
//! This crate is the **business service layer**: it hosts the document
//! intake, AI review, and status workflow orchestrators plus the access
//! guard, so that the API crate depends on a single service facade. Keep
//! business logic and coordination here; keep thin HTTP handling in
//! visado-api.

pub mod services;

pub use services::access::{Actor, ensure_admin, ensure_owner_or_admin};
pub use services::intake::DocumentIntakeService;
pub use services::review::AiReviewService;
pub use services::status::ApplicationStatusService;
pub use services::store::{ApplicationStore, DocumentStore};
pub use visado_storage::{create_storage, Storage, StorageError};
