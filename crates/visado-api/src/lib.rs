//! Visado API
//!
//! Thin HTTP layer over the service facade: routing, authentication,
//! request/response shaping, and OpenAPI documentation. Business logic
//! lives in visado-services.

pub mod api_doc;
pub mod auth;
pub mod constants;
pub mod error;
pub mod handlers;
pub mod setup;
pub mod state;
pub mod telemetry;
