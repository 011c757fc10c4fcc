//! OpenAPI documentation.
//! API version is in `crate::constants::API_VERSION`; handler annotations
//! use the /api/v0 prefix directly.

use utoipa::OpenApi;

use crate::error;
use crate::handlers;
use visado_core::models;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Visado API",
        version = "0.1.0",
        description = "Visa application document intake and AI review API (v0). Documents are stored privately and retrieved through time-limited signed URLs; reviews are produced by a vision model and stored on the owning application. All endpoints are versioned under /api/v0/."
    ),
    paths(
        handlers::health::health_check,
        handlers::auth::register,
        handlers::auth::login,
        handlers::applications::create_application,
        handlers::applications::list_applications,
        handlers::applications::get_application,
        handlers::application_status::set_application_status,
        handlers::document_upload::upload_document,
        handlers::document_get::get_document_url,
        handlers::document_review::review_document,
        handlers::document_delete::delete_document,
    ),
    components(schemas(
        error::ErrorResponse,
        handlers::health::HealthResponse,
        handlers::auth::RegisterRequest,
        handlers::auth::LoginRequest,
        handlers::auth::AuthResponse,
        handlers::applications::CreateApplicationRequest,
        handlers::application_status::SetStatusRequest,
        handlers::document_get::DocumentUrlResponse,
        handlers::document_review::ReviewRequest,
        models::ApplicationResponse,
        models::ApplicationStatus,
        models::DocumentResponse,
        models::UserResponse,
        models::UserRole,
        models::AiReview,
        models::PersonalInfo,
    )),
    tags(
        (name = "health", description = "Liveness"),
        (name = "auth", description = "Registration and login"),
        (name = "applications", description = "Visa applications and status workflow"),
        (name = "documents", description = "Document intake, retrieval URLs, and AI review")
    )
)]
pub struct ApiDoc;
