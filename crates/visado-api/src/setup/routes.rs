//! Route configuration and setup

use crate::api_doc::ApiDoc;
use crate::constants::API_PREFIX;
use crate::handlers;
use crate::state::AppState;
use axum::{
    http::{HeaderValue, Method},
    routing::{delete, get, patch, post},
    Json, Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use visado_core::Config;

/// Headroom on top of the document size limit for multipart framing and the
/// other form fields.
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

/// Setup all application routes
pub fn setup_routes(config: &Config, state: Arc<AppState>) -> Result<Router, anyhow::Error> {
    let cors = setup_cors(config)?;

    // Public routes (no authentication required)
    let public_routes = public_routes(state.clone());

    // Protected routes (require authentication)
    let protected_routes = protected_routes(state.clone()).layer(
        axum::middleware::from_fn_with_state(
            state.clone(),
            crate::auth::middleware::auth_middleware,
        ),
    );

    let app = public_routes
        .merge(protected_routes)
        .nest(
            "/docs",
            utoipa_rapidoc::RapiDoc::new("/api/openapi.json")
                .path("/docs")
                .into(),
        )
        // Axum's built-in 2 MB body cap would reject full-size documents,
        // so both limits are raised to the configured maximum.
        .layer(axum::extract::DefaultBodyLimit::max(
            config.max_document_size_bytes + MULTIPART_OVERHEAD_BYTES,
        ))
        .layer(RequestBodyLimitLayer::new(
            config.max_document_size_bytes + MULTIPART_OVERHEAD_BYTES,
        ))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    Ok(app)
}

/// Setup CORS configuration
///
/// A misconfigured origin list aborts startup instead of silently shipping
/// a CORS policy that allows nothing.
fn setup_cors(config: &Config) -> Result<CorsLayer, anyhow::Error> {
    let cors = if config.cors_origins.contains(&"*".to_string()) {
        tracing::warn!("CORS configured to allow all origins - not recommended for production");
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PATCH,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers(Any)
    } else {
        let origins = config
            .cors_origins
            .iter()
            .map(|o| {
                o.parse::<HeaderValue>()
                    .map_err(|e| anyhow::anyhow!("Invalid CORS origin {:?}: {}", o, e))
            })
            .collect::<Result<Vec<HeaderValue>, anyhow::Error>>()?;

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PATCH,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers(Any)
    };
    Ok(cors)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with_origins(origins: &[&str]) -> Config {
        use visado_core::constants::{
            ALLOWED_CONTENT_TYPES, ALLOWED_EXTENSIONS, MAX_DOCUMENT_SIZE_BYTES,
        };
        use visado_core::StorageBackend;

        Config {
            server_port: 0,
            environment: "test".to_string(),
            cors_origins: origins.iter().map(|s| s.to_string()).collect(),
            database_url: "postgresql://localhost/visado".to_string(),
            db_max_connections: 2,
            db_timeout_seconds: 2,
            jwt_secret: "0123456789abcdef0123456789abcdef".to_string(),
            jwt_expiry_hours: 1,
            storage_backend: StorageBackend::Local,
            s3_bucket: None,
            s3_region: None,
            s3_endpoint: None,
            local_storage_path: Some("/tmp/visado".to_string()),
            local_storage_base_url: Some("http://localhost/files".to_string()),
            presigned_url_expiry_secs: 3600,
            document_fetch_timeout_secs: 30,
            max_document_size_bytes: MAX_DOCUMENT_SIZE_BYTES,
            document_allowed_extensions: ALLOWED_EXTENSIONS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            document_allowed_content_types: ALLOWED_CONTENT_TYPES
                .iter()
                .map(|s| s.to_string())
                .collect(),
            gemini_api_key: Some("test-key".to_string()),
            gemini_model: "gemini-1.5-flash".to_string(),
            gemini_timeout_secs: 5,
        }
    }

    #[test]
    fn test_cors_accepts_valid_origins() {
        let config = config_with_origins(&["https://app.example.com", "http://localhost:5173"]);
        assert!(setup_cors(&config).is_ok());
    }

    #[test]
    fn test_cors_wildcard_allows_any() {
        let config = config_with_origins(&["*"]);
        assert!(setup_cors(&config).is_ok());
    }

    #[test]
    fn test_cors_rejects_unparseable_origin() {
        let config = config_with_origins(&["https://ok.example.com", "bad\norigin"]);
        let err = setup_cors(&config).unwrap_err();
        assert!(err.to_string().contains("Invalid CORS origin"));
    }
}

/// Public routes (no authentication required)
fn public_routes(_state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route(
            &format!("{}/health", API_PREFIX),
            get(handlers::health::health_check),
        )
        .route(
            &format!("{}/auth/register", API_PREFIX),
            post(handlers::auth::register),
        )
        .route(
            &format!("{}/auth/login", API_PREFIX),
            post(handlers::auth::login),
        )
        .route(
            "/api/openapi.json",
            get(|| async { Json(ApiDoc::openapi()) }),
        )
}

/// Protected routes (require authentication)
fn protected_routes(_state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route(
            &format!("{}/applications", API_PREFIX),
            post(handlers::applications::create_application)
                .get(handlers::applications::list_applications),
        )
        .route(
            &format!("{}/applications/{{id}}", API_PREFIX),
            get(handlers::applications::get_application),
        )
        .route(
            &format!("{}/applications/{{id}}/status", API_PREFIX),
            patch(handlers::application_status::set_application_status),
        )
        .route(
            &format!("{}/documents", API_PREFIX),
            post(handlers::document_upload::upload_document),
        )
        .route(
            &format!("{}/documents/{{id}}/url", API_PREFIX),
            get(handlers::document_get::get_document_url),
        )
        .route(
            &format!("{}/documents/{{id}}/review", API_PREFIX),
            post(handlers::document_review::review_document),
        )
        .route(
            &format!("{}/documents/{{id}}", API_PREFIX),
            delete(handlers::document_delete::delete_document),
        )
}
