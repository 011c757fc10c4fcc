//! Bearer-token authentication middleware.
//!
//! Verifies the JWT and inserts an [`AuthContext`] into request extensions.
//! Role comes from the signed claims, so no database round-trip happens per
//! request; a role change takes effect when the current token expires.
//!
//! [`AuthContext`]: super::models::AuthContext

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use visado_core::AppError;

use crate::auth::jwt::verify_token;
use crate::auth::models::AuthContext;
use crate::error::HttpAppError;
use crate::state::AppState;

pub async fn auth_middleware(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Response {
    let auth_header = match request
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
    {
        Some(h) => h,
        None => {
            return HttpAppError(AppError::Unauthenticated(
                "Missing authorization header".to_string(),
            ))
            .into_response();
        }
    };

    let Some(token) = auth_header.strip_prefix("Bearer ") else {
        return HttpAppError(AppError::Unauthenticated(
            "Invalid authorization header format".to_string(),
        ))
        .into_response();
    };

    let claims = match verify_token(&state.config.jwt_secret, token) {
        Ok(claims) => claims,
        Err(e) => return HttpAppError(e).into_response(),
    };

    request.extensions_mut().insert(AuthContext {
        user_id: claims.sub,
        email: claims.email,
        role: claims.role,
    });

    next.run(request).await
}
