use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;
use validator::Validate;
use visado_core::models::{UserResponse, UserRole};
use visado_core::AppError;

use crate::auth::jwt::issue_token;
use crate::auth::password::{hash_password, verify_password};
use crate::error::{ErrorResponse, HttpAppError, ValidatedJson};
use crate::state::AppState;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterRequest {
    #[validate(email(message = "A valid email address is required"))]
    pub email: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
    pub name: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserResponse,
}

#[utoipa::path(
    post,
    path = "/api/v0/auth/register",
    tag = "auth",
    request_body = RegisterRequest,
    responses(
        (status = 200, description = "Account created", body = AuthResponse),
        (status = 400, description = "Invalid input", body = ErrorResponse)
    )
)]
pub async fn register(
    State(state): State<Arc<AppState>>,
    ValidatedJson(body): ValidatedJson<RegisterRequest>,
) -> Result<Json<AuthResponse>, HttpAppError> {
    body.validate().map_err(AppError::from)?;

    let password_hash = hash_password(&body.password)?;

    // Registration always yields a regular user; admins are created by the
    // seed binary.
    let user = state
        .users
        .create(body.email, password_hash, body.name, UserRole::User)
        .await?;

    let token = issue_token(
        &state.config.jwt_secret,
        user.id,
        &user.email,
        user.role,
        state.config.jwt_expiry_hours,
    )?;

    tracing::info!(user_id = %user.id, "User registered");

    Ok(Json(AuthResponse {
        token,
        user: user.into(),
    }))
}

#[utoipa::path(
    post,
    path = "/api/v0/auth/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Authenticated", body = AuthResponse),
        (status = 401, description = "Invalid credentials", body = ErrorResponse)
    )
)]
pub async fn login(
    State(state): State<Arc<AppState>>,
    ValidatedJson(body): ValidatedJson<LoginRequest>,
) -> Result<Json<AuthResponse>, HttpAppError> {
    // Same rejection for unknown email and wrong password.
    let user = state
        .users
        .get_by_email(&body.email)
        .await?
        .filter(|user| verify_password(&body.password, &user.password_hash))
        .ok_or_else(|| AppError::Unauthenticated("Invalid email or password".to_string()))?;

    let token = issue_token(
        &state.config.jwt_secret,
        user.id,
        &user.email,
        user.role,
        state.config.jwt_expiry_hours,
    )?;

    tracing::info!(user_id = %user.id, "User logged in");

    Ok(Json(AuthResponse {
        token,
        user: user.into(),
    }))
}
