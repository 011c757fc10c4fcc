use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;
use visado_core::models::{ApplicationResponse, ApplicationStatus};

use crate::auth::models::AuthContext;
use crate::error::{ErrorResponse, HttpAppError, ValidatedJson};
use crate::state::AppState;

#[derive(Debug, Deserialize, ToSchema)]
pub struct SetStatusRequest {
    pub status: ApplicationStatus,
}

#[utoipa::path(
    patch,
    path = "/api/v0/applications/{id}/status",
    tag = "applications",
    params(("id" = Uuid, Path, description = "Application ID")),
    request_body = SetStatusRequest,
    responses(
        (status = 200, description = "Status decided", body = ApplicationResponse),
        (status = 400, description = "Invalid transition", body = ErrorResponse),
        (status = 403, description = "Admin role required", body = ErrorResponse),
        (status = 404, description = "Unknown application", body = ErrorResponse)
    )
)]
pub async fn set_application_status(
    State(state): State<Arc<AppState>>,
    auth: AuthContext,
    Path(id): Path<Uuid>,
    ValidatedJson(body): ValidatedJson<SetStatusRequest>,
) -> Result<Json<ApplicationResponse>, HttpAppError> {
    let application = state
        .status
        .set_status(id, body.status, &auth.actor())
        .await?;

    Ok(Json(application.into()))
}
