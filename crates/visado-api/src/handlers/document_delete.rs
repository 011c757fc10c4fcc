use axum::{
    extract::{Path, State},
    http::StatusCode,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::auth::models::AuthContext;
use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;

#[utoipa::path(
    delete,
    path = "/api/v0/documents/{id}",
    tag = "documents",
    params(("id" = Uuid, Path, description = "Document ID")),
    responses(
        (status = 204, description = "Document and blob removed"),
        (status = 403, description = "Not the owner", body = ErrorResponse),
        (status = 404, description = "Unknown document", body = ErrorResponse)
    )
)]
pub async fn delete_document(
    State(state): State<Arc<AppState>>,
    auth: AuthContext,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, HttpAppError> {
    state.intake.delete(id, &auth.actor()).await?;
    Ok(StatusCode::NO_CONTENT)
}
