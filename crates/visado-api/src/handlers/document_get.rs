use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::auth::models::AuthContext;
use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;

#[derive(Debug, Serialize, ToSchema)]
pub struct DocumentUrlResponse {
    pub id: Uuid,
    /// Signed retrieval URL, valid for a limited time.
    pub url: String,
    /// Seconds until the URL stops working.
    pub expires_in: u64,
}

#[utoipa::path(
    get,
    path = "/api/v0/documents/{id}/url",
    tag = "documents",
    params(("id" = Uuid, Path, description = "Document ID")),
    responses(
        (status = 200, description = "Fresh retrieval URL", body = DocumentUrlResponse),
        (status = 403, description = "Not the owner", body = ErrorResponse),
        (status = 404, description = "Unknown document or missing blob", body = ErrorResponse)
    )
)]
pub async fn get_document_url(
    State(state): State<Arc<AppState>>,
    auth: AuthContext,
    Path(id): Path<Uuid>,
) -> Result<Json<DocumentUrlResponse>, HttpAppError> {
    let (document, url) = state.intake.retrieval_url(id, &auth.actor()).await?;

    Ok(Json(DocumentUrlResponse {
        id: document.id,
        url,
        expires_in: state.config.presigned_url_expiry_secs,
    }))
}
