use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;
use visado_core::models::AiReview;

use crate::auth::models::AuthContext;
use crate::error::{ErrorResponse, HttpAppError, ValidatedJson};
use crate::state::AppState;

#[derive(Debug, Deserialize, ToSchema)]
pub struct ReviewRequest {
    /// The application the document must belong to.
    pub application_id: Uuid,
}

#[utoipa::path(
    post,
    path = "/api/v0/documents/{id}/review",
    tag = "documents",
    params(("id" = Uuid, Path, description = "Document ID")),
    request_body = ReviewRequest,
    responses(
        (status = 200, description = "Structured review, also stored on the application", body = AiReview),
        (status = 403, description = "Not the owner", body = ErrorResponse),
        (status = 404, description = "Document not found under this application", body = ErrorResponse),
        (status = 502, description = "Model unavailable or reply unusable", body = ErrorResponse),
        (status = 503, description = "Model rate limited", body = ErrorResponse)
    )
)]
pub async fn review_document(
    State(state): State<Arc<AppState>>,
    auth: AuthContext,
    Path(id): Path<Uuid>,
    ValidatedJson(body): ValidatedJson<ReviewRequest>,
) -> Result<Json<AiReview>, HttpAppError> {
    let review = state
        .review
        .review_document(body.application_id, id, &auth.actor())
        .await?;

    Ok(Json(review))
}
