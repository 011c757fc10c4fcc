use axum::{
    extract::{Path, State},
    Json,
};
use chrono::NaiveDate;
use serde::Deserialize;
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;
use visado_core::models::{ApplicationResponse, DocumentResponse};
use visado_core::AppError;

use crate::auth::models::AuthContext;
use crate::error::{ErrorResponse, HttpAppError, ValidatedJson};
use crate::state::AppState;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateApplicationRequest {
    pub destination_country: String,
    pub origin_country: String,
    pub visa_type: String,
    pub purpose: Option<String>,
    pub travel_date: Option<NaiveDate>,
    pub return_date: Option<NaiveDate>,
}

#[utoipa::path(
    post,
    path = "/api/v0/applications",
    tag = "applications",
    request_body = CreateApplicationRequest,
    responses(
        (status = 200, description = "Application created", body = ApplicationResponse),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse)
    )
)]
pub async fn create_application(
    State(state): State<Arc<AppState>>,
    auth: AuthContext,
    ValidatedJson(body): ValidatedJson<CreateApplicationRequest>,
) -> Result<Json<ApplicationResponse>, HttpAppError> {
    for (field, value) in [
        ("destination_country", &body.destination_country),
        ("origin_country", &body.origin_country),
        ("visa_type", &body.visa_type),
    ] {
        if value.trim().is_empty() {
            return Err(AppError::Validation(format!("Field '{}' is required", field)).into());
        }
    }

    if let (Some(travel), Some(ret)) = (body.travel_date, body.return_date) {
        if ret < travel {
            return Err(
                AppError::Validation("Return date cannot precede travel date".to_string()).into(),
            );
        }
    }

    let application = state
        .applications
        .create(
            auth.user_id,
            body.destination_country,
            body.origin_country,
            body.visa_type,
            body.purpose,
            body.travel_date,
            body.return_date,
        )
        .await?;

    tracing::info!(application_id = %application.id, "Application created");

    Ok(Json(application.into()))
}

#[utoipa::path(
    get,
    path = "/api/v0/applications",
    tag = "applications",
    responses(
        (status = 200, description = "Applications, newest first", body = [ApplicationResponse]),
        (status = 401, description = "Not authenticated", body = ErrorResponse)
    )
)]
pub async fn list_applications(
    State(state): State<Arc<AppState>>,
    auth: AuthContext,
) -> Result<Json<Vec<ApplicationResponse>>, HttpAppError> {
    let applications = if auth.actor().is_admin() {
        state.applications.list_all().await?
    } else {
        state.applications.list_for_user(auth.user_id).await?
    };

    Ok(Json(applications.into_iter().map(Into::into).collect()))
}

#[utoipa::path(
    get,
    path = "/api/v0/applications/{id}",
    tag = "applications",
    params(("id" = Uuid, Path, description = "Application ID")),
    responses(
        (status = 200, description = "Application with documents and retrieval URLs", body = ApplicationResponse),
        (status = 403, description = "Not the owner", body = ErrorResponse),
        (status = 404, description = "Unknown application", body = ErrorResponse)
    )
)]
pub async fn get_application(
    State(state): State<Arc<AppState>>,
    auth: AuthContext,
    Path(id): Path<Uuid>,
) -> Result<Json<ApplicationResponse>, HttpAppError> {
    let (application, documents) = state.intake.detail(id, &auth.actor()).await?;

    let documents: Vec<DocumentResponse> = documents
        .into_iter()
        .map(|(document, url)| DocumentResponse::from(document).with_url(url))
        .collect();

    Ok(Json(
        ApplicationResponse::from(application).with_documents(documents),
    ))
}
