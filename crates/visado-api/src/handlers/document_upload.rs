use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;
use uuid::Uuid;
use visado_core::models::DocumentResponse;
use visado_core::AppError;

use crate::auth::models::AuthContext;
use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;

struct UploadFields {
    application_id: Uuid,
    document_type: String,
    filename: String,
    content_type: String,
    data: Vec<u8>,
}

/// Pull the expected parts out of the multipart body. Unknown parts are
/// ignored; missing required parts are a validation error.
async fn read_multipart(mut multipart: Multipart) -> Result<UploadFields, AppError> {
    let mut application_id = None;
    let mut document_type = None;
    let mut file = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart body: {}", e)))?
    {
        match field.name().unwrap_or_default() {
            "application_id" => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::Validation(format!("Invalid application_id: {}", e)))?;
                application_id = Some(text.parse::<Uuid>()?);
            }
            "document_type" => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::Validation(format!("Invalid document_type: {}", e)))?;
                document_type = Some(text);
            }
            "file" => {
                let filename = field
                    .file_name()
                    .map(str::to_string)
                    .ok_or_else(|| AppError::Validation("File part needs a filename".to_string()))?;
                let content_type = field
                    .content_type()
                    .map(str::to_string)
                    .ok_or_else(|| {
                        AppError::Validation("File part needs a content type".to_string())
                    })?;
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(format!("Failed to read file: {}", e)))?;
                file = Some((filename, content_type, data.to_vec()));
            }
            _ => {}
        }
    }

    let application_id = application_id
        .ok_or_else(|| AppError::Validation("Missing 'application_id' field".to_string()))?;
    let document_type = document_type
        .ok_or_else(|| AppError::Validation("Missing 'document_type' field".to_string()))?;
    let (filename, content_type, data) =
        file.ok_or_else(|| AppError::Validation("Missing 'file' part".to_string()))?;

    Ok(UploadFields {
        application_id,
        document_type,
        filename,
        content_type,
        data,
    })
}

#[utoipa::path(
    post,
    path = "/api/v0/documents",
    tag = "documents",
    request_body(content = inline(Object), content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Document accepted", body = DocumentResponse),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 403, description = "Not the owner", body = ErrorResponse),
        (status = 404, description = "Unknown application", body = ErrorResponse)
    )
)]
pub async fn upload_document(
    State(state): State<Arc<AppState>>,
    auth: AuthContext,
    multipart: Multipart,
) -> Result<(StatusCode, Json<DocumentResponse>), HttpAppError> {
    let fields = read_multipart(multipart).await?;

    let (document, url) = state
        .intake
        .submit(
            fields.application_id,
            &auth.actor(),
            &fields.filename,
            &fields.content_type,
            &fields.document_type,
            fields.data,
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(DocumentResponse::from(document).with_url(url)),
    ))
}
