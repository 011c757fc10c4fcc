use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// An uploaded supporting document, owned by exactly one application.
///
/// `storage_key` is an opaque blob-store key, never a public URL; it is only
/// resolvable to a retrieval URL through the storage gateway.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Document {
    pub id: Uuid,
    pub application_id: Uuid,
    pub original_filename: String,
    pub document_type: String,
    pub storage_key: String,
    pub content_type: String,
    pub file_size: i64,
    pub uploaded_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DocumentResponse {
    pub id: Uuid,
    pub application_id: Uuid,
    pub filename: String,
    pub document_type: String,
    pub content_type: String,
    pub file_size: i64,
    pub uploaded_at: DateTime<Utc>,
    /// Time-limited signed retrieval URL, present when the caller asked for one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl From<Document> for DocumentResponse {
    fn from(doc: Document) -> Self {
        DocumentResponse {
            id: doc.id,
            application_id: doc.application_id,
            filename: doc.original_filename,
            document_type: doc.document_type,
            content_type: doc.content_type,
            file_size: doc.file_size,
            uploaded_at: doc.uploaded_at,
            url: None,
        }
    }
}

impl DocumentResponse {
    pub fn with_url(mut self, url: String) -> Self {
        self.url = Some(url);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_response_hides_storage_key() {
        let doc = Document {
            id: Uuid::new_v4(),
            application_id: Uuid::new_v4(),
            original_filename: "passport.jpg".to_string(),
            document_type: "passport".to_string(),
            storage_key: "documents/1700000000000-a1b2c3d4e5f6.jpg".to_string(),
            content_type: "image/jpeg".to_string(),
            file_size: 2_097_152,
            uploaded_at: Utc::now(),
        };

        let response = DocumentResponse::from(doc);
        let json = serde_json::to_string(&response).expect("serialize");
        assert!(!json.contains("storage_key"));
        assert!(!json.contains("documents/1700000000000"));
        assert!(json.contains("passport.jpg"));
    }

    #[test]
    fn test_with_url_attaches_retrieval_handle() {
        let doc = Document {
            id: Uuid::new_v4(),
            application_id: Uuid::new_v4(),
            original_filename: "scan.pdf".to_string(),
            document_type: "bank_statement".to_string(),
            storage_key: "documents/k.pdf".to_string(),
            content_type: "application/pdf".to_string(),
            file_size: 1024,
            uploaded_at: Utc::now(),
        };

        let response = DocumentResponse::from(doc).with_url("https://signed.example".to_string());
        assert_eq!(response.url.as_deref(), Some("https://signed.example"));
    }
}
