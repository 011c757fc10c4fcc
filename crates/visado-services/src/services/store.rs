//! Persistence seams for the service layer.
//!
//! Services talk to storage-backed rows through these traits rather than
//! the concrete repositories, so orchestration logic can be exercised with
//! in-memory stores. The Postgres repositories implement them by
//! delegation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use visado_core::models::{AiReview, Application, ApplicationStatus, Document};
use visado_core::AppError;
use visado_db::{ApplicationRepository, DocumentRepository};

/// Application rows as the services see them.
#[async_trait]
pub trait ApplicationStore: Send + Sync {
    async fn get(&self, id: Uuid) -> Result<Option<Application>, AppError>;

    async fn set_status(
        &self,
        id: Uuid,
        status: ApplicationStatus,
        reviewed_at: DateTime<Utc>,
    ) -> Result<Application, AppError>;

    async fn set_ai_review(&self, id: Uuid, review: &AiReview) -> Result<Application, AppError>;
}

/// Document rows as the services see them.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn create(
        &self,
        application_id: Uuid,
        original_filename: String,
        document_type: String,
        storage_key: String,
        content_type: String,
        file_size: i64,
    ) -> Result<Document, AppError>;

    async fn get(&self, id: Uuid) -> Result<Option<Document>, AppError>;

    /// Resolve a document only if it belongs to the given application.
    async fn get_for_application(
        &self,
        id: Uuid,
        application_id: Uuid,
    ) -> Result<Option<Document>, AppError>;

    async fn list_for_application(
        &self,
        application_id: Uuid,
    ) -> Result<Vec<Document>, AppError>;

    async fn delete(&self, id: Uuid) -> Result<bool, AppError>;
}

#[async_trait]
impl ApplicationStore for ApplicationRepository {
    async fn get(&self, id: Uuid) -> Result<Option<Application>, AppError> {
        ApplicationRepository::get(self, id).await
    }

    async fn set_status(
        &self,
        id: Uuid,
        status: ApplicationStatus,
        reviewed_at: DateTime<Utc>,
    ) -> Result<Application, AppError> {
        ApplicationRepository::set_status(self, id, status, reviewed_at).await
    }

    async fn set_ai_review(&self, id: Uuid, review: &AiReview) -> Result<Application, AppError> {
        ApplicationRepository::set_ai_review(self, id, review).await
    }
}

#[async_trait]
impl DocumentStore for DocumentRepository {
    async fn create(
        &self,
        application_id: Uuid,
        original_filename: String,
        document_type: String,
        storage_key: String,
        content_type: String,
        file_size: i64,
    ) -> Result<Document, AppError> {
        DocumentRepository::create(
            self,
            application_id,
            original_filename,
            document_type,
            storage_key,
            content_type,
            file_size,
        )
        .await
    }

    async fn get(&self, id: Uuid) -> Result<Option<Document>, AppError> {
        DocumentRepository::get(self, id).await
    }

    async fn get_for_application(
        &self,
        id: Uuid,
        application_id: Uuid,
    ) -> Result<Option<Document>, AppError> {
        DocumentRepository::get_for_application(self, id, application_id).await
    }

    async fn list_for_application(
        &self,
        application_id: Uuid,
    ) -> Result<Vec<Document>, AppError> {
        DocumentRepository::list_for_application(self, application_id).await
    }

    async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        DocumentRepository::delete(self, id).await
    }
}
