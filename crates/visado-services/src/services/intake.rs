//! Document intake orchestration.
//!
//! One upload is: validate in memory, write the blob, insert the registry
//! row, hand back a time-limited retrieval URL. Validation happens before
//! any I/O, so a rejected upload leaves no trace. If the registry insert
//! fails after the blob was written, the blob is deleted in the background
//! so storage does not accumulate orphans.

use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

use visado_core::models::{Application, Document};
use visado_core::validation::validate_document_upload;
use visado_core::{AppError, UploadLimits};
use visado_storage::keys::generate_document_key;
use visado_storage::Storage;

use super::access::{ensure_owner_or_admin, Actor};
use super::store::{ApplicationStore, DocumentStore};

#[derive(Clone)]
pub struct DocumentIntakeService {
    applications: Arc<dyn ApplicationStore>,
    documents: Arc<dyn DocumentStore>,
    storage: Arc<dyn Storage>,
    limits: UploadLimits,
    url_expiry: Duration,
}

impl DocumentIntakeService {
    pub fn new(
        applications: Arc<dyn ApplicationStore>,
        documents: Arc<dyn DocumentStore>,
        storage: Arc<dyn Storage>,
        limits: UploadLimits,
        url_expiry: Duration,
    ) -> Self {
        Self {
            applications,
            documents,
            storage,
            limits,
            url_expiry,
        }
    }

    /// Accept one uploaded document for an application.
    ///
    /// Returns the registry row together with a signed retrieval URL for
    /// immediate display.
    #[tracing::instrument(skip(self, data), fields(application_id = %application_id, file_size = data.len()))]
    pub async fn submit(
        &self,
        application_id: Uuid,
        actor: &Actor,
        filename: &str,
        content_type: &str,
        document_type: &str,
        data: Vec<u8>,
    ) -> Result<(Document, String), AppError> {
        validate_document_upload(filename, content_type, data.len(), document_type, &self.limits)?;

        let application = self
            .applications
            .get(application_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Application not found".to_string()))?;
        ensure_owner_or_admin(actor, application.user_id)?;

        let storage_key = generate_document_key(filename)?;
        let file_size = data.len() as i64;

        self.storage.put(&storage_key, content_type, data).await?;

        let document = match self
            .documents
            .create(
                application_id,
                filename.to_string(),
                document_type.to_string(),
                storage_key.clone(),
                content_type.to_string(),
                file_size,
            )
            .await
        {
            Ok(document) => document,
            Err(e) => {
                // Registry insert failed after the blob was written; remove
                // the blob so it does not linger unowned.
                let storage = self.storage.clone();
                let orphan_key = storage_key.clone();
                tokio::spawn(async move {
                    if let Err(cleanup_err) = storage.delete(&orphan_key).await {
                        tracing::error!(
                            storage_key = %orphan_key,
                            error = %cleanup_err,
                            "Failed to clean up orphaned blob after registry insert failure"
                        );
                    }
                });
                return Err(e);
            }
        };

        let url = self
            .storage
            .presigned_get_url(&document.storage_key, self.url_expiry)
            .await?;

        tracing::info!(
            document_id = %document.id,
            storage_key = %document.storage_key,
            "Document accepted"
        );

        Ok((document, url))
    }

    /// Produce a fresh signed retrieval URL for a stored document.
    #[tracing::instrument(skip(self), fields(document_id = %document_id))]
    pub async fn retrieval_url(
        &self,
        document_id: Uuid,
        actor: &Actor,
    ) -> Result<(Document, String), AppError> {
        let document = self.get_authorized(document_id, actor).await?;

        let url = self
            .storage
            .presigned_get_url(&document.storage_key, self.url_expiry)
            .await?;

        Ok((document, url))
    }

    /// Load an application together with its documents, each carrying a
    /// fresh retrieval URL. Backs the application detail view.
    pub async fn detail(
        &self,
        application_id: Uuid,
        actor: &Actor,
    ) -> Result<(Application, Vec<(Document, String)>), AppError> {
        let application = self
            .applications
            .get(application_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Application not found".to_string()))?;
        ensure_owner_or_admin(actor, application.user_id)?;

        let documents = self.documents.list_for_application(application_id).await?;
        let mut out = Vec::with_capacity(documents.len());
        for document in documents {
            let url = self
                .storage
                .presigned_get_url(&document.storage_key, self.url_expiry)
                .await?;
            out.push((document, url));
        }
        Ok((application, out))
    }

    /// Remove a document: blob first, then the registry row. If the blob
    /// delete fails the row stays, so the document remains listed and the
    /// delete can be retried.
    #[tracing::instrument(skip(self), fields(document_id = %document_id))]
    pub async fn delete(&self, document_id: Uuid, actor: &Actor) -> Result<(), AppError> {
        let document = self.get_authorized(document_id, actor).await?;

        match self.storage.delete(&document.storage_key).await {
            Ok(()) => {}
            // Blob already gone out-of-band; the row is stale either way.
            Err(visado_storage::StorageError::NotFound(_)) => {
                tracing::warn!(
                    document_id = %document.id,
                    storage_key = %document.storage_key,
                    "Blob already absent, removing registry row"
                );
            }
            Err(e) => return Err(e.into()),
        }

        self.documents.delete(document.id).await?;
        tracing::info!(document_id = %document.id, "Document deleted");
        Ok(())
    }

    /// Load a document and verify the actor may act on it through its
    /// owning application.
    async fn get_authorized(&self, document_id: Uuid, actor: &Actor) -> Result<Document, AppError> {
        let document = self
            .documents
            .get(document_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Document not found".to_string()))?;

        let application = self
            .applications
            .get(document.application_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Application not found".to_string()))?;
        ensure_owner_or_admin(actor, application.user_id)?;

        Ok(document)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::testing::{application, MemoryApplicationStore, MemoryDocumentStore};
    use visado_core::models::UserRole;

    async fn service_with_app() -> (tempfile::TempDir, DocumentIntakeService, Uuid, Actor) {
        let owner = Uuid::new_v4();
        let app = application(owner);
        let app_id = app.id;
        let apps = Arc::new(MemoryApplicationStore::seeded(app));
        let docs = Arc::new(MemoryDocumentStore::default());

        let dir = tempfile::tempdir().expect("tempdir");
        let storage = Arc::new(
            visado_storage::LocalStorage::new(
                dir.path(),
                "http://localhost:3000/files".to_string(),
            )
            .await
            .expect("storage"),
        );

        let service = DocumentIntakeService::new(
            apps,
            docs,
            storage,
            UploadLimits::default(),
            Duration::from_secs(3600),
        );
        let actor = Actor {
            user_id: owner,
            role: UserRole::User,
        };
        (dir, service, app_id, actor)
    }

    #[tokio::test]
    async fn test_submit_then_detail_returns_documents_with_urls() {
        let (_dir, service, app_id, actor) = service_with_app().await;

        let (document, url) = service
            .submit(
                app_id,
                &actor,
                "passport.jpg",
                "image/jpeg",
                "passport",
                vec![0xFF, 0xD8, 0xFF],
            )
            .await
            .expect("submit");
        assert!(url.contains(&document.storage_key));

        let (application, documents) = service.detail(app_id, &actor).await.expect("detail");
        assert_eq!(application.id, app_id);
        assert_eq!(documents.len(), 1);
        assert_eq!(documents[0].0.id, document.id);
        assert!(
            documents[0].1.contains("expires="),
            "detail URLs carry the expiry window: {}",
            documents[0].1
        );
    }

    #[tokio::test]
    async fn test_detail_is_forbidden_for_non_owner() {
        let (_dir, service, app_id, _actor) = service_with_app().await;

        let stranger = Actor {
            user_id: Uuid::new_v4(),
            role: UserRole::User,
        };
        let err = service.detail(app_id, &stranger).await.unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));
    }

    #[tokio::test]
    async fn test_submit_rejects_invalid_file_before_any_write() {
        let (_dir, service, app_id, actor) = service_with_app().await;

        let err = service
            .submit(app_id, &actor, "virus.exe", "image/jpeg", "passport", vec![1])
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));

        let (_, documents) = service.detail(app_id, &actor).await.expect("detail");
        assert!(documents.is_empty(), "rejected upload must leave no row");
    }
}
