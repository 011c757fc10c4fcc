//! AI review orchestration.
//!
//! One review is: resolve the document, mint a signed URL, fetch the bytes
//! back through it, send them to the vision model with the fixed prompt,
//! parse and validate the reply, persist the structured review on the
//! owning application. Nothing is persisted unless the reply parsed and
//! validated; a failed review leaves the previous stored review untouched.

use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

use visado_ai::{parse_review, review_prompt, VisionExtractor};
use visado_core::models::AiReview;
use visado_core::AppError;
use visado_storage::Storage;

use super::access::{ensure_owner_or_admin, Actor};
use super::store::{ApplicationStore, DocumentStore};

#[derive(Clone)]
pub struct AiReviewService {
    applications: Arc<dyn ApplicationStore>,
    documents: Arc<dyn DocumentStore>,
    storage: Arc<dyn Storage>,
    extractor: Arc<dyn VisionExtractor>,
    http_client: reqwest::Client,
    url_expiry: Duration,
}

impl AiReviewService {
    pub fn new(
        applications: Arc<dyn ApplicationStore>,
        documents: Arc<dyn DocumentStore>,
        storage: Arc<dyn Storage>,
        extractor: Arc<dyn VisionExtractor>,
        http_client: reqwest::Client,
        url_expiry: Duration,
    ) -> Self {
        Self {
            applications,
            documents,
            storage,
            extractor,
            http_client,
            url_expiry,
        }
    }

    /// Run the vision model over one document and store the result on its
    /// application.
    #[tracing::instrument(
        skip(self),
        fields(application_id = %application_id, document_id = %document_id)
    )]
    pub async fn review_document(
        &self,
        application_id: Uuid,
        document_id: Uuid,
        actor: &Actor,
    ) -> Result<AiReview, AppError> {
        let application = self
            .applications
            .get(application_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Application not found".to_string()))?;
        ensure_owner_or_admin(actor, application.user_id)?;

        // A document id from another application must not resolve here.
        let document = self
            .documents
            .get_for_application(document_id, application_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Document not found".to_string()))?;

        // Surface a missing blob as NotFound before involving the model.
        if !self.storage.exists(&document.storage_key).await? {
            return Err(AppError::NotFound(
                "Stored document is no longer available".to_string(),
            ));
        }

        let url = self
            .storage
            .presigned_get_url(&document.storage_key, self.url_expiry)
            .await?;

        let bytes = self.fetch_document(&url).await?;

        tracing::info!(
            model = %self.extractor.model_name(),
            file_size = bytes.len(),
            content_type = %document.content_type,
            "Sending document for AI review"
        );

        let raw = self
            .extractor
            .extract(bytes, &document.content_type, review_prompt())
            .await?;

        let review = parse_review(&raw)?;

        self.applications
            .set_ai_review(application_id, &review)
            .await?;

        tracing::info!(
            is_valid = review.is_valid,
            is_blurry = review.is_blurry,
            confidence = review.confidence,
            "AI review stored"
        );

        Ok(review)
    }

    /// Fetch the document bytes back through the signed URL, the same path
    /// any external consumer of the URL would take.
    async fn fetch_document(&self, url: &str) -> Result<bytes::Bytes, AppError> {
        let response = self
            .http_client
            .get(url)
            .send()
            .await
            .map_err(|e| AppError::UpstreamFetch(format!("Failed to fetch document: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::UpstreamFetch(format!(
                "Document fetch returned {}",
                status
            )));
        }

        response
            .bytes()
            .await
            .map_err(|e| AppError::UpstreamFetch(format!("Failed to read document body: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::testing::{
        application, document, MemoryApplicationStore, MemoryDocumentStore, ScriptedExtractor,
    };
    use visado_core::models::UserRole;

    struct ReviewHarness {
        _dir: tempfile::TempDir,
        _server: mockito::ServerGuard,
        service: AiReviewService,
        apps: Arc<MemoryApplicationStore>,
        extractor: Arc<ScriptedExtractor>,
        application_id: Uuid,
        document_id: Uuid,
        actor: Actor,
    }

    /// Wire the whole pipeline with an in-memory registry, a tempdir blob
    /// store whose signed URLs resolve against a stub HTTP server, and a
    /// scripted model reply.
    async fn harness(reply: &str, blob_present: bool) -> ReviewHarness {
        let owner = Uuid::new_v4();
        let app = application(owner);
        let application_id = app.id;

        let storage_key = "documents/1700000000000-abcdef123456.jpg";
        let doc = document(application_id, storage_key);
        let document_id = doc.id;

        let apps = Arc::new(MemoryApplicationStore::seeded(app));
        let docs = Arc::new(MemoryDocumentStore::seeded(doc));

        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", format!("/{}", storage_key).as_str())
            .match_query(mockito::Matcher::Any)
            .with_status(200)
            .with_body(vec![0xFF, 0xD8, 0xFF])
            .create_async()
            .await;

        let dir = tempfile::tempdir().expect("tempdir");
        let storage = Arc::new(
            visado_storage::LocalStorage::new(dir.path(), server.url())
                .await
                .expect("storage"),
        );
        if blob_present {
            storage
                .put(storage_key, "image/jpeg", vec![0xFF, 0xD8, 0xFF])
                .await
                .expect("put");
        }

        let extractor = Arc::new(ScriptedExtractor::new(reply));
        let service = AiReviewService::new(
            apps.clone(),
            docs,
            storage,
            extractor.clone(),
            reqwest::Client::new(),
            Duration::from_secs(3600),
        );

        ReviewHarness {
            _dir: dir,
            _server: server,
            service,
            apps,
            extractor,
            application_id,
            document_id,
            actor: Actor {
                user_id: owner,
                role: UserRole::User,
            },
        }
    }

    #[tokio::test]
    async fn test_successful_review_is_stored_on_the_application() {
        let h = harness(
            r#"{"isValid": true, "isBlurry": false, "confidence": 88}"#,
            true,
        )
        .await;

        let review = h
            .service
            .review_document(h.application_id, h.document_id, &h.actor)
            .await
            .expect("review");
        assert!(review.is_valid);
        assert_eq!(review.confidence, 88);

        let stored = h.apps.snapshot(h.application_id).expect("application");
        assert_eq!(stored.ai_review, Some(review));
        assert_eq!(h.extractor.calls(), 1);
    }

    #[tokio::test]
    async fn test_malformed_reply_leaves_stored_review_untouched() {
        let h = harness("I could not read the document, sorry!", true).await;

        let err = h
            .service
            .review_document(h.application_id, h.document_id, &h.actor)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::MalformedResponse(_)));

        // The model was consulted, but nothing reached the registry.
        assert_eq!(h.extractor.calls(), 1);
        let stored = h.apps.snapshot(h.application_id).expect("application");
        assert_eq!(stored.ai_review, None);
    }

    #[tokio::test]
    async fn test_missing_blob_is_not_found_and_skips_the_model() {
        let h = harness(r#"{"isValid": true, "isBlurry": false}"#, false).await;

        let err = h
            .service
            .review_document(h.application_id, h.document_id, &h.actor)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
        assert_eq!(h.extractor.calls(), 0);
    }

    #[tokio::test]
    async fn test_document_from_another_application_is_not_found() {
        let h = harness(r#"{"isValid": true, "isBlurry": false}"#, true).await;

        let err = h
            .service
            .review_document(h.application_id, Uuid::new_v4(), &h.actor)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_stalled_document_fetch_times_out() {
        let owner = Uuid::new_v4();
        let app = application(owner);
        let application_id = app.id;

        let storage_key = "documents/1700000000000-feedbeef0000.jpg";
        let doc = document(application_id, storage_key);
        let document_id = doc.id;

        // An endpoint that accepts connections but never answers.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind");
        let base_url = format!("http://{}", listener.local_addr().expect("addr"));
        tokio::spawn(async move {
            loop {
                let Ok((socket, _)) = listener.accept().await else {
                    break;
                };
                tokio::spawn(async move {
                    let _socket = socket;
                    tokio::time::sleep(std::time::Duration::from_secs(60)).await;
                });
            }
        });

        let dir = tempfile::tempdir().expect("tempdir");
        let storage = Arc::new(
            visado_storage::LocalStorage::new(dir.path(), base_url)
                .await
                .expect("storage"),
        );
        storage
            .put(storage_key, "image/jpeg", vec![0xFF, 0xD8, 0xFF])
            .await
            .expect("put");

        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(200))
            .build()
            .expect("client");
        let extractor = Arc::new(ScriptedExtractor::new(
            r#"{"isValid": true, "isBlurry": false}"#,
        ));
        let service = AiReviewService::new(
            Arc::new(MemoryApplicationStore::seeded(app)),
            Arc::new(MemoryDocumentStore::seeded(doc)),
            storage,
            extractor.clone(),
            client,
            Duration::from_secs(3600),
        );

        let actor = Actor {
            user_id: owner,
            role: UserRole::User,
        };
        let err = service
            .review_document(application_id, document_id, &actor)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::UpstreamFetch(_)));
        assert_eq!(extractor.calls(), 0);
    }

    #[tokio::test]
    async fn test_non_owner_is_forbidden_before_any_fetch() {
        let h = harness(r#"{"isValid": true, "isBlurry": false}"#, true).await;

        let stranger = Actor {
            user_id: Uuid::new_v4(),
            role: UserRole::User,
        };
        let err = h
            .service
            .review_document(h.application_id, h.document_id, &stranger)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));
        assert_eq!(h.extractor.calls(), 0);
    }
}
