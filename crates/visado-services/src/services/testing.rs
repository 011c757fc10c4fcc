//! In-memory stores and a scripted extractor for service tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use visado_ai::{VisionError, VisionExtractor};
use visado_core::models::{
    AiReview, Application, ApplicationStatus, Document,
};
use visado_core::AppError;

use super::store::{ApplicationStore, DocumentStore};

pub fn application(user_id: Uuid) -> Application {
    Application {
        id: Uuid::new_v4(),
        user_id,
        destination_country: "Japan".to_string(),
        origin_country: "Germany".to_string(),
        visa_type: "tourist".to_string(),
        status: ApplicationStatus::Pending,
        purpose: None,
        travel_date: None,
        return_date: None,
        ai_review: None,
        submitted_at: Utc::now(),
        reviewed_at: None,
    }
}

pub fn document(application_id: Uuid, storage_key: &str) -> Document {
    Document {
        id: Uuid::new_v4(),
        application_id,
        original_filename: "passport.jpg".to_string(),
        document_type: "passport".to_string(),
        storage_key: storage_key.to_string(),
        content_type: "image/jpeg".to_string(),
        file_size: 3,
        uploaded_at: Utc::now(),
    }
}

#[derive(Default)]
pub struct MemoryApplicationStore {
    apps: Mutex<HashMap<Uuid, Application>>,
}

impl MemoryApplicationStore {
    pub fn seeded(app: Application) -> Self {
        let store = Self::default();
        store.apps.lock().unwrap().insert(app.id, app);
        store
    }

    pub fn snapshot(&self, id: Uuid) -> Option<Application> {
        self.apps.lock().unwrap().get(&id).cloned()
    }
}

#[async_trait]
impl ApplicationStore for MemoryApplicationStore {
    async fn get(&self, id: Uuid) -> Result<Option<Application>, AppError> {
        Ok(self.apps.lock().unwrap().get(&id).cloned())
    }

    async fn set_status(
        &self,
        id: Uuid,
        status: ApplicationStatus,
        reviewed_at: DateTime<Utc>,
    ) -> Result<Application, AppError> {
        let mut apps = self.apps.lock().unwrap();
        let app = apps
            .get_mut(&id)
            .ok_or_else(|| AppError::NotFound("Application not found".to_string()))?;
        app.status = status;
        app.reviewed_at = Some(reviewed_at);
        Ok(app.clone())
    }

    async fn set_ai_review(&self, id: Uuid, review: &AiReview) -> Result<Application, AppError> {
        let mut apps = self.apps.lock().unwrap();
        let app = apps
            .get_mut(&id)
            .ok_or_else(|| AppError::NotFound("Application not found".to_string()))?;
        app.ai_review = Some(review.clone());
        Ok(app.clone())
    }
}

#[derive(Default)]
pub struct MemoryDocumentStore {
    docs: Mutex<HashMap<Uuid, Document>>,
}

impl MemoryDocumentStore {
    pub fn seeded(doc: Document) -> Self {
        let store = Self::default();
        store.docs.lock().unwrap().insert(doc.id, doc);
        store
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn create(
        &self,
        application_id: Uuid,
        original_filename: String,
        document_type: String,
        storage_key: String,
        content_type: String,
        file_size: i64,
    ) -> Result<Document, AppError> {
        let doc = Document {
            id: Uuid::new_v4(),
            application_id,
            original_filename,
            document_type,
            storage_key,
            content_type,
            file_size,
            uploaded_at: Utc::now(),
        };
        self.docs.lock().unwrap().insert(doc.id, doc.clone());
        Ok(doc)
    }

    async fn get(&self, id: Uuid) -> Result<Option<Document>, AppError> {
        Ok(self.docs.lock().unwrap().get(&id).cloned())
    }

    async fn get_for_application(
        &self,
        id: Uuid,
        application_id: Uuid,
    ) -> Result<Option<Document>, AppError> {
        Ok(self
            .docs
            .lock()
            .unwrap()
            .get(&id)
            .filter(|d| d.application_id == application_id)
            .cloned())
    }

    async fn list_for_application(
        &self,
        application_id: Uuid,
    ) -> Result<Vec<Document>, AppError> {
        Ok(self
            .docs
            .lock()
            .unwrap()
            .values()
            .filter(|d| d.application_id == application_id)
            .cloned()
            .collect())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        Ok(self.docs.lock().unwrap().remove(&id).is_some())
    }
}

/// Extractor that replies with a fixed string and counts invocations.
pub struct ScriptedExtractor {
    reply: String,
    calls: AtomicUsize,
}

impl ScriptedExtractor {
    pub fn new(reply: impl Into<String>) -> Self {
        Self {
            reply: reply.into(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl VisionExtractor for ScriptedExtractor {
    fn model_name(&self) -> &str {
        "scripted"
    }

    async fn extract(
        &self,
        _document: Bytes,
        _content_type: &str,
        _prompt: &str,
    ) -> Result<String, VisionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.reply.clone())
    }
}
