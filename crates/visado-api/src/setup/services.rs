//! Service and repository wiring.

use anyhow::{Context, Result};
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use visado_ai::{GeminiClient, VisionExtractor};
use visado_core::Config;
use visado_db::{ApplicationRepository, DocumentRepository, UserRepository};
use visado_services::{
    AiReviewService, ApplicationStatusService, ApplicationStore, DocumentIntakeService,
    DocumentStore, Storage,
};

use crate::state::AppState;

/// Wire repositories and services into the application state.
pub fn initialize_services(
    config: &Config,
    pool: PgPool,
    storage: Arc<dyn Storage>,
) -> Result<Arc<AppState>> {
    let api_key = config
        .gemini_api_key
        .clone()
        .context("GEMINI_API_KEY must be set to enable document review")?;
    let extractor: Arc<dyn VisionExtractor> = Arc::new(GeminiClient::new(
        api_key,
        config.gemini_model.clone(),
        config.gemini_timeout_secs,
    )?);

    build_state(config, pool, storage, extractor)
}

/// Assemble application state from already-built collaborators. Split from
/// [`initialize_services`] so tests can inject their own storage and vision
/// extractor.
pub fn build_state(
    config: &Config,
    pool: PgPool,
    storage: Arc<dyn Storage>,
    extractor: Arc<dyn VisionExtractor>,
) -> Result<Arc<AppState>> {
    let users = UserRepository::new(pool.clone());
    let applications = ApplicationRepository::new(pool.clone());
    let documents = DocumentRepository::new(pool.clone());

    let application_store: Arc<dyn ApplicationStore> = Arc::new(applications.clone());
    let document_store: Arc<dyn DocumentStore> = Arc::new(documents.clone());

    let url_expiry = Duration::from_secs(config.presigned_url_expiry_secs);

    // The review pipeline pulls blobs back through their signed URLs; a
    // stalled upstream must not hang a review indefinitely.
    let fetch_client = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.document_fetch_timeout_secs))
        .build()
        .context("Failed to build document fetch client")?;

    let intake = DocumentIntakeService::new(
        application_store.clone(),
        document_store.clone(),
        storage.clone(),
        config.upload_limits(),
        url_expiry,
    );

    let review = AiReviewService::new(
        application_store.clone(),
        document_store,
        storage.clone(),
        extractor,
        fetch_client,
        url_expiry,
    );

    let status = ApplicationStatusService::new(application_store);

    Ok(Arc::new(AppState {
        config: config.clone(),
        pool,
        storage,
        users,
        applications,
        documents,
        intake,
        review,
        status,
    }))
}
