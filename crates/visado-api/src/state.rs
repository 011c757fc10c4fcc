//! Application state shared across handlers.

use sqlx::PgPool;
use std::sync::Arc;
use visado_core::Config;
use visado_db::{ApplicationRepository, DocumentRepository, UserRepository};
use visado_services::{AiReviewService, ApplicationStatusService, DocumentIntakeService, Storage};

/// Main application state: repositories and service facades for dependency
/// injection into handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub pool: PgPool,
    pub storage: Arc<dyn Storage>,
    pub users: UserRepository,
    pub applications: ApplicationRepository,
    pub documents: DocumentRepository,
    pub intake: DocumentIntakeService,
    pub review: AiReviewService,
    pub status: ApplicationStatusService,
}

fn _assert_app_state_send_sync() {
    fn assert_send<T: Send>() {}
    fn assert_sync<T: Sync>() {}
    assert_send::<AppState>();
    assert_sync::<AppState>();
}
