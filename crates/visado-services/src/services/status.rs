//! Application status workflow.
//!
//! Pending applications are decided by an admin into approved or rejected;
//! both are terminal. Deciding stamps `reviewed_at`. Re-applying the
//! current terminal state is an idempotent no-op; any other move out of a
//! terminal state is rejected.

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use visado_core::models::{Application, ApplicationStatus, StatusTransition};
use visado_core::AppError;

use super::access::{ensure_admin, Actor};
use super::store::ApplicationStore;

#[derive(Clone)]
pub struct ApplicationStatusService {
    applications: Arc<dyn ApplicationStore>,
}

impl ApplicationStatusService {
    pub fn new(applications: Arc<dyn ApplicationStore>) -> Self {
        Self { applications }
    }

    /// Decide an application's status. Admin only.
    #[tracing::instrument(skip(self), fields(application_id = %application_id, new_status = %new_status))]
    pub async fn set_status(
        &self,
        application_id: Uuid,
        new_status: ApplicationStatus,
        actor: &Actor,
    ) -> Result<Application, AppError> {
        ensure_admin(actor)?;

        let application = self
            .applications
            .get(application_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Application not found".to_string()))?;

        match application
            .status
            .validate_transition(new_status)
            .map_err(AppError::Validation)?
        {
            StatusTransition::Noop => Ok(application),
            StatusTransition::Apply => {
                let updated = self
                    .applications
                    .set_status(application_id, new_status, Utc::now())
                    .await?;

                tracing::info!(
                    from = %application.status,
                    to = %updated.status,
                    "Application status decided"
                );

                Ok(updated)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::testing::{application, MemoryApplicationStore};
    use visado_core::models::UserRole;

    fn admin() -> Actor {
        Actor {
            user_id: Uuid::new_v4(),
            role: UserRole::Admin,
        }
    }

    fn service_with_app() -> (Arc<MemoryApplicationStore>, ApplicationStatusService, Uuid) {
        let app = application(Uuid::new_v4());
        let app_id = app.id;
        let apps = Arc::new(MemoryApplicationStore::seeded(app));
        let service = ApplicationStatusService::new(apps.clone());
        (apps, service, app_id)
    }

    #[tokio::test]
    async fn test_admin_decision_stamps_reviewed_at() {
        let (apps, service, app_id) = service_with_app();

        let updated = service
            .set_status(app_id, ApplicationStatus::Approved, &admin())
            .await
            .expect("decision");
        assert_eq!(updated.status, ApplicationStatus::Approved);
        assert!(updated.reviewed_at.is_some());

        let stored = apps.snapshot(app_id).expect("application");
        assert_eq!(stored.status, ApplicationStatus::Approved);
    }

    #[tokio::test]
    async fn test_repeating_the_decision_is_a_noop() {
        let (apps, service, app_id) = service_with_app();

        let first = service
            .set_status(app_id, ApplicationStatus::Rejected, &admin())
            .await
            .expect("decision");
        let second = service
            .set_status(app_id, ApplicationStatus::Rejected, &admin())
            .await
            .expect("repeat");

        // Same terminal state again must not restamp the review time.
        assert_eq!(second.reviewed_at, first.reviewed_at);
        let stored = apps.snapshot(app_id).expect("application");
        assert_eq!(stored.reviewed_at, first.reviewed_at);
    }

    #[tokio::test]
    async fn test_terminal_state_cannot_be_reversed() {
        let (_apps, service, app_id) = service_with_app();

        service
            .set_status(app_id, ApplicationStatus::Approved, &admin())
            .await
            .expect("decision");

        let err = service
            .set_status(app_id, ApplicationStatus::Rejected, &admin())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_non_admin_cannot_decide() {
        let (_apps, service, app_id) = service_with_app();

        let user = Actor {
            user_id: Uuid::new_v4(),
            role: UserRole::User,
        };
        let err = service
            .set_status(app_id, ApplicationStatus::Approved, &user)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));
    }
}
