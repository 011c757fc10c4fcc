use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};
use utoipa::ToSchema;
use uuid::Uuid;

use super::ai_review::AiReview;
use super::document::DocumentResponse;

/// Lifecycle of a visa application. `Pending` is the initial state; both
/// other states are terminal.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(
    feature = "sqlx",
    sqlx(type_name = "application_status", rename_all = "lowercase")
)]
pub enum ApplicationStatus {
    Pending,
    Approved,
    Rejected,
}

impl Display for ApplicationStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            ApplicationStatus::Pending => write!(f, "pending"),
            ApplicationStatus::Approved => write!(f, "approved"),
            ApplicationStatus::Rejected => write!(f, "rejected"),
        }
    }
}

/// Outcome of validating a status change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusTransition {
    /// The status changes and `reviewed_at` must be stamped.
    Apply,
    /// Re-application of the current terminal state; nothing to write.
    Noop,
}

impl ApplicationStatus {
    /// Validate a transition from `self` to `to`.
    ///
    /// Allowed: pending -> approved, pending -> rejected, and an idempotent
    /// re-application of the current terminal state. Moving between the two
    /// terminal states, or back to pending, is rejected.
    pub fn validate_transition(self, to: ApplicationStatus) -> Result<StatusTransition, String> {
        match (self, to) {
            (ApplicationStatus::Pending, ApplicationStatus::Approved)
            | (ApplicationStatus::Pending, ApplicationStatus::Rejected) => {
                Ok(StatusTransition::Apply)
            }
            (from, to) if from == to && from != ApplicationStatus::Pending => {
                Ok(StatusTransition::Noop)
            }
            (from, to) => Err(format!(
                "Invalid status transition: {} -> {}",
                from, to
            )),
        }
    }

    pub fn is_terminal(self) -> bool {
        !matches!(self, ApplicationStatus::Pending)
    }
}

/// A user's single visa request.
///
/// Invariant: `reviewed_at` is set if and only if `status != Pending`.
/// Status is mutated only by an admin reviewer; `ai_review` only by the
/// review orchestrator. The two are independent columns with independent
/// writes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Application {
    pub id: Uuid,
    pub user_id: Uuid,
    pub destination_country: String,
    pub origin_country: String,
    pub visa_type: String,
    pub status: ApplicationStatus,
    pub purpose: Option<String>,
    pub travel_date: Option<NaiveDate>,
    pub return_date: Option<NaiveDate>,
    pub ai_review: Option<AiReview>,
    pub submitted_at: DateTime<Utc>,
    pub reviewed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApplicationResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub destination_country: String,
    pub origin_country: String,
    pub visa_type: String,
    pub status: ApplicationStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub purpose: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub travel_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub return_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ai_review: Option<AiReview>,
    pub submitted_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reviewed_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub documents: Option<Vec<DocumentResponse>>,
}

impl From<Application> for ApplicationResponse {
    fn from(app: Application) -> Self {
        ApplicationResponse {
            id: app.id,
            user_id: app.user_id,
            destination_country: app.destination_country,
            origin_country: app.origin_country,
            visa_type: app.visa_type,
            status: app.status,
            purpose: app.purpose,
            travel_date: app.travel_date,
            return_date: app.return_date,
            ai_review: app.ai_review,
            submitted_at: app.submitted_at,
            reviewed_at: app.reviewed_at,
            documents: None,
        }
    }
}

impl ApplicationResponse {
    pub fn with_documents(mut self, documents: Vec<DocumentResponse>) -> Self {
        self.documents = Some(documents);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pending_to_terminal_is_allowed() {
        assert_eq!(
            ApplicationStatus::Pending.validate_transition(ApplicationStatus::Approved),
            Ok(StatusTransition::Apply)
        );
        assert_eq!(
            ApplicationStatus::Pending.validate_transition(ApplicationStatus::Rejected),
            Ok(StatusTransition::Apply)
        );
    }

    #[test]
    fn test_same_terminal_state_is_noop() {
        assert_eq!(
            ApplicationStatus::Approved.validate_transition(ApplicationStatus::Approved),
            Ok(StatusTransition::Noop)
        );
        assert_eq!(
            ApplicationStatus::Rejected.validate_transition(ApplicationStatus::Rejected),
            Ok(StatusTransition::Noop)
        );
    }

    #[test]
    fn test_terminal_to_other_terminal_is_rejected() {
        assert!(ApplicationStatus::Approved
            .validate_transition(ApplicationStatus::Rejected)
            .is_err());
        assert!(ApplicationStatus::Rejected
            .validate_transition(ApplicationStatus::Approved)
            .is_err());
    }

    #[test]
    fn test_no_transition_back_to_pending() {
        assert!(ApplicationStatus::Approved
            .validate_transition(ApplicationStatus::Pending)
            .is_err());
        assert!(ApplicationStatus::Pending
            .validate_transition(ApplicationStatus::Pending)
            .is_err());
    }

    #[test]
    fn test_terminal_flags() {
        assert!(!ApplicationStatus::Pending.is_terminal());
        assert!(ApplicationStatus::Approved.is_terminal());
        assert!(ApplicationStatus::Rejected.is_terminal());
    }

    #[test]
    fn test_status_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&ApplicationStatus::Approved).unwrap(),
            "\"approved\""
        );
    }
}
