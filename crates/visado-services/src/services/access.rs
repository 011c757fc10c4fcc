//! Authorization guard shared by every service.
//!
//! Two rules cover the whole surface: a resource owner or an admin may act
//! on a resource, and only an admin may decide application status. The
//! guards return `Forbidden`, never `NotFound`, so a caller who guessed a
//! valid id learns nothing extra from the status code.

use uuid::Uuid;
use visado_core::models::UserRole;
use visado_core::AppError;

/// The authenticated identity a service call acts on behalf of. Built by
/// the HTTP layer from a verified token, never from request input.
#[derive(Debug, Clone, Copy)]
pub struct Actor {
    pub user_id: Uuid,
    pub role: UserRole,
}

impl Actor {
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }
}

/// Require the actor to be an admin.
pub fn ensure_admin(actor: &Actor) -> Result<(), AppError> {
    if actor.is_admin() {
        Ok(())
    } else {
        Err(AppError::Forbidden(format!(
            "User {} lacks the admin role",
            actor.user_id
        )))
    }
}

/// Require the actor to own the resource, unless they are an admin.
pub fn ensure_owner_or_admin(actor: &Actor, owner_id: Uuid) -> Result<(), AppError> {
    if actor.is_admin() || actor.user_id == owner_id {
        Ok(())
    } else {
        Err(AppError::Forbidden(format!(
            "User {} does not own this resource",
            actor.user_id
        )))
    }
}
