//! HS256 token issuing and verification.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use uuid::Uuid;
use visado_core::models::UserRole;
use visado_core::AppError;

use super::models::JwtClaims;

/// Issue a session token for the given user.
pub fn issue_token(
    secret: &str,
    user_id: Uuid,
    email: &str,
    role: UserRole,
    expiry_hours: i64,
) -> Result<String, AppError> {
    let now = Utc::now();
    let claims = JwtClaims {
        sub: user_id,
        email: email.to_string(),
        role,
        iat: now.timestamp(),
        exp: (now + Duration::hours(expiry_hours)).timestamp(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(format!("Failed to sign token: {}", e)))
}

/// Verify a session token and return its claims. Expired or tampered
/// tokens fail with `Unauthenticated`.
pub fn verify_token(secret: &str, token: &str) -> Result<JwtClaims, AppError> {
    decode::<JwtClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|e| AppError::Unauthenticated(format!("Invalid session token: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret-that-is-at-least-32-chars";

    #[test]
    fn test_issued_token_round_trips() {
        let user_id = Uuid::new_v4();
        let token =
            issue_token(SECRET, user_id, "a@example.com", UserRole::User, 24).expect("issue");
        let claims = verify_token(SECRET, &token).expect("verify");
        assert_eq!(claims.sub, user_id);
        assert_eq!(claims.email, "a@example.com");
        assert_eq!(claims.role, UserRole::User);
    }

    #[test]
    fn test_wrong_secret_is_rejected() {
        let token = issue_token(SECRET, Uuid::new_v4(), "a@example.com", UserRole::User, 24)
            .expect("issue");
        let err = verify_token("another-secret-also-32-characters!!", &token).unwrap_err();
        assert!(matches!(err, AppError::Unauthenticated(_)));
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let token = issue_token(SECRET, Uuid::new_v4(), "a@example.com", UserRole::User, -1)
            .expect("issue");
        let err = verify_token(SECRET, &token).unwrap_err();
        assert!(matches!(err, AppError::Unauthenticated(_)));
    }

    #[test]
    fn test_garbage_token_is_rejected() {
        assert!(verify_token(SECRET, "not-a-jwt").is_err());
    }
}
