use sqlx::{PgPool, Postgres};
use uuid::Uuid;
use visado_core::models::{User, UserRole};
use visado_core::AppError;

/// Repository for user accounts. Password hashes never leave this layer
/// except through [`get_by_email`], which the login flow needs for
/// verification.
///
/// [`get_by_email`]: UserRepository::get_by_email
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[tracing::instrument(skip(self, password_hash), fields(db.table = "users", db.operation = "insert"))]
    pub async fn create(
        &self,
        email: String,
        password_hash: String,
        name: Option<String>,
        role: UserRole,
    ) -> Result<User, AppError> {
        let user = sqlx::query_as::<Postgres, User>(
            r#"
            INSERT INTO users (id, email, password_hash, name, role, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, NOW(), NOW())
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(email.to_lowercase())
        .bind(password_hash)
        .bind(name)
        .bind(role)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                AppError::Validation("An account with this email already exists".to_string())
            }
            _ => AppError::from(e),
        })?;

        Ok(user)
    }

    #[tracing::instrument(skip(self), fields(db.table = "users", db.operation = "select"))]
    pub async fn get_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<Postgres, User>("SELECT * FROM users WHERE email = $1")
            .bind(email.to_lowercase())
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    #[tracing::instrument(skip(self), fields(db.table = "users", db.operation = "select"))]
    pub async fn get_by_id(&self, id: Uuid) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<Postgres, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }
}
