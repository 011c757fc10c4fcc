//! Seed an admin account.
//!
//! Admin role assignment never happens through the API, so a fresh
//! deployment runs this once:
//!
//! ```text
//! ADMIN_EMAIL=admin@example.com ADMIN_PASSWORD=... cargo run --bin seed
//! ```
//!
//! Idempotent: an existing account with the same email is promoted to
//! admin instead of duplicated.

use anyhow::{Context, Result};
use sqlx::postgres::PgPoolOptions;
use visado_api::auth::password::hash_password;
use visado_core::models::UserRole;
use visado_core::Config;
use visado_db::{db::run_migrations, UserRepository};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    visado_api::telemetry::init_telemetry();

    let config = Config::from_env()?;

    let email = std::env::var("ADMIN_EMAIL").context("ADMIN_EMAIL must be set")?;
    let password = std::env::var("ADMIN_PASSWORD").context("ADMIN_PASSWORD must be set")?;
    if password.len() < 6 {
        anyhow::bail!("ADMIN_PASSWORD must be at least 6 characters");
    }
    let name = std::env::var("ADMIN_NAME").ok();

    let pool = PgPoolOptions::new()
        .max_connections(1)
        .connect(&config.database_url)
        .await
        .context("Failed to connect to database")?;
    run_migrations(&pool).await?;

    let users = UserRepository::new(pool.clone());

    match users.get_by_email(&email).await? {
        Some(existing) if existing.role == UserRole::Admin => {
            tracing::info!(user_id = %existing.id, "Admin account already exists");
        }
        Some(existing) => {
            sqlx::query("UPDATE users SET role = $2, updated_at = NOW() WHERE id = $1")
                .bind(existing.id)
                .bind(UserRole::Admin)
                .execute(&pool)
                .await?;
            tracing::info!(user_id = %existing.id, "Existing account promoted to admin");
        }
        None => {
            let password_hash =
                hash_password(&password).map_err(|e| anyhow::anyhow!(e.to_string()))?;
            let user = users
                .create(email, password_hash, name, UserRole::Admin)
                .await
                .map_err(|e| anyhow::anyhow!(e.to_string()))?;
            tracing::info!(user_id = %user.id, "Admin account created");
        }
    }

    Ok(())
}
