//! Application setup and initialization
//!
//! All application initialization logic lives here rather than in main.rs,
//! for better organization and testability.

pub mod routes;
pub mod server;
pub mod services;

use crate::state::AppState;
use anyhow::{Context, Result};
use std::sync::Arc;
use visado_core::Config;

/// Initialize the entire application
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    // Validate configuration first - fail fast on misconfiguration
    config
        .validate()
        .context("Configuration validation failed")?;

    // Initialize telemetry first
    crate::telemetry::init_telemetry();

    tracing::info!("Configuration loaded and validated successfully");

    // Setup database
    let pool = visado_db::db::setup_database(&config).await?;

    // Setup storage
    let storage = visado_services::create_storage(&config)
        .await
        .context("Failed to initialize storage backend")?;

    // Initialize all services and repositories
    let state = services::initialize_services(&config, pool, storage)?;

    // Setup routes
    let router = routes::setup_routes(&config, state.clone())?;

    Ok((state, router))
}
