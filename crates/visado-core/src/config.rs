//! Configuration module
//!
//! Environment-driven configuration, loaded once at process start and passed
//! by reference into the services. `validate()` runs before anything else so
//! misconfiguration fails fast.

use std::env;

use crate::constants::{
    ALLOWED_CONTENT_TYPES, ALLOWED_EXTENSIONS, DOCUMENT_FETCH_TIMEOUT_SECS,
    MAX_DOCUMENT_SIZE_BYTES, PRESIGNED_URL_EXPIRY_SECS,
};
use crate::storage_types::StorageBackend;
use crate::validation::UploadLimits;

const DEFAULT_SERVER_PORT: u16 = 3000;
const MAX_CONNECTIONS: u32 = 20;
const CONNECTION_TIMEOUT_SECS: u64 = 30;
const JWT_EXPIRY_HOURS: i64 = 24;
const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-flash";
const DEFAULT_GEMINI_TIMEOUT_SECS: u64 = 60;

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config {
    pub server_port: u16,
    pub environment: String,
    pub cors_origins: Vec<String>,
    // Database
    pub database_url: String,
    pub db_max_connections: u32,
    pub db_timeout_seconds: u64,
    // Auth
    pub jwt_secret: String,
    pub jwt_expiry_hours: i64,
    // Storage
    pub storage_backend: StorageBackend,
    pub s3_bucket: Option<String>,
    pub s3_region: Option<String>,
    pub s3_endpoint: Option<String>,
    pub local_storage_path: Option<String>,
    pub local_storage_base_url: Option<String>,
    pub presigned_url_expiry_secs: u64,
    pub document_fetch_timeout_secs: u64,
    // Upload limits
    pub max_document_size_bytes: usize,
    pub document_allowed_extensions: Vec<String>,
    pub document_allowed_content_types: Vec<String>,
    // Vision extraction
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
    pub gemini_timeout_secs: u64,
}

fn env_opt(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn env_or(key: &str, default: &str) -> String {
    env_opt(key).unwrap_or_else(|| default.to_string())
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    env_opt(key)
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn env_list(key: &str, default: &[&str]) -> Vec<String> {
    env_opt(key)
        .map(|v| {
            v.split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect()
        })
        .unwrap_or_else(|| default.iter().map(|s| s.to_string()).collect())
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        let database_url = env::var("DATABASE_URL")
            .map_err(|_| anyhow::anyhow!("DATABASE_URL must be set"))?;
        let jwt_secret =
            env::var("JWT_SECRET").map_err(|_| anyhow::anyhow!("JWT_SECRET must be set"))?;

        let storage_backend = env_or("STORAGE_BACKEND", "s3")
            .parse::<StorageBackend>()
            .map_err(|e| anyhow::anyhow!(e))?;

        Ok(Config {
            server_port: env_parse("SERVER_PORT", DEFAULT_SERVER_PORT),
            environment: env_or("ENVIRONMENT", "development"),
            cors_origins: env_list("CORS_ORIGINS", &[]),
            database_url,
            db_max_connections: env_parse("DB_MAX_CONNECTIONS", MAX_CONNECTIONS),
            db_timeout_seconds: env_parse("DB_TIMEOUT_SECONDS", CONNECTION_TIMEOUT_SECS),
            jwt_secret,
            jwt_expiry_hours: env_parse("JWT_EXPIRY_HOURS", JWT_EXPIRY_HOURS),
            storage_backend,
            s3_bucket: env_opt("S3_BUCKET"),
            s3_region: env_opt("S3_REGION").or_else(|| env_opt("AWS_REGION")),
            s3_endpoint: env_opt("S3_ENDPOINT"),
            local_storage_path: env_opt("LOCAL_STORAGE_PATH"),
            local_storage_base_url: env_opt("LOCAL_STORAGE_BASE_URL"),
            presigned_url_expiry_secs: env_parse(
                "PRESIGNED_URL_EXPIRY_SECS",
                PRESIGNED_URL_EXPIRY_SECS,
            ),
            document_fetch_timeout_secs: env_parse(
                "DOCUMENT_FETCH_TIMEOUT_SECS",
                DOCUMENT_FETCH_TIMEOUT_SECS,
            ),
            max_document_size_bytes: env_parse("MAX_DOCUMENT_SIZE_BYTES", MAX_DOCUMENT_SIZE_BYTES),
            document_allowed_extensions: env_list(
                "DOCUMENT_ALLOWED_EXTENSIONS",
                ALLOWED_EXTENSIONS,
            ),
            document_allowed_content_types: env_list(
                "DOCUMENT_ALLOWED_CONTENT_TYPES",
                ALLOWED_CONTENT_TYPES,
            ),
            gemini_api_key: env_opt("GEMINI_API_KEY"),
            gemini_model: env_or("GEMINI_MODEL", DEFAULT_GEMINI_MODEL),
            gemini_timeout_secs: env_parse("GEMINI_TIMEOUT_SECS", DEFAULT_GEMINI_TIMEOUT_SECS),
        })
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let env = self.environment.to_lowercase();
        env == "production" || env == "prod"
    }

    /// Upload limits derived from this configuration.
    pub fn upload_limits(&self) -> UploadLimits {
        UploadLimits {
            max_file_size: self.max_document_size_bytes,
            allowed_extensions: self.document_allowed_extensions.clone(),
            allowed_content_types: self.document_allowed_content_types.clone(),
        }
    }

    /// Validate configuration consistency. Called once at startup.
    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.jwt_secret.len() < 32 {
            anyhow::bail!("JWT_SECRET must be at least 32 characters");
        }

        match self.storage_backend {
            StorageBackend::S3 => {
                if self.s3_bucket.is_none() {
                    anyhow::bail!("S3_BUCKET must be set when STORAGE_BACKEND=s3");
                }
                if self.s3_region.is_none() {
                    anyhow::bail!("S3_REGION or AWS_REGION must be set when STORAGE_BACKEND=s3");
                }
            }
            StorageBackend::Local => {
                if self.local_storage_path.is_none() {
                    anyhow::bail!("LOCAL_STORAGE_PATH must be set when STORAGE_BACKEND=local");
                }
                if self.local_storage_base_url.is_none() {
                    anyhow::bail!("LOCAL_STORAGE_BASE_URL must be set when STORAGE_BACKEND=local");
                }
            }
        }

        if self.is_production() && self.gemini_api_key.is_none() {
            anyhow::bail!("GEMINI_API_KEY must be set in production");
        }

        if self.max_document_size_bytes == 0 {
            anyhow::bail!("MAX_DOCUMENT_SIZE_BYTES must be greater than zero");
        }

        if self.document_fetch_timeout_secs == 0 {
            anyhow::bail!("DOCUMENT_FETCH_TIMEOUT_SECS must be greater than zero");
        }

        Ok(())
    }
}
