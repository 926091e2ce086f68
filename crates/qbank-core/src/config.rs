//! Configuration module
//!
//! Explicit, env-driven configuration. Everything the retrieval logic needs
//! (provider credentials, uploads directory, timeouts) is resolved once here
//! and passed down as a struct, never read from ambient process state inside
//! request handling.

use std::env;
use std::path::PathBuf;

const DEFAULT_SERVER_PORT: u16 = 5000;
const DEFAULT_MAX_CONNECTIONS: u32 = 20;
const DEFAULT_CONNECTION_TIMEOUT_SECS: u64 = 30;
const DEFAULT_JWT_EXPIRY_HOURS: i64 = 24;
/// Per-attempt timeout for outbound storage fetches. A hung upstream call
/// must not block the request indefinitely.
const DEFAULT_ATTEMPT_TIMEOUT_SECS: u64 = 8;
/// Signed URLs expire shortly after issuance; they are consumed immediately.
const DEFAULT_SIGNED_URL_TTL_SECS: i64 = 300;

/// Object-storage provider configuration
#[derive(Clone, Debug)]
pub struct StorageConfig {
    /// Provider account name, becomes a path segment of delivery URLs
    pub cloud_name: String,
    pub api_secret: String,
    /// Delivery host, e.g. "https://res.storage.example.com"
    pub base_url: String,
    /// Local directory holding legacy pre-migration uploads
    pub uploads_dir: PathBuf,
    pub attempt_timeout_secs: u64,
    pub signed_url_ttl_secs: i64,
}

/// Application configuration
#[derive(Clone, Debug)]
pub struct Config {
    pub server_port: u16,
    pub cors_origins: Vec<String>,
    pub database_url: String,
    pub db_max_connections: u32,
    pub db_timeout_seconds: u64,
    pub jwt_secret: String,
    pub jwt_expiry_hours: i64,
    pub environment: String,
    pub storage: StorageConfig,
}

fn env_or(name: &str, default: &str) -> String {
    env::var(name).unwrap_or_else(|_| default.to_string())
}

fn env_parse<T: std::str::FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn env_required(name: &str) -> Result<String, anyhow::Error> {
    env::var(name).map_err(|_| anyhow::anyhow!("Missing required environment variable: {}", name))
}

impl Config {
    /// Load configuration from the environment (and a `.env` file if present).
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let storage = StorageConfig {
            cloud_name: env_required("STORAGE_CLOUD_NAME")?,
            api_secret: env_required("STORAGE_API_SECRET")?,
            base_url: env_or("STORAGE_BASE_URL", "https://res.storage.example.com"),
            uploads_dir: PathBuf::from(env_or("UPLOADS_DIR", "./uploads")),
            attempt_timeout_secs: env_parse("STORAGE_ATTEMPT_TIMEOUT_SECS", DEFAULT_ATTEMPT_TIMEOUT_SECS),
            signed_url_ttl_secs: env_parse("SIGNED_URL_TTL_SECS", DEFAULT_SIGNED_URL_TTL_SECS),
        };

        Ok(Config {
            server_port: env_parse("SERVER_PORT", DEFAULT_SERVER_PORT),
            cors_origins: env_or("CORS_ORIGINS", "http://localhost:3000")
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
            database_url: env_required("DATABASE_URL")?,
            db_max_connections: env_parse("DB_MAX_CONNECTIONS", DEFAULT_MAX_CONNECTIONS),
            db_timeout_seconds: env_parse("DB_TIMEOUT_SECONDS", DEFAULT_CONNECTION_TIMEOUT_SECS),
            jwt_secret: env_required("JWT_SECRET")?,
            jwt_expiry_hours: env_parse("JWT_EXPIRY_HOURS", DEFAULT_JWT_EXPIRY_HOURS),
            environment: env_or("ENVIRONMENT", "development"),
            storage,
        })
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let env = self.environment.to_lowercase();
        env == "production" || env == "prod"
    }
}
