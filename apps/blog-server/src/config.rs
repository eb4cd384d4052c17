//! Application configuration loaded from environment variables.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use quill_core::domain::DEFAULT_MAX_UPLOAD_BYTES;
use quill_core::services::POSTS_PER_PAGE;
use quill_infra::database::DatabaseConfig;

/// Where cover images are written when `STORAGE_ROOT` is unset.
pub const DEFAULT_STORAGE_ROOT: &str = "./storage/app/public/cover_images";

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    /// `None` keeps posts in memory.
    pub database: Option<DatabaseConfig>,
    /// Run pending migrations before serving.
    pub auto_migrate: bool,
    pub storage_root: PathBuf,
    pub upload_max_bytes: usize,
    pub posts_per_page: u64,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let database = env::var("DATABASE_URL").ok().map(|url| {
            let defaults = DatabaseConfig::new(url.clone());
            DatabaseConfig {
                url,
                max_connections: parse_var("DB_MAX_CONNECTIONS").unwrap_or(defaults.max_connections),
                min_connections: parse_var("DB_MIN_CONNECTIONS").unwrap_or(defaults.min_connections),
                connect_timeout: parse_var("DB_CONNECT_TIMEOUT_SECS")
                    .map(Duration::from_secs)
                    .unwrap_or(defaults.connect_timeout),
            }
        });

        Self {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: parse_var("PORT").unwrap_or(8080),
            database,
            auto_migrate: env::var("DB_AUTO_MIGRATE")
                .map(|v| v != "false" && v != "0")
                .unwrap_or(true),
            storage_root: env::var("STORAGE_ROOT")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_STORAGE_ROOT)),
            upload_max_bytes: parse_var("UPLOAD_MAX_BYTES").unwrap_or(DEFAULT_MAX_UPLOAD_BYTES),
            posts_per_page: parse_var("POSTS_PER_PAGE").unwrap_or(POSTS_PER_PAGE),
        }
    }
}

/// Parse an environment variable, ignoring unset or malformed values.
fn parse_var<T: FromStr>(key: &str) -> Option<T> {
    match env::var(key) {
        Ok(raw) => match raw.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(key, value = %raw, "Ignoring malformed environment variable");
                None
            }
        },
        Err(_) => None,
    }
}
