use std::env::var;
use std::time::Duration;

use dotenvy::dotenv;

/// Application configuration with environment variable overrides
#[derive(Debug, Clone)]
pub struct Config {
    /// Server port
    /// Env: PORT (default: 3000)
    pub port: u16,

    /// Database file path
    /// Env: DATABASE_PATH (default: "stockline.db")
    pub database_path: String,

    /// Token signing secret
    /// Env: JWT_KEY (no default; login and protected routes fail without it)
    pub jwt_key: Option<String>,

    /// Request body size limit in bytes
    /// Env: REQUEST_BODY_LIMIT (default: 1048576 = 1MB)
    pub request_body_limit: usize,

    /// Request timeout in seconds
    /// Env: REQUEST_TIMEOUT_SECS (default: 30)
    pub request_timeout: Duration,
}

impl Config {
    /// Load configuration from environment variables with defaults
    pub fn from_env() -> Self {
        let _ = dotenv();
        Self {
            port: env_or_default("PORT", 3000),
            database_path: env_or_default_string("DATABASE_PATH", "stockline.db"),
            jwt_key: var("JWT_KEY").ok().filter(|key| !key.is_empty()),
            request_body_limit: env_or_default("REQUEST_BODY_LIMIT", 1024 * 1024),
            request_timeout: Duration::from_secs(env_or_default("REQUEST_TIMEOUT_SECS", 30)),
        }
    }

    /// Create configuration with all default values
    pub fn default() -> Self {
        Self {
            port: 3000,
            database_path: "stockline.db".to_string(),
            jwt_key: None,
            request_body_limit: 1024 * 1024, // 1 MB
            request_timeout: Duration::from_secs(30),
        }
    }
}

/// Parse environment variable or return default value
fn env_or_default<T: std::str::FromStr>(key: &str, default: T) -> T {
    var(key)
        .ok()
        .and_then(|val| val.parse().ok())
        .unwrap_or(default)
}

/// Parse environment variable string or return default value
fn env_or_default_string(key: &str, default: &str) -> String {
    var(key).unwrap_or_else(|_| default.to_string())
}
