use folio_core::error::CoreError;
use folio_core::versioning::{
    RetentionPolicy, DEFAULT_MAX_NUMBERING_ATTEMPTS, DEFAULT_RETENTION_KEEP,
};

use crate::auth::jwt::JwtConfig;

/// Server configuration loaded from environment variables.
///
/// All fields except the JWT secret have defaults suitable for local
/// development. In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// JWT token configuration (secret, expiry).
    pub jwt: JwtConfig,
    /// Version retention and numbering retry settings.
    pub versioning: RetentionPolicy,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                             | Default                 |
    /// |-------------------------------------|-------------------------|
    /// | `HOST`                              | `0.0.0.0`               |
    /// | `PORT`                              | `3000`                  |
    /// | `CORS_ORIGINS`                      | `http://localhost:5173` |
    /// | `REQUEST_TIMEOUT_SECS`              | `30`                    |
    /// | `VERSIONING_RETENTION_KEEP`         | `50`                    |
    /// | `VERSIONING_MAX_NUMBERING_ATTEMPTS` | `3`                     |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let jwt = JwtConfig::from_env();

        let versioning = parse_retention_policy(
            std::env::var("VERSIONING_RETENTION_KEEP").ok(),
            std::env::var("VERSIONING_MAX_NUMBERING_ATTEMPTS").ok(),
        )
        .unwrap_or_else(|e| panic!("Invalid versioning configuration: {e}"));

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            jwt,
            versioning,
        }
    }
}

/// Build a [`RetentionPolicy`] from raw env values, falling back to the
/// defaults for unset ones.
pub fn parse_retention_policy(
    keep: Option<String>,
    max_numbering_attempts: Option<String>,
) -> Result<RetentionPolicy, CoreError> {
    let keep: i64 = match keep {
        Some(raw) => raw.trim().parse().map_err(|_| {
            CoreError::Validation(format!(
                "VERSIONING_RETENTION_KEEP must be an integer, got '{raw}'"
            ))
        })?,
        None => DEFAULT_RETENTION_KEEP,
    };

    let attempts: u32 = match max_numbering_attempts {
        Some(raw) => raw.trim().parse().map_err(|_| {
            CoreError::Validation(format!(
                "VERSIONING_MAX_NUMBERING_ATTEMPTS must be a positive integer, got '{raw}'"
            ))
        })?,
        None => DEFAULT_MAX_NUMBERING_ATTEMPTS,
    };

    RetentionPolicy::new(keep, attempts)
}
