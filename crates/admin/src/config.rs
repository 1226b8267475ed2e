//! Admin configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `ADMIN_DATABASE_URL` - `PostgreSQL` connection string (falls back to `DATABASE_URL`)
//!
//! ## Optional
//! - `ADMIN_HOST` - Bind address (default: 127.0.0.1)
//! - `ADMIN_PORT` - Listen port (default: 3001)
//! - `ADMIN_BASE_URL` - Public URL for the admin (default: `http://{host}:{port}`)
//! - `LOG_FORMAT` - `json` for structured logs, anything else for text
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Error sample rate (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Traces sample rate (default: 1.0)

use std::net::{IpAddr, SocketAddr};

use secrecy::SecretString;
use thiserror::Error;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Admin application configuration.
#[derive(Debug, Clone)]
pub struct AdminConfig {
    /// `PostgreSQL` database connection URL (contains password)
    pub database_url: SecretString,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL for the admin
    pub base_url: String,
    /// Emit JSON logs instead of text
    pub log_json: bool,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g., "development", "staging", "production")
    pub sentry_environment: Option<String>,
    /// Sentry error sample rate (0.0 to 1.0)
    pub sentry_sample_rate: f32,
    /// Sentry traces sample rate for performance monitoring (0.0 to 1.0)
    pub sentry_traces_sample_rate: f32,
}

impl AdminConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_vars(vars: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let database_url = get_database_url(&vars, "ADMIN_DATABASE_URL")?;
        let host = get_env_or_default(&vars, "ADMIN_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("ADMIN_HOST".to_string(), e.to_string()))?;
        let port = get_env_or_default(&vars, "ADMIN_PORT", "3001")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("ADMIN_PORT".to_string(), e.to_string()))?;
        let base_url = get_env_or_default(&vars, "ADMIN_BASE_URL", &format!("http://{host}:{port}"));
        url::Url::parse(&base_url)
            .map_err(|e| ConfigError::InvalidEnvVar("ADMIN_BASE_URL".to_string(), e.to_string()))?;

        let log_json = get_optional_env(&vars, "LOG_FORMAT").is_some_and(|f| f == "json");
        let sentry_dsn = get_optional_env(&vars, "SENTRY_DSN");
        let sentry_environment = get_optional_env(&vars, "SENTRY_ENVIRONMENT");
        let sentry_sample_rate = get_optional_env(&vars, "SENTRY_SAMPLE_RATE")
            .and_then(|s| s.parse().ok())
            .unwrap_or(1.0);
        let sentry_traces_sample_rate = get_optional_env(&vars, "SENTRY_TRACES_SAMPLE_RATE")
            .and_then(|s| s.parse().ok())
            .unwrap_or(1.0);

        Ok(Self {
            database_url,
            host,
            port,
            base_url,
            log_json,
            sentry_dsn,
            sentry_environment,
            sentry_sample_rate,
            sentry_traces_sample_rate,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Whether the admin is served over HTTPS (secure cookies).
    #[must_use]
    pub fn is_secure(&self) -> bool {
        self.base_url.starts_with("https://")
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(
    vars: &impl Fn(&str) -> Option<String>,
    key: &str,
) -> Result<String, ConfigError> {
    vars(key).ok_or_else(|| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get database URL with fallback to generic `DATABASE_URL`.
fn get_database_url(
    vars: &impl Fn(&str) -> Option<String>,
    primary_key: &str,
) -> Result<SecretString, ConfigError> {
    get_required_env(vars, primary_key)
        .or_else(|_| get_required_env(vars, "DATABASE_URL"))
        .map(SecretString::from)
        .map_err(|_| ConfigError::MissingEnvVar(primary_key.to_string()))
}

/// Get an optional environment variable.
fn get_optional_env(vars: &impl Fn(&str) -> Option<String>, key: &str) -> Option<String> {
    vars(key).filter(|v| !v.is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(vars: &impl Fn(&str) -> Option<String>, key: &str, default: &str) -> String {
    get_optional_env(vars, key).unwrap_or_else(|| default.to_string())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use secrecy::ExposeSecret;

    use super::*;

    fn load(pairs: &[(&str, &str)]) -> Result<AdminConfig, ConfigError> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        AdminConfig::from_vars(|key| map.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[("ADMIN_DATABASE_URL", "postgres://localhost/admin")]).unwrap();
        assert_eq!(config.socket_addr().to_string(), "127.0.0.1:3001");
        assert_eq!(config.base_url, "http://127.0.0.1:3001");
        assert!(!config.log_json);
        assert!(!config.is_secure());
        assert!(config.sentry_dsn.is_none());
        assert!((config.sentry_sample_rate - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_database_url_falls_back() {
        let config = load(&[("DATABASE_URL", "postgres://fallback/db")]).unwrap();
        assert_eq!(config.database_url.expose_secret(), "postgres://fallback/db");

        let err = load(&[]).unwrap_err();
        assert!(matches!(err, ConfigError::MissingEnvVar(key) if key == "ADMIN_DATABASE_URL"));
    }

    #[test]
    fn test_invalid_port() {
        let err = load(&[
            ("ADMIN_DATABASE_URL", "postgres://localhost/admin"),
            ("ADMIN_PORT", "not-a-port"),
        ])
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(key, _) if key == "ADMIN_PORT"));
    }

    #[test]
    fn test_json_logs_and_https() {
        let config = load(&[
            ("ADMIN_DATABASE_URL", "postgres://localhost/admin"),
            ("LOG_FORMAT", "json"),
            ("ADMIN_BASE_URL", "https://admin.example.com"),
        ])
        .unwrap();
        assert!(config.log_json);
        assert!(config.is_secure());
    }

    #[test]
    fn test_debug_redacts_database_url() {
        let config = load(&[("ADMIN_DATABASE_URL", "postgres://user:hunter2@db/admin")]).unwrap();
        let debug_output = format!("{config:?}");
        assert!(!debug_output.contains("hunter2"));
    }
}
