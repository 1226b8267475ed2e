//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `STOREFRONT_API_URL` - Store-scoped admin API base, e.g.
//!   `http://localhost:3001/api/{store_id}`
//!
//! ## Optional
//! - `STOREFRONT_HOST` - Bind address (default: 127.0.0.1)
//! - `STOREFRONT_PORT` - Listen port (default: 3000)
//! - `STOREFRONT_HOME_BILLBOARD_ID` - Billboard shown on the home page
//! - `STOREFRONT_CACHE_TTL_SECS` - Catalog response cache lifetime (default: 60, 0 disables)
//! - `LOG_FORMAT` - `json` for structured logs, anything else for text
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Error sample rate (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Traces sample rate (default: 1.0)

use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use storeadmin_core::BillboardId;
use thiserror::Error;
use url::Url;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// Admin API base for one store (always ends with `/`)
    pub api_url: Url,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Billboard rendered at the top of the home page
    pub home_billboard_id: Option<BillboardId>,
    /// How long catalog responses are reused
    pub cache_ttl: Duration,
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

impl StorefrontConfig {
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
        let api_url = parse_api_url(&get_required_env(&vars, "STOREFRONT_API_URL")?)?;
        let host = get_env_or_default(&vars, "STOREFRONT_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("STOREFRONT_HOST".to_string(), e.to_string())
            })?;
        let port = get_env_or_default(&vars, "STOREFRONT_PORT", "3000")
            .parse::<u16>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("STOREFRONT_PORT".to_string(), e.to_string())
            })?;
        let home_billboard_id = get_optional_env(&vars, "STOREFRONT_HOME_BILLBOARD_ID")
            .map(|raw| {
                raw.parse::<BillboardId>().map_err(|e| {
                    ConfigError::InvalidEnvVar(
                        "STOREFRONT_HOME_BILLBOARD_ID".to_string(),
                        e.to_string(),
                    )
                })
            })
            .transpose()?;
        let cache_ttl = get_env_or_default(&vars, "STOREFRONT_CACHE_TTL_SECS", "60")
            .parse::<u64>()
            .map(Duration::from_secs)
            .map_err(|e| {
                ConfigError::InvalidEnvVar("STOREFRONT_CACHE_TTL_SECS".to_string(), e.to_string())
            })?;

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
            api_url,
            host,
            port,
            home_billboard_id,
            cache_ttl,
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
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Parse the API base so relative joins stay under the store path.
fn parse_api_url(raw: &str) -> Result<Url, ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidEnvVar("STOREFRONT_API_URL".to_string(), reason);

    let mut url = Url::parse(raw).map_err(|e| invalid(e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme '{}'", url.scheme())));
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

/// Get a required environment variable.
fn get_required_env(
    vars: &impl Fn(&str) -> Option<String>,
    key: &str,
) -> Result<String, ConfigError> {
    get_optional_env(vars, key).ok_or_else(|| ConfigError::MissingEnvVar(key.to_string()))
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

    use super::*;

    const API: &str = "http://localhost:3001/api/7b0c2f5e-4f7c-4a8e-9d55-1c1f8f0b6a11";

    fn load(pairs: &[(&str, &str)]) -> Result<StorefrontConfig, ConfigError> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        StorefrontConfig::from_vars(|key| map.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[("STOREFRONT_API_URL", API)]).unwrap();
        assert_eq!(config.socket_addr().to_string(), "127.0.0.1:3000");
        assert_eq!(config.api_url.as_str(), format!("{API}/"));
        assert!(config.home_billboard_id.is_none());
        assert_eq!(config.cache_ttl, Duration::from_secs(60));
        assert!(!config.log_json);
    }

    #[test]
    fn test_api_url_is_required() {
        let err = load(&[]).unwrap_err();
        assert!(matches!(err, ConfigError::MissingEnvVar(key) if key == "STOREFRONT_API_URL"));
    }

    #[test]
    fn test_api_url_must_be_http() {
        let err = load(&[("STOREFRONT_API_URL", "ftp://example.com/api/x")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(key, _) if key == "STOREFRONT_API_URL"));
    }

    #[test]
    fn test_api_url_keeps_trailing_slash() {
        let config = load(&[("STOREFRONT_API_URL", &format!("{API}/"))]).unwrap();
        assert_eq!(config.api_url.join("sizes").unwrap().as_str(), format!("{API}/sizes"));
    }

    #[test]
    fn test_home_billboard_id() {
        let id = "0d7c8b3e-2a59-4c8f-a0b5-3e1b3f61c9d2";
        let config = load(&[
            ("STOREFRONT_API_URL", API),
            ("STOREFRONT_HOME_BILLBOARD_ID", id),
        ])
        .unwrap();
        assert_eq!(config.home_billboard_id.unwrap().to_string(), id);

        let err = load(&[
            ("STOREFRONT_API_URL", API),
            ("STOREFRONT_HOME_BILLBOARD_ID", "not-a-uuid"),
        ])
        .unwrap_err();
        assert!(
            matches!(err, ConfigError::InvalidEnvVar(key, _) if key == "STOREFRONT_HOME_BILLBOARD_ID")
        );
    }

    #[test]
    fn test_invalid_port() {
        let err = load(&[("STOREFRONT_API_URL", API), ("STOREFRONT_PORT", "70000")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(key, _) if key == "STOREFRONT_PORT"));
    }
}
