//! Client for the admin's public, store-scoped catalog API.
//!
//! # Architecture
//!
//! - The admin is the source of truth; the storefront keeps no database
//! - Plain JSON over HTTP with `reqwest`, bodies decoded into core types
//! - Successful responses are cached in memory via `moka` for a short TTL
//!
//! # Example
//!
//! ```rust,ignore
//! use storeadmin_storefront::api::CatalogClient;
//!
//! let client = CatalogClient::new(config.api_url.clone(), config.cache_ttl)?;
//! let featured = client.products(&ProductFilter { is_featured: Some(true), ..Default::default() }).await?;
//! ```

mod client;

pub use client::CatalogClient;

use thiserror::Error;

/// Errors that can occur when reading the catalog API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Request URL could not be built.
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// The API answered 404.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The API answered with a non-success status.
    #[error("API returned {status}: {body}")]
    Status { status: u16, body: String },

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

impl ApiError {
    /// Whether the API reported the resource as missing.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}
