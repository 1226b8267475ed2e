//! Catalog API client implementation.
//!
//! Every read is a GET below the configured store base. Response bodies are
//! cached by full URL, so filtered product lists are cached per filter.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use reqwest::header::ACCEPT;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};
use url::Url;

use storeadmin_core::{
    Billboard, BillboardId, CategoryDetail, CategoryId, Color, ProductDetail, ProductFilter,
    ProductId, Size,
};

use super::ApiError;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
const CACHE_CAPACITY: u64 = 1000;

// =============================================================================
// CatalogClient
// =============================================================================

/// Client for one store's public catalog endpoints.
#[derive(Clone)]
pub struct CatalogClient {
    inner: Arc<CatalogClientInner>,
}

struct CatalogClientInner {
    client: reqwest::Client,
    base: Url,
    cache: Option<Cache<String, Arc<str>>>,
}

impl CatalogClient {
    /// Create a client for the API rooted at `base`.
    ///
    /// A zero `cache_ttl` disables response caching.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Http` if the HTTP client cannot be built.
    pub fn new(base: Url, cache_ttl: Duration) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        let cache = (!cache_ttl.is_zero()).then(|| {
            Cache::builder()
                .max_capacity(CACHE_CAPACITY)
                .time_to_live(cache_ttl)
                .build()
        });

        Ok(Self {
            inner: Arc::new(CatalogClientInner {
                client,
                base,
                cache,
            }),
        })
    }

    /// Build the URL for a path below the store base.
    fn url(&self, path: &str, query: &[(&str, String)]) -> Result<Url, ApiError> {
        let mut url = self.inner.base.join(path)?;
        if !query.is_empty() {
            url.query_pairs_mut()
                .extend_pairs(query.iter().map(|(k, v)| (*k, v.as_str())));
        }
        Ok(url)
    }

    /// GET a URL and return the body of a successful response.
    async fn fetch(&self, url: &Url) -> Result<String, ApiError> {
        let response = self
            .inner
            .client
            .get(url.clone())
            .header(ACCEPT, "application/json")
            .send()
            .await?;

        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(ApiError::NotFound(url.path().to_string()));
        }

        // Get response body as text first for better error diagnostics
        let body = response.text().await?;

        if !status.is_success() {
            tracing::error!(
                status = %status,
                url = %url,
                body = %body.chars().take(500).collect::<String>(),
                "Catalog API returned non-success status"
            );
            return Err(ApiError::Status {
                status: status.as_u16(),
                body: body.chars().take(200).collect(),
            });
        }

        Ok(body)
    }

    /// GET and decode, going through the cache when enabled.
    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, ApiError> {
        let url = self.url(path, query)?;
        let key = url.to_string();

        let body: Arc<str> = match self.cached(&key).await {
            Some(body) => {
                debug!(url = %key, "Catalog cache hit");
                body
            }
            None => {
                let body: Arc<str> = self.fetch(&url).await?.into();
                if let Some(cache) = &self.inner.cache {
                    cache.insert(key, Arc::clone(&body)).await;
                }
                body
            }
        };

        serde_json::from_str(&body).map_err(|e| {
            tracing::error!(
                error = %e,
                url = %url,
                body = %body.chars().take(500).collect::<String>(),
                "Failed to parse catalog API response"
            );
            ApiError::Parse(e)
        })
    }

    async fn cached(&self, key: &str) -> Option<Arc<str>> {
        match &self.inner.cache {
            Some(cache) => cache.get(key).await,
            None => None,
        }
    }

    // =========================================================================
    // Catalog Methods
    // =========================================================================

    /// Get a billboard by id.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::NotFound` for unknown ids, other variants when the
    /// API is unreachable or answers garbage.
    #[instrument(skip(self))]
    pub async fn billboard(&self, id: BillboardId) -> Result<Billboard, ApiError> {
        self.get(&format!("billboards/{id}"), &[]).await
    }

    /// List the store's categories with their billboards.
    ///
    /// # Errors
    ///
    /// Returns an error when the API is unreachable or answers garbage.
    #[instrument(skip(self))]
    pub async fn categories(&self) -> Result<Vec<CategoryDetail>, ApiError> {
        self.get("categories", &[]).await
    }

    /// Get a category with its billboard.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::NotFound` for unknown ids.
    #[instrument(skip(self))]
    pub async fn category(&self, id: CategoryId) -> Result<CategoryDetail, ApiError> {
        self.get(&format!("categories/{id}"), &[]).await
    }

    /// List non-archived products matching `filter`.
    ///
    /// # Errors
    ///
    /// Returns an error when the API is unreachable or answers garbage.
    #[instrument(skip(self))]
    pub async fn products(&self, filter: &ProductFilter) -> Result<Vec<ProductDetail>, ApiError> {
        self.get("products", &product_query(filter)).await
    }

    /// Get a product with its category, size and color.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::NotFound` for unknown ids.
    #[instrument(skip(self))]
    pub async fn product(&self, id: ProductId) -> Result<ProductDetail, ApiError> {
        self.get(&format!("products/{id}"), &[]).await
    }

    /// List the store's sizes.
    ///
    /// # Errors
    ///
    /// Returns an error when the API is unreachable or answers garbage.
    #[instrument(skip(self))]
    pub async fn sizes(&self) -> Result<Vec<Size>, ApiError> {
        self.get("sizes", &[]).await
    }

    /// List the store's colors.
    ///
    /// # Errors
    ///
    /// Returns an error when the API is unreachable or answers garbage.
    #[instrument(skip(self))]
    pub async fn colors(&self) -> Result<Vec<Color>, ApiError> {
        self.get("colors", &[]).await
    }

    /// Check that the API answers, bypassing the cache.
    ///
    /// # Errors
    ///
    /// Returns the failure of an uncached categories read.
    pub async fn ping(&self) -> Result<(), ApiError> {
        let url = self.url("categories", &[])?;
        self.fetch(&url).await.map(|_| ())
    }
}

/// Query parameters for a product list, in the API's camelCase names.
fn product_query(filter: &ProductFilter) -> Vec<(&'static str, String)> {
    let mut query = Vec::new();
    if let Some(id) = filter.category_id {
        query.push(("categoryId", id.to_string()));
    }
    if let Some(id) = filter.size_id {
        query.push(("sizeId", id.to_string()));
    }
    if let Some(id) = filter.color_id {
        query.push(("colorId", id.to_string()));
    }
    if let Some(featured) = filter.is_featured {
        query.push(("isFeatured", featured.to_string()));
    }
    query
}
