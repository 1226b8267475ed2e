//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::AdminConfig;
use crate::db::CatalogStore;
use crate::services::{AuthService, CatalogService};

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`. The catalog backend is a trait object so the
/// same router runs against `PostgreSQL` in production and the in-memory
/// store in tests.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: AdminConfig,
    store: Arc<dyn CatalogStore>,
}

impl AppState {
    #[must_use]
    pub fn new(config: AdminConfig, store: Arc<dyn CatalogStore>) -> Self {
        Self {
            inner: Arc::new(AppStateInner { config, store }),
        }
    }

    /// Get a reference to the admin configuration.
    #[must_use]
    pub fn config(&self) -> &AdminConfig {
        &self.inner.config
    }

    /// Get a reference to the catalog backend.
    #[must_use]
    pub fn store(&self) -> &dyn CatalogStore {
        self.inner.store.as_ref()
    }

    /// Catalog operations over this state's backend.
    #[must_use]
    pub fn catalog(&self) -> CatalogService<'_> {
        CatalogService::new(self.store())
    }

    /// Owner authentication over this state's backend.
    #[must_use]
    pub fn auth(&self) -> AuthService<'_> {
        AuthService::new(self.store())
    }
}
