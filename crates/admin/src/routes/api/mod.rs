//! JSON API, mounted under `/api`.
//!
//! ```text
//! # Stores and auth
//! GET|POST          /api/stores
//! PATCH|DELETE      /api/stores/{store_id}
//! POST              /api/auth/{register,login,logout}
//! GET               /api/auth/me
//!
//! # Store-scoped resources (billboards, categories, sizes, colors, products, orders)
//! GET|POST          /api/{store_id}/{kind}
//! GET|PATCH|DELETE  /api/{store_id}/{kind}/{id}
//! ```

pub mod auth;
pub mod resources;
pub mod stores;

use axum::Router;

use crate::services::{Billboards, Categories, Colors, Orders, Products, Sizes};
use crate::state::AppState;

/// Create all API routes (relative to `/api`).
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(stores::router())
        .merge(auth::router())
        .merge(resources::router::<Billboards>())
        .merge(resources::router::<Categories>())
        .merge(resources::router::<Sizes>())
        .merge(resources::router::<Colors>())
        .merge(resources::router::<Products>())
        .merge(resources::router::<Orders>())
}
