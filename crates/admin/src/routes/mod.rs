//! HTTP route handlers for admin.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                 - Liveness check
//! GET  /health/ready           - Readiness check (storage reachable)
//!
//! # Auth
//! GET  /auth/login             - Login page
//! POST /auth/login             - Sign in with email + password
//! POST /auth/logout            - Sign out
//!
//! # JSON API
//! /api/...                     - See [`api`]
//!
//! # Dashboard
//! /, /{store_id}/...           - See [`dashboard`]
//! ```

pub mod api;
pub mod auth;
pub mod dashboard;

use axum::{Router, extract::State, http::StatusCode, routing::get};

use crate::state::AppState;

/// Create all routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
        .nest("/api", api::routes())
        .merge(auth::router())
        .merge(dashboard::router())
}

/// Liveness health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Returns 503 Service Unavailable if storage is not reachable.
async fn readiness(State(state): State<AppState>) -> StatusCode {
    match state.store().ping().await {
        Ok(()) => StatusCode::OK,
        Err(e) => {
            tracing::warn!(error = %e, "readiness check failed");
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}
