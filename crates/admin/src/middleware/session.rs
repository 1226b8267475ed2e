//! Session middleware configuration for admin.
//!
//! Sets up sessions using tower-sessions with strict settings
//! (SameSite=Strict, HttpOnly, 24hr inactivity expiry). Production uses the
//! `PostgreSQL` store in `admin.session`; tests pass a `MemoryStore`.

use sqlx::PgPool;
use tower_sessions::{Expiry, SessionManagerLayer, SessionStore};
use tower_sessions_sqlx_store::PostgresStore;

use crate::config::AdminConfig;

/// Session cookie name for admin.
pub const SESSION_COOKIE_NAME: &str = "sa_admin_session";

/// Session expiry time in seconds (24 hours).
const SESSION_EXPIRY_SECONDS: i64 = 24 * 60 * 60;

/// Error creating the session store.
#[derive(Debug, thiserror::Error)]
#[error("invalid session store setting: {0}")]
pub struct SessionStoreError(String);

/// The `PostgreSQL` session store over the `admin.session` table.
///
/// The table itself is created by migration.
///
/// # Errors
///
/// Returns an error if the schema or table name is rejected.
pub fn postgres_session_store(pool: &PgPool) -> Result<PostgresStore, SessionStoreError> {
    PostgresStore::new(pool.clone())
        .with_schema_name("admin")
        .map_err(SessionStoreError)?
        .with_table_name("session")
        .map_err(SessionStoreError)
}

/// Wrap a session store in the admin's cookie policy.
#[must_use]
pub fn create_session_layer<S: SessionStore + Clone>(
    store: S,
    config: &AdminConfig,
) -> SessionManagerLayer<S> {
    SessionManagerLayer::new(store)
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(
            tower_sessions::cookie::time::Duration::seconds(SESSION_EXPIRY_SECONDS),
        ))
        .with_secure(config.is_secure())
        .with_same_site(tower_sessions::cookie::SameSite::Strict)
        .with_http_only(true)
        .with_path("/")
}
