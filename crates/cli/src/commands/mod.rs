//! CLI command implementations.
//!
//! Commands read `ADMIN_DATABASE_URL` (or `DATABASE_URL`) through the admin
//! configuration and talk to the same `PostgreSQL` database as the admin.

pub mod migrate;
pub mod owner;
pub mod store;

use sqlx::PgPool;
use thiserror::Error;

use storeadmin_admin::config::{AdminConfig, ConfigError};
use storeadmin_admin::db::{self, RepositoryError};
use storeadmin_admin::services::{AuthError, CatalogError};

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration missing or invalid.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Database connection error.
    #[error("Database connection error: {0}")]
    Database(#[from] sqlx::Error),

    /// Migration failed.
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Lookup failed.
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),

    /// Owner could not be created.
    #[error("Owner error: {0}")]
    Auth(#[from] AuthError),

    /// Store could not be created.
    #[error("Store error: {0}")]
    Catalog(#[from] CatalogError),

    /// No owner has this email.
    #[error("No owner with email: {0}")]
    OwnerNotFound(String),
}

/// Connect to the admin database.
async fn connect() -> Result<PgPool, CliError> {
    let config = AdminConfig::from_env()?;

    tracing::info!("Connecting to admin database...");
    Ok(db::create_pool(&config.database_url).await?)
}
