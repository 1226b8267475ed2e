//! Owner management commands.
//!
//! # Usage
//!
//! ```bash
//! sa-cli owner create -e owner@example.com -n "Owner Name" -p "long password"
//! ```

use storeadmin_admin::db::PgCatalogStore;
use storeadmin_admin::services::AuthService;
use storeadmin_core::OwnerId;

use super::{CliError, connect};

/// Create a new owner with an Argon2id password hash.
///
/// Email, name and password go through the same checks as registration.
pub async fn create(email: &str, name: &str, password: &str) -> Result<OwnerId, CliError> {
    let store = PgCatalogStore::new(connect().await?);

    tracing::info!("Creating owner: {}", email);
    let owner = AuthService::new(&store).register(email, name, password).await?;

    tracing::info!(
        "Owner created successfully! ID: {}, Email: {}",
        owner.id,
        owner.email.as_str()
    );
    Ok(owner.id)
}
