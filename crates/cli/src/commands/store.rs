//! Store management commands.
//!
//! # Usage
//!
//! ```bash
//! sa-cli store create -e owner@example.com -n "Main Street"
//! ```

use storeadmin_admin::db::{CatalogStore, PgCatalogStore};
use storeadmin_admin::services::CatalogService;
use storeadmin_core::{Email, StoreId, StoreInput};

use super::{CliError, connect};

/// Create a store owned by the owner with `email`.
pub async fn create(email: &str, name: &str) -> Result<StoreId, CliError> {
    let db = PgCatalogStore::new(connect().await?);

    let owner_email =
        Email::parse(email).map_err(|_| CliError::OwnerNotFound(email.to_owned()))?;
    let owner = db
        .owner_by_email(&owner_email)
        .await?
        .ok_or_else(|| CliError::OwnerNotFound(email.to_owned()))?
        .owner;

    let input = StoreInput {
        name: name.to_owned(),
    };
    let store = CatalogService::new(&db)
        .create_store(Some(owner.id), &input)
        .await?;

    tracing::info!(
        "Store created successfully! ID: {}, Name: {}, API: /api/{}",
        store.id,
        store.name,
        store.id
    );
    Ok(store.id)
}
