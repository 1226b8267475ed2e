//! Ownership guard.
//!
//! Every store-scoped mutation starts here: the principal must be signed in
//! and must own the store named in the path. A store that does not exist is
//! reported exactly like a store owned by someone else, so non-owners cannot
//! probe for store ids.

use tracing::instrument;

use storeadmin_core::{OwnerId, Store, StoreId};

use super::catalog::CatalogError;
use crate::db::CatalogStore;

/// Check that `principal` owns `store_id` and return the store.
///
/// # Errors
///
/// - [`CatalogError::Unauthenticated`] when there is no principal.
/// - [`CatalogError::Forbidden`] when the store is missing or owned by
///   someone else.
/// - [`CatalogError::Repository`] when the lookup itself fails.
#[instrument(skip(store))]
pub async fn authorize(
    store: &dyn CatalogStore,
    principal: Option<OwnerId>,
    store_id: StoreId,
) -> Result<Store, CatalogError> {
    let owner = principal.ok_or(CatalogError::Unauthenticated)?;

    match store.get_store(store_id).await? {
        Some(found) if found.owner_id == owner => Ok(found),
        Some(_) => {
            tracing::warn!(%owner, %store_id, "store owned by someone else");
            Err(CatalogError::Forbidden)
        }
        None => Err(CatalogError::Forbidden),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use storeadmin_core::{Email, FormSchema, StoreInput};

    use super::*;
    use crate::db::MemoryCatalogStore;

    async fn owner_with_store(db: &MemoryCatalogStore, email: &str) -> (OwnerId, Store) {
        let owner = db
            .create_owner(&Email::parse(email).unwrap(), "Owner", "hash")
            .await
            .unwrap();
        let draft = StoreInput {
            name: "Shop".to_owned(),
        }
        .validate()
        .unwrap();
        let store = db.create_store(owner.id, &draft).await.unwrap();
        (owner.id, store)
    }

    #[tokio::test]
    async fn test_no_principal_is_unauthenticated() {
        let db = MemoryCatalogStore::new();
        let (_, store) = owner_with_store(&db, "a@example.com").await;
        let err = authorize(&db, None, store.id).await.unwrap_err();
        assert!(matches!(err, CatalogError::Unauthenticated));
    }

    #[tokio::test]
    async fn test_foreign_and_missing_stores_are_forbidden() {
        let db = MemoryCatalogStore::new();
        let (alice, _) = owner_with_store(&db, "a@example.com").await;
        let (_, bobs) = owner_with_store(&db, "b@example.com").await;

        let err = authorize(&db, Some(alice), bobs.id).await.unwrap_err();
        assert!(matches!(err, CatalogError::Forbidden));

        let err = authorize(&db, Some(alice), StoreId::generate())
            .await
            .unwrap_err();
        assert!(matches!(err, CatalogError::Forbidden));
    }

    #[tokio::test]
    async fn test_owner_gets_store() {
        let db = MemoryCatalogStore::new();
        let (alice, store) = owner_with_store(&db, "a@example.com").await;
        let found = authorize(&db, Some(alice), store.id).await.unwrap();
        assert_eq!(found, store);
    }
}
