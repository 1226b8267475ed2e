//! Store repository for database operations.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use storeadmin_core::{OwnerId, Store, StoreDraft, StoreId};

use super::RepositoryError;

#[derive(Debug, sqlx::FromRow)]
struct StoreRow {
    id: StoreId,
    owner_id: OwnerId,
    name: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<StoreRow> for Store {
    fn from(row: StoreRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            owner_id: row.owner_id,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Repository for store database operations.
pub struct StoreRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> StoreRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List an owner's stores, oldest first so the first store is stable.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_for_owner(&self, owner: OwnerId) -> Result<Vec<Store>, RepositoryError> {
        let rows = sqlx::query_as::<_, StoreRow>(
            r"
            SELECT id, owner_id, name, created_at, updated_at
            FROM admin.store
            WHERE owner_id = $1
            ORDER BY created_at ASC, id ASC
            ",
        )
        .bind(owner)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Get a store by ID regardless of owner.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: StoreId) -> Result<Option<Store>, RepositoryError> {
        let row = sqlx::query_as::<_, StoreRow>(
            r"
            SELECT id, owner_id, name, created_at, updated_at
            FROM admin.store
            WHERE id = $1
            ",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    /// Create a store for an owner.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the owner does not exist.
    pub async fn create(&self, owner: OwnerId, draft: &StoreDraft) -> Result<Store, RepositoryError> {
        let row = sqlx::query_as::<_, StoreRow>(
            r"
            INSERT INTO admin.store (id, owner_id, name)
            VALUES ($1, $2, $3)
            RETURNING id, owner_id, name, created_at, updated_at
            ",
        )
        .bind(StoreId::generate())
        .bind(owner)
        .bind(draft.name.as_str())
        .fetch_one(self.pool)
        .await
        .map_err(RepositoryError::from_write)?;

        Ok(row.into())
    }

    /// Rename a store.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the store does not exist.
    pub async fn update(&self, id: StoreId, draft: &StoreDraft) -> Result<Store, RepositoryError> {
        let row = sqlx::query_as::<_, StoreRow>(
            r"
            UPDATE admin.store
            SET name = $2, updated_at = now()
            WHERE id = $1
            RETURNING id, owner_id, name, created_at, updated_at
            ",
        )
        .bind(id)
        .bind(draft.name.as_str())
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        Ok(row.into())
    }

    /// Delete a store that no longer has any catalog or order rows.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` while rows still reference the store.
    pub async fn delete(&self, id: StoreId) -> Result<Store, RepositoryError> {
        let row = sqlx::query_as::<_, StoreRow>(
            r"
            DELETE FROM admin.store
            WHERE id = $1
            RETURNING id, owner_id, name, created_at, updated_at
            ",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await
        .map_err(RepositoryError::from_write)?
        .ok_or(RepositoryError::NotFound)?;

        Ok(row.into())
    }
}
