//! Billboard repository for database operations.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use storeadmin_core::{Billboard, BillboardDraft, BillboardId, StoreId};

use super::RepositoryError;

#[derive(Debug, sqlx::FromRow)]
struct BillboardRow {
    id: BillboardId,
    store_id: StoreId,
    label: String,
    image_url: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<BillboardRow> for Billboard {
    fn from(row: BillboardRow) -> Self {
        Self {
            id: row.id,
            store_id: row.store_id,
            label: row.label,
            image_url: row.image_url,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Repository for billboard database operations.
pub struct BillboardRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> BillboardRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List a store's billboards, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self, store: StoreId) -> Result<Vec<Billboard>, RepositoryError> {
        let rows = sqlx::query_as::<_, BillboardRow>(
            r"
            SELECT id, store_id, label, image_url, created_at, updated_at
            FROM admin.billboard
            WHERE store_id = $1
            ORDER BY created_at DESC, id DESC
            ",
        )
        .bind(store)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Get a billboard within a store.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(
        &self,
        store: StoreId,
        id: BillboardId,
    ) -> Result<Option<Billboard>, RepositoryError> {
        let row = sqlx::query_as::<_, BillboardRow>(
            r"
            SELECT id, store_id, label, image_url, created_at, updated_at
            FROM admin.billboard
            WHERE store_id = $1 AND id = $2
            ",
        )
        .bind(store)
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    /// Create a billboard.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the store does not exist.
    pub async fn create(
        &self,
        store: StoreId,
        draft: &BillboardDraft,
    ) -> Result<Billboard, RepositoryError> {
        let row = sqlx::query_as::<_, BillboardRow>(
            r"
            INSERT INTO admin.billboard (id, store_id, label, image_url)
            VALUES ($1, $2, $3, $4)
            RETURNING id, store_id, label, image_url, created_at, updated_at
            ",
        )
        .bind(BillboardId::generate())
        .bind(store)
        .bind(draft.label.as_str())
        .bind(draft.image_url.as_str())
        .fetch_one(self.pool)
        .await
        .map_err(RepositoryError::from_write)?;

        Ok(row.into())
    }

    /// Replace a billboard's label and image.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no such billboard is in the store.
    pub async fn update(
        &self,
        store: StoreId,
        id: BillboardId,
        draft: &BillboardDraft,
    ) -> Result<Billboard, RepositoryError> {
        let row = sqlx::query_as::<_, BillboardRow>(
            r"
            UPDATE admin.billboard
            SET label = $3, image_url = $4, updated_at = now()
            WHERE store_id = $1 AND id = $2
            RETURNING id, store_id, label, image_url, created_at, updated_at
            ",
        )
        .bind(store)
        .bind(id)
        .bind(draft.label.as_str())
        .bind(draft.image_url.as_str())
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        Ok(row.into())
    }

    /// Delete a billboard no category uses.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if a category still uses it.
    pub async fn delete(
        &self,
        store: StoreId,
        id: BillboardId,
    ) -> Result<Billboard, RepositoryError> {
        let row = sqlx::query_as::<_, BillboardRow>(
            r"
            DELETE FROM admin.billboard
            WHERE store_id = $1 AND id = $2
            RETURNING id, store_id, label, image_url, created_at, updated_at
            ",
        )
        .bind(store)
        .bind(id)
        .fetch_optional(self.pool)
        .await
        .map_err(RepositoryError::from_write)?
        .ok_or(RepositoryError::NotFound)?;

        Ok(row.into())
    }
}
