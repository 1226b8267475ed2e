//! Category repository for database operations.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use storeadmin_core::{BillboardId, Category, CategoryDraft, CategoryId, StoreId};

use super::RepositoryError;

#[derive(Debug, sqlx::FromRow)]
struct CategoryRow {
    id: CategoryId,
    store_id: StoreId,
    billboard_id: BillboardId,
    name: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<CategoryRow> for Category {
    fn from(row: CategoryRow) -> Self {
        Self {
            id: row.id,
            store_id: row.store_id,
            billboard_id: row.billboard_id,
            name: row.name,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Repository for category database operations.
///
/// Returns bare categories; embedding the billboard happens one level up.
pub struct CategoryRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CategoryRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List a store's categories, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self, store: StoreId) -> Result<Vec<Category>, RepositoryError> {
        let rows = sqlx::query_as::<_, CategoryRow>(
            r"
            SELECT id, store_id, billboard_id, name, created_at, updated_at
            FROM admin.category
            WHERE store_id = $1
            ORDER BY created_at DESC, id DESC
            ",
        )
        .bind(store)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Get a category within a store.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(
        &self,
        store: StoreId,
        id: CategoryId,
    ) -> Result<Option<Category>, RepositoryError> {
        let row = sqlx::query_as::<_, CategoryRow>(
            r"
            SELECT id, store_id, billboard_id, name, created_at, updated_at
            FROM admin.category
            WHERE store_id = $1 AND id = $2
            ",
        )
        .bind(store)
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    /// Create a category.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the billboard or store is gone.
    pub async fn create(
        &self,
        store: StoreId,
        draft: &CategoryDraft,
    ) -> Result<Category, RepositoryError> {
        let row = sqlx::query_as::<_, CategoryRow>(
            r"
            INSERT INTO admin.category (id, store_id, billboard_id, name)
            VALUES ($1, $2, $3, $4)
            RETURNING id, store_id, billboard_id, name, created_at, updated_at
            ",
        )
        .bind(CategoryId::generate())
        .bind(store)
        .bind(draft.billboard_id)
        .bind(draft.name.as_str())
        .fetch_one(self.pool)
        .await
        .map_err(RepositoryError::from_write)?;

        Ok(row.into())
    }

    /// Replace a category's name and billboard.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no such category is in the store.
    pub async fn update(
        &self,
        store: StoreId,
        id: CategoryId,
        draft: &CategoryDraft,
    ) -> Result<Category, RepositoryError> {
        let row = sqlx::query_as::<_, CategoryRow>(
            r"
            UPDATE admin.category
            SET name = $3, billboard_id = $4, updated_at = now()
            WHERE store_id = $1 AND id = $2
            RETURNING id, store_id, billboard_id, name, created_at, updated_at
            ",
        )
        .bind(store)
        .bind(id)
        .bind(draft.name.as_str())
        .bind(draft.billboard_id)
        .fetch_optional(self.pool)
        .await
        .map_err(RepositoryError::from_write)?
        .ok_or(RepositoryError::NotFound)?;

        Ok(row.into())
    }

    /// Delete a category no product uses.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if a product is still in it.
    pub async fn delete(
        &self,
        store: StoreId,
        id: CategoryId,
    ) -> Result<Category, RepositoryError> {
        let row = sqlx::query_as::<_, CategoryRow>(
            r"
            DELETE FROM admin.category
            WHERE store_id = $1 AND id = $2
            RETURNING id, store_id, billboard_id, name, created_at, updated_at
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
