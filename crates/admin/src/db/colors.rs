//! Color repository for database operations.
//!
//! Values are stored lowercased, as `#rrggbb` style hex codes.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use storeadmin_core::{Color, ColorDraft, ColorId, StoreId};

use super::RepositoryError;

#[derive(Debug, sqlx::FromRow)]
struct ColorRow {
    id: ColorId,
    store_id: StoreId,
    name: String,
    value: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ColorRow> for Color {
    fn from(row: ColorRow) -> Self {
        Self {
            id: row.id,
            store_id: row.store_id,
            name: row.name,
            value: row.value,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Repository for color database operations.
pub struct ColorRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ColorRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List a store's colors, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self, store: StoreId) -> Result<Vec<Color>, RepositoryError> {
        let rows = sqlx::query_as::<_, ColorRow>(
            r"
            SELECT id, store_id, name, value, created_at, updated_at
            FROM admin.color
            WHERE store_id = $1
            ORDER BY created_at DESC, id DESC
            ",
        )
        .bind(store)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Get a color within a store.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, store: StoreId, id: ColorId) -> Result<Option<Color>, RepositoryError> {
        let row = sqlx::query_as::<_, ColorRow>(
            r"
            SELECT id, store_id, name, value, created_at, updated_at
            FROM admin.color
            WHERE store_id = $1 AND id = $2
            ",
        )
        .bind(store)
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    /// Create a color.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the store does not exist.
    pub async fn create(&self, store: StoreId, draft: &ColorDraft) -> Result<Color, RepositoryError> {
        let row = sqlx::query_as::<_, ColorRow>(
            r"
            INSERT INTO admin.color (id, store_id, name, value)
            VALUES ($1, $2, $3, $4)
            RETURNING id, store_id, name, value, created_at, updated_at
            ",
        )
        .bind(ColorId::generate())
        .bind(store)
        .bind(draft.name.as_str())
        .bind(draft.value.as_str())
        .fetch_one(self.pool)
        .await
        .map_err(RepositoryError::from_write)?;

        Ok(row.into())
    }

    /// Replace a color's name and value.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no such color is in the store.
    pub async fn update(
        &self,
        store: StoreId,
        id: ColorId,
        draft: &ColorDraft,
    ) -> Result<Color, RepositoryError> {
        let row = sqlx::query_as::<_, ColorRow>(
            r"
            UPDATE admin.color
            SET name = $3, value = $4, updated_at = now()
            WHERE store_id = $1 AND id = $2
            RETURNING id, store_id, name, value, created_at, updated_at
            ",
        )
        .bind(store)
        .bind(id)
        .bind(draft.name.as_str())
        .bind(draft.value.as_str())
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        Ok(row.into())
    }

    /// Delete a color no product uses.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if a product still uses it.
    pub async fn delete(&self, store: StoreId, id: ColorId) -> Result<Color, RepositoryError> {
        let row = sqlx::query_as::<_, ColorRow>(
            r"
            DELETE FROM admin.color
            WHERE store_id = $1 AND id = $2
            RETURNING id, store_id, name, value, created_at, updated_at
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
