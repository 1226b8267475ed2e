//! Product repository for database operations.
//!
//! A product's gallery lives in `admin.product_image`, ordered by `position`.
//! Writes replace the whole gallery inside the same transaction as the
//! product row, so readers never see a product without its images.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use storeadmin_core::{
    CategoryId, ColorId, Image, ImageId, Price, Product, ProductDraft, ProductFilter, ProductId,
    RequiredText, SizeId, StoreId,
};

use super::RepositoryError;

// =============================================================================
// Internal Row Types
// =============================================================================

#[derive(Debug, sqlx::FromRow)]
struct ProductRow {
    id: ProductId,
    store_id: StoreId,
    category_id: CategoryId,
    size_id: SizeId,
    color_id: ColorId,
    name: String,
    price: Decimal,
    is_featured: bool,
    is_archived: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, sqlx::FromRow)]
struct ImageRow {
    id: ImageId,
    product_id: ProductId,
    url: String,
}

impl ProductRow {
    fn into_product(self, images: &[ImageRow]) -> Result<Product, RepositoryError> {
        let price = Price::new(self.price).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid price for product {}: {e}", self.id))
        })?;

        Ok(Product {
            id: self.id,
            store_id: self.store_id,
            category_id: self.category_id,
            size_id: self.size_id,
            color_id: self.color_id,
            name: self.name,
            price,
            is_featured: self.is_featured,
            is_archived: self.is_archived,
            images: images
                .iter()
                .filter(|image| image.product_id == self.id)
                .map(|image| Image {
                    id: image.id,
                    url: image.url.clone(),
                })
                .collect(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

const PRODUCT_COLUMNS: &str = "id, store_id, category_id, size_id, color_id, name, price, \
                               is_featured, is_archived, created_at, updated_at";

// =============================================================================
// Repository
// =============================================================================

/// Repository for product database operations.
pub struct ProductRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List a store's products matching `filter`, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if a stored price is invalid.
    pub async fn list(
        &self,
        store: StoreId,
        filter: &ProductFilter,
    ) -> Result<Vec<Product>, RepositoryError> {
        let sql = format!(
            r"
            SELECT {PRODUCT_COLUMNS}
            FROM admin.product
            WHERE store_id = $1
              AND ($2::uuid IS NULL OR category_id = $2)
              AND ($3::uuid IS NULL OR size_id = $3)
              AND ($4::uuid IS NULL OR color_id = $4)
              AND ($5::boolean IS NULL OR is_featured = $5)
              AND ($6 OR NOT is_archived)
            ORDER BY created_at DESC, id DESC
            "
        );
        let rows = sqlx::query_as::<_, ProductRow>(&sql)
            .bind(store)
            .bind(filter.category_id)
            .bind(filter.size_id)
            .bind(filter.color_id)
            .bind(filter.is_featured)
            .bind(filter.include_archived)
            .fetch_all(self.pool)
            .await?;

        self.with_images(rows).await
    }

    /// Fetch the given products of a store, archived ones included.
    ///
    /// Ids that are not in the store are skipped.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_by_ids(
        &self,
        store: StoreId,
        ids: &[ProductId],
    ) -> Result<Vec<Product>, RepositoryError> {
        let ids: Vec<Uuid> = ids.iter().map(ProductId::as_uuid).collect();
        let sql = format!(
            r"
            SELECT {PRODUCT_COLUMNS}
            FROM admin.product
            WHERE store_id = $1 AND id = ANY($2)
            "
        );
        let rows = sqlx::query_as::<_, ProductRow>(&sql)
            .bind(store)
            .bind(ids)
            .fetch_all(self.pool)
            .await?;

        self.with_images(rows).await
    }

    /// Get a product within a store.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(
        &self,
        store: StoreId,
        id: ProductId,
    ) -> Result<Option<Product>, RepositoryError> {
        let products = self.list_by_ids(store, &[id]).await?;
        Ok(products.into_iter().next())
    }

    /// Create a product and its gallery.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if a referenced row is gone.
    pub async fn create(
        &self,
        store: StoreId,
        draft: &ProductDraft,
    ) -> Result<Product, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let sql = format!(
            r"
            INSERT INTO admin.product
                (id, store_id, category_id, size_id, color_id, name, price, is_featured, is_archived)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {PRODUCT_COLUMNS}
            "
        );
        let row = sqlx::query_as::<_, ProductRow>(&sql)
            .bind(ProductId::generate())
            .bind(store)
            .bind(draft.category_id)
            .bind(draft.size_id)
            .bind(draft.color_id)
            .bind(draft.name.as_str())
            .bind(draft.price.amount())
            .bind(draft.is_featured)
            .bind(draft.is_archived)
            .fetch_one(&mut *tx)
            .await
            .map_err(RepositoryError::from_write)?;

        let images = insert_images(&mut tx, row.id, &draft.image_urls).await?;
        tx.commit().await?;

        row.into_product(&images)
    }

    /// Replace every field of a product, gallery included.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no such product is in the store.
    pub async fn update(
        &self,
        store: StoreId,
        id: ProductId,
        draft: &ProductDraft,
    ) -> Result<Product, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let sql = format!(
            r"
            UPDATE admin.product
            SET category_id = $3, size_id = $4, color_id = $5, name = $6, price = $7,
                is_featured = $8, is_archived = $9, updated_at = now()
            WHERE store_id = $1 AND id = $2
            RETURNING {PRODUCT_COLUMNS}
            "
        );
        let row = sqlx::query_as::<_, ProductRow>(&sql)
            .bind(store)
            .bind(id)
            .bind(draft.category_id)
            .bind(draft.size_id)
            .bind(draft.color_id)
            .bind(draft.name.as_str())
            .bind(draft.price.amount())
            .bind(draft.is_featured)
            .bind(draft.is_archived)
            .fetch_optional(&mut *tx)
            .await
            .map_err(RepositoryError::from_write)?
            .ok_or(RepositoryError::NotFound)?;

        sqlx::query("DELETE FROM admin.product_image WHERE product_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        let images = insert_images(&mut tx, row.id, &draft.image_urls).await?;
        tx.commit().await?;

        row.into_product(&images)
    }

    /// Delete a product that is on no order. Its images go with it.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if an order still lists it.
    pub async fn delete(&self, store: StoreId, id: ProductId) -> Result<Product, RepositoryError> {
        let Some(product) = self.get(store, id).await? else {
            return Err(RepositoryError::NotFound);
        };

        let result = sqlx::query("DELETE FROM admin.product WHERE store_id = $1 AND id = $2")
            .bind(store)
            .bind(id)
            .execute(self.pool)
            .await
            .map_err(RepositoryError::from_write)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(product)
    }

    async fn with_images(&self, rows: Vec<ProductRow>) -> Result<Vec<Product>, RepositoryError> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }
        let ids: Vec<Uuid> = rows.iter().map(|row| row.id.as_uuid()).collect();
        let images = sqlx::query_as::<_, ImageRow>(
            r"
            SELECT id, product_id, url
            FROM admin.product_image
            WHERE product_id = ANY($1)
            ORDER BY product_id, position
            ",
        )
        .bind(ids)
        .fetch_all(self.pool)
        .await?;

        rows.into_iter()
            .map(|row| row.into_product(&images))
            .collect()
    }
}

async fn insert_images(
    tx: &mut Transaction<'_, Postgres>,
    product: ProductId,
    urls: &[RequiredText],
) -> Result<Vec<ImageRow>, RepositoryError> {
    let mut images = Vec::with_capacity(urls.len());
    for (position, url) in (0_i32..).zip(urls) {
        let image = sqlx::query_as::<_, ImageRow>(
            r"
            INSERT INTO admin.product_image (id, product_id, position, url)
            VALUES ($1, $2, $3, $4)
            RETURNING id, product_id, url
            ",
        )
        .bind(ImageId::generate())
        .bind(product)
        .bind(position)
        .bind(url.as_str())
        .fetch_one(&mut **tx)
        .await?;
        images.push(image);
    }
    Ok(images)
}
