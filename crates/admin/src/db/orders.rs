//! Order repository for database operations.
//!
//! Orders are stored in `admin.store_order` (`order` is reserved) with their
//! line items in `admin.order_item`.

use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use storeadmin_core::{Order, OrderDraft, OrderId, OrderItem, OrderItemId, ProductId, StoreId};

use super::RepositoryError;

#[derive(Debug, sqlx::FromRow)]
struct OrderRow {
    id: OrderId,
    store_id: StoreId,
    is_paid: bool,
    phone: String,
    address: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, sqlx::FromRow)]
struct OrderItemRow {
    id: OrderItemId,
    order_id: OrderId,
    product_id: ProductId,
}

impl OrderRow {
    fn into_order(self, items: &[OrderItemRow]) -> Order {
        Order {
            id: self.id,
            store_id: self.store_id,
            is_paid: self.is_paid,
            phone: self.phone,
            address: self.address,
            items: items
                .iter()
                .filter(|item| item.order_id == self.id)
                .map(|item| OrderItem {
                    id: item.id,
                    product_id: item.product_id,
                })
                .collect(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Repository for order database operations.
pub struct OrderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List a store's orders with their items, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self, store: StoreId) -> Result<Vec<Order>, RepositoryError> {
        let rows = sqlx::query_as::<_, OrderRow>(
            r"
            SELECT id, store_id, is_paid, phone, address, created_at, updated_at
            FROM admin.store_order
            WHERE store_id = $1
            ORDER BY created_at DESC, id DESC
            ",
        )
        .bind(store)
        .fetch_all(self.pool)
        .await?;

        self.with_items(rows).await
    }

    /// Get an order within a store.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, store: StoreId, id: OrderId) -> Result<Option<Order>, RepositoryError> {
        let row = sqlx::query_as::<_, OrderRow>(
            r"
            SELECT id, store_id, is_paid, phone, address, created_at, updated_at
            FROM admin.store_order
            WHERE store_id = $1 AND id = $2
            ",
        )
        .bind(store)
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };
        Ok(self.with_items(vec![row]).await?.into_iter().next())
    }

    /// Create an order and its items.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if a product on the order is gone.
    pub async fn create(&self, store: StoreId, draft: &OrderDraft) -> Result<Order, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query_as::<_, OrderRow>(
            r"
            INSERT INTO admin.store_order (id, store_id, is_paid, phone, address)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, store_id, is_paid, phone, address, created_at, updated_at
            ",
        )
        .bind(OrderId::generate())
        .bind(store)
        .bind(draft.is_paid)
        .bind(draft.phone.as_str())
        .bind(draft.address.as_str())
        .fetch_one(&mut *tx)
        .await
        .map_err(RepositoryError::from_write)?;

        let items = insert_items(&mut tx, row.id, &draft.product_ids).await?;
        tx.commit().await?;

        Ok(row.into_order(&items))
    }

    /// Replace an order's fields and items.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no such order is in the store.
    pub async fn update(
        &self,
        store: StoreId,
        id: OrderId,
        draft: &OrderDraft,
    ) -> Result<Order, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query_as::<_, OrderRow>(
            r"
            UPDATE admin.store_order
            SET is_paid = $3, phone = $4, address = $5, updated_at = now()
            WHERE store_id = $1 AND id = $2
            RETURNING id, store_id, is_paid, phone, address, created_at, updated_at
            ",
        )
        .bind(store)
        .bind(id)
        .bind(draft.is_paid)
        .bind(draft.phone.as_str())
        .bind(draft.address.as_str())
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        sqlx::query("DELETE FROM admin.order_item WHERE order_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        let items = insert_items(&mut tx, row.id, &draft.product_ids).await?;
        tx.commit().await?;

        Ok(row.into_order(&items))
    }

    /// Delete an order. Its items go with it.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no such order is in the store.
    pub async fn delete(&self, store: StoreId, id: OrderId) -> Result<Order, RepositoryError> {
        let Some(order) = self.get(store, id).await? else {
            return Err(RepositoryError::NotFound);
        };

        sqlx::query("DELETE FROM admin.store_order WHERE store_id = $1 AND id = $2")
            .bind(store)
            .bind(id)
            .execute(self.pool)
            .await
            .map_err(RepositoryError::from_write)?;

        Ok(order)
    }

    async fn with_items(&self, rows: Vec<OrderRow>) -> Result<Vec<Order>, RepositoryError> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }
        let ids: Vec<Uuid> = rows.iter().map(|row| row.id.as_uuid()).collect();
        let items = sqlx::query_as::<_, OrderItemRow>(
            r"
            SELECT id, order_id, product_id
            FROM admin.order_item
            WHERE order_id = ANY($1)
            ORDER BY order_id, position
            ",
        )
        .bind(ids)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(|row| row.into_order(&items)).collect())
    }
}

async fn insert_items(
    tx: &mut Transaction<'_, Postgres>,
    order: OrderId,
    products: &[ProductId],
) -> Result<Vec<OrderItemRow>, RepositoryError> {
    let mut items = Vec::with_capacity(products.len());
    for (position, product) in (0_i32..).zip(products) {
        let item = sqlx::query_as::<_, OrderItemRow>(
            r"
            INSERT INTO admin.order_item (id, order_id, product_id, position)
            VALUES ($1, $2, $3, $4)
            RETURNING id, order_id, product_id
            ",
        )
        .bind(OrderItemId::generate())
        .bind(order)
        .bind(*product)
        .bind(position)
        .fetch_one(&mut **tx)
        .await
        .map_err(RepositoryError::from_write)?;
        items.push(item);
    }
    Ok(items)
}
