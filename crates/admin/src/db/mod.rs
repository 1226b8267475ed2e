//! Persistence for owners, stores and the store-scoped catalog.
//!
//! # Tables (schema `admin`)
//!
//! - `owner` - Store owners (email + Argon2 password hash)
//! - `store` - Tenants, each owned by one owner
//! - `billboard`, `category`, `size`, `color` - Catalog building blocks
//! - `product`, `product_image` - Products and their ordered gallery
//! - `store_order`, `order_item` - Orders and the products on them
//! - `session` - tower-sessions storage
//!
//! # Backends
//!
//! Handlers and services talk to [`CatalogStore`]. [`PgCatalogStore`] is the
//! production backend; [`MemoryCatalogStore`] keeps everything in process
//! and is what the test suites run against.
//!
//! # Migrations
//!
//! Migrations are stored in `crates/admin/migrations/` and run via:
//! ```bash
//! cargo run -p storeadmin-cli -- migrate
//! ```

pub mod billboards;
pub mod categories;
pub mod colors;
pub mod memory;
pub mod orders;
pub mod owners;
pub mod postgres;
pub mod products;
pub mod sizes;
pub mod stores;

use std::time::Duration;

use async_trait::async_trait;
use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

use storeadmin_core::{
    Billboard, BillboardDraft, BillboardId, Category, CategoryDetail, CategoryDraft, CategoryId,
    Color, ColorDraft, ColorId, Email, Order, OrderDetail, OrderDraft, OrderId, OwnerId, Product,
    ProductDetail, ProductDraft, ProductFilter, ProductId, Size, SizeDraft, SizeId, Store,
    StoreDraft, StoreId,
};

use crate::models::{Owner, OwnerCredentials};

pub use memory::MemoryCatalogStore;
pub use postgres::PgCatalogStore;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (unique email, row still referenced).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

impl RepositoryError {
    /// Classify an error from a write.
    ///
    /// Unique and foreign key violations become [`RepositoryError::Conflict`];
    /// everything else stays a database error.
    pub(crate) fn from_write(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db) = &err
            && (db.is_unique_violation() || db.is_foreign_key_violation())
        {
            return Self::Conflict(db.message().to_owned());
        }
        Self::Database(err)
    }
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}

/// Storage backend for everything the admin persists.
///
/// Reads are scoped to a store: asking for a row through the wrong store
/// yields `None`, and writes through the wrong store yield
/// [`RepositoryError::NotFound`]. Deleting a row that is still referenced
/// yields [`RepositoryError::Conflict`] and leaves every row in place.
/// Lists are newest first.
///
/// Ownership is not checked here; that is the guard's job.
#[async_trait]
pub trait CatalogStore: Send + Sync + 'static {
    /// Cheap connectivity check for readiness probes.
    async fn ping(&self) -> Result<(), RepositoryError>;

    // Owners
    async fn create_owner(
        &self,
        email: &Email,
        name: &str,
        password_hash: &str,
    ) -> Result<Owner, RepositoryError>;
    async fn owner_by_email(
        &self,
        email: &Email,
    ) -> Result<Option<OwnerCredentials>, RepositoryError>;
    async fn owner_by_id(&self, id: OwnerId) -> Result<Option<Owner>, RepositoryError>;

    // Stores
    async fn list_stores(&self, owner: OwnerId) -> Result<Vec<Store>, RepositoryError>;
    async fn get_store(&self, id: StoreId) -> Result<Option<Store>, RepositoryError>;
    async fn create_store(
        &self,
        owner: OwnerId,
        draft: &StoreDraft,
    ) -> Result<Store, RepositoryError>;
    async fn update_store(&self, id: StoreId, draft: &StoreDraft)
    -> Result<Store, RepositoryError>;
    async fn delete_store(&self, id: StoreId) -> Result<Store, RepositoryError>;

    // Billboards
    async fn list_billboards(&self, store: StoreId) -> Result<Vec<Billboard>, RepositoryError>;
    async fn get_billboard(
        &self,
        store: StoreId,
        id: BillboardId,
    ) -> Result<Option<Billboard>, RepositoryError>;
    async fn create_billboard(
        &self,
        store: StoreId,
        draft: &BillboardDraft,
    ) -> Result<Billboard, RepositoryError>;
    async fn update_billboard(
        &self,
        store: StoreId,
        id: BillboardId,
        draft: &BillboardDraft,
    ) -> Result<Billboard, RepositoryError>;
    async fn delete_billboard(
        &self,
        store: StoreId,
        id: BillboardId,
    ) -> Result<Billboard, RepositoryError>;

    // Categories
    async fn list_categories(
        &self,
        store: StoreId,
    ) -> Result<Vec<CategoryDetail>, RepositoryError>;
    async fn get_category(
        &self,
        store: StoreId,
        id: CategoryId,
    ) -> Result<Option<CategoryDetail>, RepositoryError>;
    async fn create_category(
        &self,
        store: StoreId,
        draft: &CategoryDraft,
    ) -> Result<Category, RepositoryError>;
    async fn update_category(
        &self,
        store: StoreId,
        id: CategoryId,
        draft: &CategoryDraft,
    ) -> Result<Category, RepositoryError>;
    async fn delete_category(
        &self,
        store: StoreId,
        id: CategoryId,
    ) -> Result<Category, RepositoryError>;

    // Sizes
    async fn list_sizes(&self, store: StoreId) -> Result<Vec<Size>, RepositoryError>;
    async fn get_size(&self, store: StoreId, id: SizeId) -> Result<Option<Size>, RepositoryError>;
    async fn create_size(&self, store: StoreId, draft: &SizeDraft)
    -> Result<Size, RepositoryError>;
    async fn update_size(
        &self,
        store: StoreId,
        id: SizeId,
        draft: &SizeDraft,
    ) -> Result<Size, RepositoryError>;
    async fn delete_size(&self, store: StoreId, id: SizeId) -> Result<Size, RepositoryError>;

    // Colors
    async fn list_colors(&self, store: StoreId) -> Result<Vec<Color>, RepositoryError>;
    async fn get_color(&self, store: StoreId, id: ColorId)
    -> Result<Option<Color>, RepositoryError>;
    async fn create_color(
        &self,
        store: StoreId,
        draft: &ColorDraft,
    ) -> Result<Color, RepositoryError>;
    async fn update_color(
        &self,
        store: StoreId,
        id: ColorId,
        draft: &ColorDraft,
    ) -> Result<Color, RepositoryError>;
    async fn delete_color(&self, store: StoreId, id: ColorId) -> Result<Color, RepositoryError>;

    // Products
    async fn list_products(
        &self,
        store: StoreId,
        filter: &ProductFilter,
    ) -> Result<Vec<ProductDetail>, RepositoryError>;
    async fn get_product(
        &self,
        store: StoreId,
        id: ProductId,
    ) -> Result<Option<ProductDetail>, RepositoryError>;
    async fn create_product(
        &self,
        store: StoreId,
        draft: &ProductDraft,
    ) -> Result<Product, RepositoryError>;
    async fn update_product(
        &self,
        store: StoreId,
        id: ProductId,
        draft: &ProductDraft,
    ) -> Result<Product, RepositoryError>;
    async fn delete_product(
        &self,
        store: StoreId,
        id: ProductId,
    ) -> Result<Product, RepositoryError>;

    // Orders
    async fn list_orders(&self, store: StoreId) -> Result<Vec<OrderDetail>, RepositoryError>;
    async fn get_order(
        &self,
        store: StoreId,
        id: OrderId,
    ) -> Result<Option<OrderDetail>, RepositoryError>;
    async fn create_order(
        &self,
        store: StoreId,
        draft: &OrderDraft,
    ) -> Result<Order, RepositoryError>;
    async fn update_order(
        &self,
        store: StoreId,
        id: OrderId,
        draft: &OrderDraft,
    ) -> Result<Order, RepositoryError>;
    async fn delete_order(&self, store: StoreId, id: OrderId) -> Result<Order, RepositoryError>;
}

// =============================================================================
// Projection helpers shared by both backends
// =============================================================================

/// Embed each category's billboard.
pub(crate) fn category_details(
    categories: Vec<Category>,
    billboards: &[Billboard],
) -> Result<Vec<CategoryDetail>, RepositoryError> {
    categories
        .into_iter()
        .map(|category| {
            let billboard = billboards
                .iter()
                .find(|b| b.id == category.billboard_id)
                .cloned()
                .ok_or_else(|| dangling("category", category.id, "billboard"))?;
            Ok(CategoryDetail {
                category,
                billboard,
            })
        })
        .collect()
}

/// Embed each product's category, size and color.
pub(crate) fn product_details(
    products: Vec<Product>,
    categories: &[Category],
    sizes: &[Size],
    colors: &[Color],
) -> Result<Vec<ProductDetail>, RepositoryError> {
    products
        .into_iter()
        .map(|product| {
            let category = categories
                .iter()
                .find(|c| c.id == product.category_id)
                .cloned()
                .ok_or_else(|| dangling("product", product.id, "category"))?;
            let size = sizes
                .iter()
                .find(|s| s.id == product.size_id)
                .cloned()
                .ok_or_else(|| dangling("product", product.id, "size"))?;
            let color = colors
                .iter()
                .find(|c| c.id == product.color_id)
                .cloned()
                .ok_or_else(|| dangling("product", product.id, "color"))?;
            Ok(ProductDetail {
                product,
                category,
                size,
                color,
            })
        })
        .collect()
}

/// Resolve each order against the store's products.
pub(crate) fn order_details(orders: Vec<Order>, products: &[Product]) -> Vec<OrderDetail> {
    orders
        .into_iter()
        .map(|order| OrderDetail::assemble(order, products))
        .collect()
}

fn dangling(kind: &str, id: impl std::fmt::Display, target: &str) -> RepositoryError {
    RepositoryError::DataCorruption(format!("{kind} {id} points at a missing {target}"))
}
