//! The store-scoped resource kinds and how each one is stored.
//!
//! Every nested resource (billboards, categories, sizes, colors, products,
//! orders) goes through the same request pipeline in
//! [`CatalogService`](super::CatalogService). What differs per kind lives
//! here: the id and payload types, the read projection, the same-store
//! reference check, and which [`CatalogStore`] methods to call.

use std::fmt::Display;
use std::str::FromStr;

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use uuid::Uuid;

use storeadmin_core::{
    Billboard, BillboardId, BillboardInput, Category, CategoryDetail, CategoryId, CategoryInput,
    Color, ColorId, ColorInput, FieldError, FormSchema, Order, OrderDetail, OrderId, OrderInput,
    Product, ProductDetail, ProductFilter, ProductId, ProductInput, Resource, Size, SizeId,
    SizeInput, StoreId,
};

use super::catalog::CatalogError;
use crate::db::{CatalogStore, RepositoryError};

/// Validated payload type of a resource kind.
pub type DraftOf<K> = <<K as ResourceKind>::Input as FormSchema>::Draft;

/// Query parameters for kinds whose list takes none.
#[derive(Debug, Clone, Copy, Default, serde::Deserialize)]
pub struct NoFilter {}

/// One store-scoped resource kind.
#[async_trait]
pub trait ResourceKind: Send + Sync + 'static {
    type Id: Copy
        + std::fmt::Debug
        + Send
        + Sync
        + Display
        + FromStr
        + DeserializeOwned
        + From<Uuid>
        + Into<Uuid>;
    type Input: FormSchema<Draft: Send + Sync>
        + DeserializeOwned
        + Default
        + Clone
        + Send
        + Sync;
    /// What mutations return.
    type Row: Serialize + Send;
    /// What list and get return.
    type View: Serialize + Send;
    type Filter: DeserializeOwned + Default + Send + Sync;

    fn resource() -> Resource {
        <Self::Input as FormSchema>::RESOURCE
    }

    fn row_id(row: &Self::Row) -> Self::Id;

    async fn list(
        db: &dyn CatalogStore,
        store: StoreId,
        filter: &Self::Filter,
    ) -> Result<Vec<Self::View>, RepositoryError>;

    async fn get(
        db: &dyn CatalogStore,
        store: StoreId,
        id: Self::Id,
    ) -> Result<Option<Self::View>, RepositoryError>;

    /// Reject drafts that point at rows outside `store`.
    async fn check_references(
        _db: &dyn CatalogStore,
        _store: StoreId,
        _draft: &DraftOf<Self>,
    ) -> Result<(), CatalogError> {
        Ok(())
    }

    async fn insert(
        db: &dyn CatalogStore,
        store: StoreId,
        draft: &DraftOf<Self>,
    ) -> Result<Self::Row, RepositoryError>;

    async fn update(
        db: &dyn CatalogStore,
        store: StoreId,
        id: Self::Id,
        draft: &DraftOf<Self>,
    ) -> Result<Self::Row, RepositoryError>;

    async fn remove(
        db: &dyn CatalogStore,
        store: StoreId,
        id: Self::Id,
    ) -> Result<Self::Row, RepositoryError>;
}

fn foreign(field: &str, label: &str) -> CatalogError {
    CatalogError::Invalid(FieldError::new(
        field,
        format!("{label} does not belong to this store"),
    ))
}

// =============================================================================
// Billboards
// =============================================================================

pub struct Billboards;

#[async_trait]
impl ResourceKind for Billboards {
    type Id = BillboardId;
    type Input = BillboardInput;
    type Row = Billboard;
    type View = Billboard;
    type Filter = NoFilter;

    fn row_id(row: &Billboard) -> BillboardId {
        row.id
    }

    async fn list(
        db: &dyn CatalogStore,
        store: StoreId,
        _filter: &NoFilter,
    ) -> Result<Vec<Billboard>, RepositoryError> {
        db.list_billboards(store).await
    }

    async fn get(
        db: &dyn CatalogStore,
        store: StoreId,
        id: BillboardId,
    ) -> Result<Option<Billboard>, RepositoryError> {
        db.get_billboard(store, id).await
    }

    async fn insert(
        db: &dyn CatalogStore,
        store: StoreId,
        draft: &DraftOf<Self>,
    ) -> Result<Billboard, RepositoryError> {
        db.create_billboard(store, draft).await
    }

    async fn update(
        db: &dyn CatalogStore,
        store: StoreId,
        id: BillboardId,
        draft: &DraftOf<Self>,
    ) -> Result<Billboard, RepositoryError> {
        db.update_billboard(store, id, draft).await
    }

    async fn remove(
        db: &dyn CatalogStore,
        store: StoreId,
        id: BillboardId,
    ) -> Result<Billboard, RepositoryError> {
        db.delete_billboard(store, id).await
    }
}

// =============================================================================
// Categories
// =============================================================================

pub struct Categories;

#[async_trait]
impl ResourceKind for Categories {
    type Id = CategoryId;
    type Input = CategoryInput;
    type Row = Category;
    type View = CategoryDetail;
    type Filter = NoFilter;

    fn row_id(row: &Category) -> CategoryId {
        row.id
    }

    async fn list(
        db: &dyn CatalogStore,
        store: StoreId,
        _filter: &NoFilter,
    ) -> Result<Vec<CategoryDetail>, RepositoryError> {
        db.list_categories(store).await
    }

    async fn get(
        db: &dyn CatalogStore,
        store: StoreId,
        id: CategoryId,
    ) -> Result<Option<CategoryDetail>, RepositoryError> {
        db.get_category(store, id).await
    }

    async fn check_references(
        db: &dyn CatalogStore,
        store: StoreId,
        draft: &DraftOf<Self>,
    ) -> Result<(), CatalogError> {
        if db.get_billboard(store, draft.billboard_id).await?.is_none() {
            return Err(foreign("billboardId", "Billboard"));
        }
        Ok(())
    }

    async fn insert(
        db: &dyn CatalogStore,
        store: StoreId,
        draft: &DraftOf<Self>,
    ) -> Result<Category, RepositoryError> {
        db.create_category(store, draft).await
    }

    async fn update(
        db: &dyn CatalogStore,
        store: StoreId,
        id: CategoryId,
        draft: &DraftOf<Self>,
    ) -> Result<Category, RepositoryError> {
        db.update_category(store, id, draft).await
    }

    async fn remove(
        db: &dyn CatalogStore,
        store: StoreId,
        id: CategoryId,
    ) -> Result<Category, RepositoryError> {
        db.delete_category(store, id).await
    }
}

// =============================================================================
// Sizes
// =============================================================================

pub struct Sizes;

#[async_trait]
impl ResourceKind for Sizes {
    type Id = SizeId;
    type Input = SizeInput;
    type Row = Size;
    type View = Size;
    type Filter = NoFilter;

    fn row_id(row: &Size) -> SizeId {
        row.id
    }

    async fn list(
        db: &dyn CatalogStore,
        store: StoreId,
        _filter: &NoFilter,
    ) -> Result<Vec<Size>, RepositoryError> {
        db.list_sizes(store).await
    }

    async fn get(
        db: &dyn CatalogStore,
        store: StoreId,
        id: SizeId,
    ) -> Result<Option<Size>, RepositoryError> {
        db.get_size(store, id).await
    }

    async fn insert(
        db: &dyn CatalogStore,
        store: StoreId,
        draft: &DraftOf<Self>,
    ) -> Result<Size, RepositoryError> {
        db.create_size(store, draft).await
    }

    async fn update(
        db: &dyn CatalogStore,
        store: StoreId,
        id: SizeId,
        draft: &DraftOf<Self>,
    ) -> Result<Size, RepositoryError> {
        db.update_size(store, id, draft).await
    }

    async fn remove(
        db: &dyn CatalogStore,
        store: StoreId,
        id: SizeId,
    ) -> Result<Size, RepositoryError> {
        db.delete_size(store, id).await
    }
}

// =============================================================================
// Colors
// =============================================================================

pub struct Colors;

#[async_trait]
impl ResourceKind for Colors {
    type Id = ColorId;
    type Input = ColorInput;
    type Row = Color;
    type View = Color;
    type Filter = NoFilter;

    fn row_id(row: &Color) -> ColorId {
        row.id
    }

    async fn list(
        db: &dyn CatalogStore,
        store: StoreId,
        _filter: &NoFilter,
    ) -> Result<Vec<Color>, RepositoryError> {
        db.list_colors(store).await
    }

    async fn get(
        db: &dyn CatalogStore,
        store: StoreId,
        id: ColorId,
    ) -> Result<Option<Color>, RepositoryError> {
        db.get_color(store, id).await
    }

    async fn insert(
        db: &dyn CatalogStore,
        store: StoreId,
        draft: &DraftOf<Self>,
    ) -> Result<Color, RepositoryError> {
        db.create_color(store, draft).await
    }

    async fn update(
        db: &dyn CatalogStore,
        store: StoreId,
        id: ColorId,
        draft: &DraftOf<Self>,
    ) -> Result<Color, RepositoryError> {
        db.update_color(store, id, draft).await
    }

    async fn remove(
        db: &dyn CatalogStore,
        store: StoreId,
        id: ColorId,
    ) -> Result<Color, RepositoryError> {
        db.delete_color(store, id).await
    }
}

// =============================================================================
// Products
// =============================================================================

pub struct Products;

#[async_trait]
impl ResourceKind for Products {
    type Id = ProductId;
    type Input = ProductInput;
    type Row = Product;
    type View = ProductDetail;
    type Filter = ProductFilter;

    fn row_id(row: &Product) -> ProductId {
        row.id
    }

    async fn list(
        db: &dyn CatalogStore,
        store: StoreId,
        filter: &ProductFilter,
    ) -> Result<Vec<ProductDetail>, RepositoryError> {
        db.list_products(store, filter).await
    }

    async fn get(
        db: &dyn CatalogStore,
        store: StoreId,
        id: ProductId,
    ) -> Result<Option<ProductDetail>, RepositoryError> {
        db.get_product(store, id).await
    }

    async fn check_references(
        db: &dyn CatalogStore,
        store: StoreId,
        draft: &DraftOf<Self>,
    ) -> Result<(), CatalogError> {
        if db.get_category(store, draft.category_id).await?.is_none() {
            return Err(foreign("categoryId", "Category"));
        }
        if db.get_size(store, draft.size_id).await?.is_none() {
            return Err(foreign("sizeId", "Size"));
        }
        if db.get_color(store, draft.color_id).await?.is_none() {
            return Err(foreign("colorId", "Color"));
        }
        Ok(())
    }

    async fn insert(
        db: &dyn CatalogStore,
        store: StoreId,
        draft: &DraftOf<Self>,
    ) -> Result<Product, RepositoryError> {
        db.create_product(store, draft).await
    }

    async fn update(
        db: &dyn CatalogStore,
        store: StoreId,
        id: ProductId,
        draft: &DraftOf<Self>,
    ) -> Result<Product, RepositoryError> {
        db.update_product(store, id, draft).await
    }

    async fn remove(
        db: &dyn CatalogStore,
        store: StoreId,
        id: ProductId,
    ) -> Result<Product, RepositoryError> {
        db.delete_product(store, id).await
    }
}

// =============================================================================
// Orders
// =============================================================================

pub struct Orders;

#[async_trait]
impl ResourceKind for Orders {
    type Id = OrderId;
    type Input = OrderInput;
    type Row = Order;
    type View = OrderDetail;
    type Filter = NoFilter;

    fn row_id(row: &Order) -> OrderId {
        row.id
    }

    async fn list(
        db: &dyn CatalogStore,
        store: StoreId,
        _filter: &NoFilter,
    ) -> Result<Vec<OrderDetail>, RepositoryError> {
        db.list_orders(store).await
    }

    async fn get(
        db: &dyn CatalogStore,
        store: StoreId,
        id: OrderId,
    ) -> Result<Option<OrderDetail>, RepositoryError> {
        db.get_order(store, id).await
    }

    async fn check_references(
        db: &dyn CatalogStore,
        store: StoreId,
        draft: &DraftOf<Self>,
    ) -> Result<(), CatalogError> {
        for &product in &draft.product_ids {
            if db.get_product(store, product).await?.is_none() {
                return Err(foreign("productIds", "Product"));
            }
        }
        Ok(())
    }

    async fn insert(
        db: &dyn CatalogStore,
        store: StoreId,
        draft: &DraftOf<Self>,
    ) -> Result<Order, RepositoryError> {
        db.create_order(store, draft).await
    }

    async fn update(
        db: &dyn CatalogStore,
        store: StoreId,
        id: OrderId,
        draft: &DraftOf<Self>,
    ) -> Result<Order, RepositoryError> {
        db.update_order(store, id, draft).await
    }

    async fn remove(
        db: &dyn CatalogStore,
        store: StoreId,
        id: OrderId,
    ) -> Result<Order, RepositoryError> {
        db.delete_order(store, id).await
    }
}
