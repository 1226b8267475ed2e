//! `PostgreSQL` backend for [`CatalogStore`].

use async_trait::async_trait;
use sqlx::PgPool;

use storeadmin_core::{
    Billboard, BillboardDraft, BillboardId, Category, CategoryDetail, CategoryDraft, CategoryId,
    Color, ColorDraft, ColorId, Email, Order, OrderDetail, OrderDraft, OrderId, OwnerId, Product,
    ProductDetail, ProductDraft, ProductFilter, ProductId, Size, SizeDraft, SizeId, Store,
    StoreDraft, StoreId,
};

use super::billboards::BillboardRepository;
use super::categories::CategoryRepository;
use super::colors::ColorRepository;
use super::orders::OrderRepository;
use super::owners::OwnerRepository;
use super::products::ProductRepository;
use super::sizes::SizeRepository;
use super::stores::StoreRepository;
use super::{CatalogStore, RepositoryError, category_details, order_details, product_details};
use crate::models::{Owner, OwnerCredentials};

/// Catalog storage backed by the admin database.
#[derive(Debug, Clone)]
pub struct PgCatalogStore {
    pool: PgPool,
}

impl PgCatalogStore {
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// The underlying pool (used for the session store).
    #[must_use]
    pub const fn pool(&self) -> &PgPool {
        &self.pool
    }

    async fn detail_products(
        &self,
        store: StoreId,
        products: Vec<Product>,
    ) -> Result<Vec<ProductDetail>, RepositoryError> {
        if products.is_empty() {
            return Ok(Vec::new());
        }
        let categories = CategoryRepository::new(&self.pool).list(store).await?;
        let sizes = SizeRepository::new(&self.pool).list(store).await?;
        let colors = ColorRepository::new(&self.pool).list(store).await?;
        product_details(products, &categories, &sizes, &colors)
    }

    async fn detail_orders(
        &self,
        store: StoreId,
        orders: Vec<Order>,
    ) -> Result<Vec<OrderDetail>, RepositoryError> {
        let mut ids: Vec<ProductId> = orders
            .iter()
            .flat_map(|order| order.items.iter().map(|item| item.product_id))
            .collect();
        ids.sort_unstable();
        ids.dedup();
        let products = ProductRepository::new(&self.pool)
            .list_by_ids(store, &ids)
            .await?;
        Ok(order_details(orders, &products))
    }
}

#[async_trait]
impl CatalogStore for PgCatalogStore {
    async fn ping(&self) -> Result<(), RepositoryError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn create_owner(
        &self,
        email: &Email,
        name: &str,
        password_hash: &str,
    ) -> Result<Owner, RepositoryError> {
        OwnerRepository::new(&self.pool)
            .create(email, name, password_hash)
            .await
    }

    async fn owner_by_email(
        &self,
        email: &Email,
    ) -> Result<Option<OwnerCredentials>, RepositoryError> {
        OwnerRepository::new(&self.pool).get_by_email(email).await
    }

    async fn owner_by_id(&self, id: OwnerId) -> Result<Option<Owner>, RepositoryError> {
        OwnerRepository::new(&self.pool).get_by_id(id).await
    }

    async fn list_stores(&self, owner: OwnerId) -> Result<Vec<Store>, RepositoryError> {
        StoreRepository::new(&self.pool).list_for_owner(owner).await
    }

    async fn get_store(&self, id: StoreId) -> Result<Option<Store>, RepositoryError> {
        StoreRepository::new(&self.pool).get(id).await
    }

    async fn create_store(
        &self,
        owner: OwnerId,
        draft: &StoreDraft,
    ) -> Result<Store, RepositoryError> {
        StoreRepository::new(&self.pool).create(owner, draft).await
    }

    async fn update_store(
        &self,
        id: StoreId,
        draft: &StoreDraft,
    ) -> Result<Store, RepositoryError> {
        StoreRepository::new(&self.pool).update(id, draft).await
    }

    async fn delete_store(&self, id: StoreId) -> Result<Store, RepositoryError> {
        StoreRepository::new(&self.pool).delete(id).await
    }

    async fn list_billboards(&self, store: StoreId) -> Result<Vec<Billboard>, RepositoryError> {
        BillboardRepository::new(&self.pool).list(store).await
    }

    async fn get_billboard(
        &self,
        store: StoreId,
        id: BillboardId,
    ) -> Result<Option<Billboard>, RepositoryError> {
        BillboardRepository::new(&self.pool).get(store, id).await
    }

    async fn create_billboard(
        &self,
        store: StoreId,
        draft: &BillboardDraft,
    ) -> Result<Billboard, RepositoryError> {
        BillboardRepository::new(&self.pool)
            .create(store, draft)
            .await
    }

    async fn update_billboard(
        &self,
        store: StoreId,
        id: BillboardId,
        draft: &BillboardDraft,
    ) -> Result<Billboard, RepositoryError> {
        BillboardRepository::new(&self.pool)
            .update(store, id, draft)
            .await
    }

    async fn delete_billboard(
        &self,
        store: StoreId,
        id: BillboardId,
    ) -> Result<Billboard, RepositoryError> {
        BillboardRepository::new(&self.pool).delete(store, id).await
    }

    async fn list_categories(
        &self,
        store: StoreId,
    ) -> Result<Vec<CategoryDetail>, RepositoryError> {
        let categories = CategoryRepository::new(&self.pool).list(store).await?;
        let billboards = BillboardRepository::new(&self.pool).list(store).await?;
        category_details(categories, &billboards)
    }

    async fn get_category(
        &self,
        store: StoreId,
        id: CategoryId,
    ) -> Result<Option<CategoryDetail>, RepositoryError> {
        let Some(category) = CategoryRepository::new(&self.pool).get(store, id).await? else {
            return Ok(None);
        };
        let billboard = BillboardRepository::new(&self.pool)
            .get(store, category.billboard_id)
            .await?;
        let billboards: Vec<Billboard> = billboard.into_iter().collect();
        Ok(category_details(vec![category], &billboards)?.pop())
    }

    async fn create_category(
        &self,
        store: StoreId,
        draft: &CategoryDraft,
    ) -> Result<Category, RepositoryError> {
        CategoryRepository::new(&self.pool)
            .create(store, draft)
            .await
    }

    async fn update_category(
        &self,
        store: StoreId,
        id: CategoryId,
        draft: &CategoryDraft,
    ) -> Result<Category, RepositoryError> {
        CategoryRepository::new(&self.pool)
            .update(store, id, draft)
            .await
    }

    async fn delete_category(
        &self,
        store: StoreId,
        id: CategoryId,
    ) -> Result<Category, RepositoryError> {
        CategoryRepository::new(&self.pool).delete(store, id).await
    }

    async fn list_sizes(&self, store: StoreId) -> Result<Vec<Size>, RepositoryError> {
        SizeRepository::new(&self.pool).list(store).await
    }

    async fn get_size(&self, store: StoreId, id: SizeId) -> Result<Option<Size>, RepositoryError> {
        SizeRepository::new(&self.pool).get(store, id).await
    }

    async fn create_size(
        &self,
        store: StoreId,
        draft: &SizeDraft,
    ) -> Result<Size, RepositoryError> {
        SizeRepository::new(&self.pool).create(store, draft).await
    }

    async fn update_size(
        &self,
        store: StoreId,
        id: SizeId,
        draft: &SizeDraft,
    ) -> Result<Size, RepositoryError> {
        SizeRepository::new(&self.pool)
            .update(store, id, draft)
            .await
    }

    async fn delete_size(&self, store: StoreId, id: SizeId) -> Result<Size, RepositoryError> {
        SizeRepository::new(&self.pool).delete(store, id).await
    }

    async fn list_colors(&self, store: StoreId) -> Result<Vec<Color>, RepositoryError> {
        ColorRepository::new(&self.pool).list(store).await
    }

    async fn get_color(
        &self,
        store: StoreId,
        id: ColorId,
    ) -> Result<Option<Color>, RepositoryError> {
        ColorRepository::new(&self.pool).get(store, id).await
    }

    async fn create_color(
        &self,
        store: StoreId,
        draft: &ColorDraft,
    ) -> Result<Color, RepositoryError> {
        ColorRepository::new(&self.pool).create(store, draft).await
    }

    async fn update_color(
        &self,
        store: StoreId,
        id: ColorId,
        draft: &ColorDraft,
    ) -> Result<Color, RepositoryError> {
        ColorRepository::new(&self.pool)
            .update(store, id, draft)
            .await
    }

    async fn delete_color(&self, store: StoreId, id: ColorId) -> Result<Color, RepositoryError> {
        ColorRepository::new(&self.pool).delete(store, id).await
    }

    async fn list_products(
        &self,
        store: StoreId,
        filter: &ProductFilter,
    ) -> Result<Vec<ProductDetail>, RepositoryError> {
        let products = ProductRepository::new(&self.pool)
            .list(store, filter)
            .await?;
        self.detail_products(store, products).await
    }

    async fn get_product(
        &self,
        store: StoreId,
        id: ProductId,
    ) -> Result<Option<ProductDetail>, RepositoryError> {
        let products: Vec<Product> = ProductRepository::new(&self.pool)
            .get(store, id)
            .await?
            .into_iter()
            .collect();
        Ok(self.detail_products(store, products).await?.pop())
    }

    async fn create_product(
        &self,
        store: StoreId,
        draft: &ProductDraft,
    ) -> Result<Product, RepositoryError> {
        ProductRepository::new(&self.pool)
            .create(store, draft)
            .await
    }

    async fn update_product(
        &self,
        store: StoreId,
        id: ProductId,
        draft: &ProductDraft,
    ) -> Result<Product, RepositoryError> {
        ProductRepository::new(&self.pool)
            .update(store, id, draft)
            .await
    }

    async fn delete_product(
        &self,
        store: StoreId,
        id: ProductId,
    ) -> Result<Product, RepositoryError> {
        ProductRepository::new(&self.pool).delete(store, id).await
    }

    async fn list_orders(&self, store: StoreId) -> Result<Vec<OrderDetail>, RepositoryError> {
        let orders = OrderRepository::new(&self.pool).list(store).await?;
        self.detail_orders(store, orders).await
    }

    async fn get_order(
        &self,
        store: StoreId,
        id: OrderId,
    ) -> Result<Option<OrderDetail>, RepositoryError> {
        let orders: Vec<Order> = OrderRepository::new(&self.pool)
            .get(store, id)
            .await?
            .into_iter()
            .collect();
        Ok(self.detail_orders(store, orders).await?.pop())
    }

    async fn create_order(
        &self,
        store: StoreId,
        draft: &OrderDraft,
    ) -> Result<Order, RepositoryError> {
        OrderRepository::new(&self.pool).create(store, draft).await
    }

    async fn update_order(
        &self,
        store: StoreId,
        id: OrderId,
        draft: &OrderDraft,
    ) -> Result<Order, RepositoryError> {
        OrderRepository::new(&self.pool)
            .update(store, id, draft)
            .await
    }

    async fn delete_order(&self, store: StoreId, id: OrderId) -> Result<Order, RepositoryError> {
        OrderRepository::new(&self.pool).delete(store, id).await
    }
}
