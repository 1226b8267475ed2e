//! In-process backend for [`CatalogStore`].
//!
//! Applies the same rules as the database schema: rows are scoped to their
//! store, references are restricted (deleting a referenced row is a
//! conflict), and product images and order items go with their parent.
//! Used by the test suites and handy for local demos without `PostgreSQL`.

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use storeadmin_core::{
    Billboard, BillboardDraft, BillboardId, Category, CategoryDetail, CategoryDraft, CategoryId,
    Color, ColorDraft, ColorId, Email, Image, ImageId, Order, OrderDetail, OrderDraft, OrderId,
    OrderItem, OrderItemId, OwnerId, Product, ProductDetail, ProductDraft, ProductFilter,
    ProductId, Size, SizeDraft, SizeId, Store, StoreDraft, StoreId,
};

use super::{CatalogStore, RepositoryError, category_details, order_details, product_details};
use crate::models::{Owner, OwnerCredentials};

/// Rows in insertion order; lists walk them backwards for newest first.
#[derive(Debug, Default)]
struct Tables {
    owners: Vec<OwnerCredentials>,
    stores: Vec<Store>,
    billboards: Vec<Billboard>,
    categories: Vec<Category>,
    sizes: Vec<Size>,
    colors: Vec<Color>,
    products: Vec<Product>,
    orders: Vec<Order>,
}

impl Tables {
    fn store_exists(&self, store: StoreId) -> Result<(), RepositoryError> {
        if self.stores.iter().any(|s| s.id == store) {
            Ok(())
        } else {
            Err(RepositoryError::Conflict(format!("store {store} does not exist")))
        }
    }

    fn products_in(&self, store: StoreId) -> Vec<Product> {
        self.products
            .iter()
            .filter(|p| p.store_id == store)
            .cloned()
            .collect()
    }

    fn product_details(
        &self,
        store: StoreId,
        products: Vec<Product>,
    ) -> Result<Vec<ProductDetail>, RepositoryError> {
        let categories = newest_first(&self.categories, |c| c.store_id == store);
        let sizes = newest_first(&self.sizes, |s| s.store_id == store);
        let colors = newest_first(&self.colors, |c| c.store_id == store);
        product_details(products, &categories, &sizes, &colors)
    }
}

fn newest_first<T: Clone>(rows: &[T], keep: impl Fn(&T) -> bool) -> Vec<T> {
    rows.iter().rev().filter(|row| keep(row)).cloned().collect()
}

fn still_referenced(what: &str) -> RepositoryError {
    RepositoryError::Conflict(format!("{what} is still referenced"))
}

/// Catalog storage held in memory behind a [`RwLock`].
#[derive(Debug, Default)]
pub struct MemoryCatalogStore {
    tables: RwLock<Tables>,
}

impl MemoryCatalogStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CatalogStore for MemoryCatalogStore {
    async fn ping(&self) -> Result<(), RepositoryError> {
        Ok(())
    }

    // =========================================================================
    // Owners
    // =========================================================================

    async fn create_owner(
        &self,
        email: &Email,
        name: &str,
        password_hash: &str,
    ) -> Result<Owner, RepositoryError> {
        let mut tables = self.tables.write().await;
        if tables.owners.iter().any(|c| &c.owner.email == email) {
            return Err(RepositoryError::Conflict(format!(
                "owner with email {email} already exists"
            )));
        }
        let now = Utc::now();
        let owner = Owner {
            id: OwnerId::generate(),
            email: email.clone(),
            name: name.to_owned(),
            created_at: now,
            updated_at: now,
        };
        tables.owners.push(OwnerCredentials {
            owner: owner.clone(),
            password_hash: password_hash.to_owned(),
        });
        Ok(owner)
    }

    async fn owner_by_email(
        &self,
        email: &Email,
    ) -> Result<Option<OwnerCredentials>, RepositoryError> {
        let tables = self.tables.read().await;
        Ok(tables
            .owners
            .iter()
            .find(|c| &c.owner.email == email)
            .cloned())
    }

    async fn owner_by_id(&self, id: OwnerId) -> Result<Option<Owner>, RepositoryError> {
        let tables = self.tables.read().await;
        Ok(tables
            .owners
            .iter()
            .find(|c| c.owner.id == id)
            .map(|c| c.owner.clone()))
    }

    // =========================================================================
    // Stores
    // =========================================================================

    async fn list_stores(&self, owner: OwnerId) -> Result<Vec<Store>, RepositoryError> {
        let tables = self.tables.read().await;
        Ok(tables
            .stores
            .iter()
            .filter(|s| s.owner_id == owner)
            .cloned()
            .collect())
    }

    async fn get_store(&self, id: StoreId) -> Result<Option<Store>, RepositoryError> {
        let tables = self.tables.read().await;
        Ok(tables.stores.iter().find(|s| s.id == id).cloned())
    }

    async fn create_store(
        &self,
        owner: OwnerId,
        draft: &StoreDraft,
    ) -> Result<Store, RepositoryError> {
        let mut tables = self.tables.write().await;
        if !tables.owners.iter().any(|c| c.owner.id == owner) {
            return Err(RepositoryError::Conflict(format!(
                "owner {owner} does not exist"
            )));
        }
        let now = Utc::now();
        let store = Store {
            id: StoreId::generate(),
            name: draft.name.as_str().to_owned(),
            owner_id: owner,
            created_at: now,
            updated_at: now,
        };
        tables.stores.push(store.clone());
        Ok(store)
    }

    async fn update_store(
        &self,
        id: StoreId,
        draft: &StoreDraft,
    ) -> Result<Store, RepositoryError> {
        let mut tables = self.tables.write().await;
        let store = tables
            .stores
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or(RepositoryError::NotFound)?;
        draft.name.as_str().clone_into(&mut store.name);
        store.updated_at = Utc::now();
        Ok(store.clone())
    }

    async fn delete_store(&self, id: StoreId) -> Result<Store, RepositoryError> {
        let mut tables = self.tables.write().await;
        let index = tables
            .stores
            .iter()
            .position(|s| s.id == id)
            .ok_or(RepositoryError::NotFound)?;
        let in_use = tables.billboards.iter().any(|r| r.store_id == id)
            || tables.categories.iter().any(|r| r.store_id == id)
            || tables.sizes.iter().any(|r| r.store_id == id)
            || tables.colors.iter().any(|r| r.store_id == id)
            || tables.products.iter().any(|r| r.store_id == id)
            || tables.orders.iter().any(|r| r.store_id == id);
        if in_use {
            return Err(still_referenced("store"));
        }
        Ok(tables.stores.remove(index))
    }

    // =========================================================================
    // Billboards
    // =========================================================================

    async fn list_billboards(&self, store: StoreId) -> Result<Vec<Billboard>, RepositoryError> {
        let tables = self.tables.read().await;
        Ok(newest_first(&tables.billboards, |b| b.store_id == store))
    }

    async fn get_billboard(
        &self,
        store: StoreId,
        id: BillboardId,
    ) -> Result<Option<Billboard>, RepositoryError> {
        let tables = self.tables.read().await;
        Ok(tables
            .billboards
            .iter()
            .find(|b| b.store_id == store && b.id == id)
            .cloned())
    }

    async fn create_billboard(
        &self,
        store: StoreId,
        draft: &BillboardDraft,
    ) -> Result<Billboard, RepositoryError> {
        let mut tables = self.tables.write().await;
        tables.store_exists(store)?;
        let now = Utc::now();
        let billboard = Billboard {
            id: BillboardId::generate(),
            store_id: store,
            label: draft.label.as_str().to_owned(),
            image_url: draft.image_url.as_str().to_owned(),
            created_at: now,
            updated_at: now,
        };
        tables.billboards.push(billboard.clone());
        Ok(billboard)
    }

    async fn update_billboard(
        &self,
        store: StoreId,
        id: BillboardId,
        draft: &BillboardDraft,
    ) -> Result<Billboard, RepositoryError> {
        let mut tables = self.tables.write().await;
        let billboard = tables
            .billboards
            .iter_mut()
            .find(|b| b.store_id == store && b.id == id)
            .ok_or(RepositoryError::NotFound)?;
        draft.label.as_str().clone_into(&mut billboard.label);
        draft.image_url.as_str().clone_into(&mut billboard.image_url);
        billboard.updated_at = Utc::now();
        Ok(billboard.clone())
    }

    async fn delete_billboard(
        &self,
        store: StoreId,
        id: BillboardId,
    ) -> Result<Billboard, RepositoryError> {
        let mut tables = self.tables.write().await;
        let index = tables
            .billboards
            .iter()
            .position(|b| b.store_id == store && b.id == id)
            .ok_or(RepositoryError::NotFound)?;
        if tables.categories.iter().any(|c| c.billboard_id == id) {
            return Err(still_referenced("billboard"));
        }
        Ok(tables.billboards.remove(index))
    }

    // =========================================================================
    // Categories
    // =========================================================================

    async fn list_categories(
        &self,
        store: StoreId,
    ) -> Result<Vec<CategoryDetail>, RepositoryError> {
        let tables = self.tables.read().await;
        let categories = newest_first(&tables.categories, |c| c.store_id == store);
        category_details(categories, &tables.billboards)
    }

    async fn get_category(
        &self,
        store: StoreId,
        id: CategoryId,
    ) -> Result<Option<CategoryDetail>, RepositoryError> {
        let tables = self.tables.read().await;
        let categories: Vec<Category> = tables
            .categories
            .iter()
            .filter(|c| c.store_id == store && c.id == id)
            .cloned()
            .collect();
        Ok(category_details(categories, &tables.billboards)?.pop())
    }

    async fn create_category(
        &self,
        store: StoreId,
        draft: &CategoryDraft,
    ) -> Result<Category, RepositoryError> {
        let mut tables = self.tables.write().await;
        tables.store_exists(store)?;
        if !tables.billboards.iter().any(|b| b.id == draft.billboard_id) {
            return Err(RepositoryError::Conflict("billboard does not exist".to_owned()));
        }
        let now = Utc::now();
        let category = Category {
            id: CategoryId::generate(),
            store_id: store,
            billboard_id: draft.billboard_id,
            name: draft.name.as_str().to_owned(),
            created_at: now,
            updated_at: now,
        };
        tables.categories.push(category.clone());
        Ok(category)
    }

    async fn update_category(
        &self,
        store: StoreId,
        id: CategoryId,
        draft: &CategoryDraft,
    ) -> Result<Category, RepositoryError> {
        let mut tables = self.tables.write().await;
        if !tables.billboards.iter().any(|b| b.id == draft.billboard_id) {
            return Err(RepositoryError::Conflict("billboard does not exist".to_owned()));
        }
        let category = tables
            .categories
            .iter_mut()
            .find(|c| c.store_id == store && c.id == id)
            .ok_or(RepositoryError::NotFound)?;
        draft.name.as_str().clone_into(&mut category.name);
        category.billboard_id = draft.billboard_id;
        category.updated_at = Utc::now();
        Ok(category.clone())
    }

    async fn delete_category(
        &self,
        store: StoreId,
        id: CategoryId,
    ) -> Result<Category, RepositoryError> {
        let mut tables = self.tables.write().await;
        let index = tables
            .categories
            .iter()
            .position(|c| c.store_id == store && c.id == id)
            .ok_or(RepositoryError::NotFound)?;
        if tables.products.iter().any(|p| p.category_id == id) {
            return Err(still_referenced("category"));
        }
        Ok(tables.categories.remove(index))
    }

    // =========================================================================
    // Sizes
    // =========================================================================

    async fn list_sizes(&self, store: StoreId) -> Result<Vec<Size>, RepositoryError> {
        let tables = self.tables.read().await;
        Ok(newest_first(&tables.sizes, |s| s.store_id == store))
    }

    async fn get_size(&self, store: StoreId, id: SizeId) -> Result<Option<Size>, RepositoryError> {
        let tables = self.tables.read().await;
        Ok(tables
            .sizes
            .iter()
            .find(|s| s.store_id == store && s.id == id)
            .cloned())
    }

    async fn create_size(
        &self,
        store: StoreId,
        draft: &SizeDraft,
    ) -> Result<Size, RepositoryError> {
        let mut tables = self.tables.write().await;
        tables.store_exists(store)?;
        let now = Utc::now();
        let size = Size {
            id: SizeId::generate(),
            store_id: store,
            name: draft.name.as_str().to_owned(),
            value: draft.value.as_str().to_owned(),
            created_at: now,
            updated_at: now,
        };
        tables.sizes.push(size.clone());
        Ok(size)
    }

    async fn update_size(
        &self,
        store: StoreId,
        id: SizeId,
        draft: &SizeDraft,
    ) -> Result<Size, RepositoryError> {
        let mut tables = self.tables.write().await;
        let size = tables
            .sizes
            .iter_mut()
            .find(|s| s.store_id == store && s.id == id)
            .ok_or(RepositoryError::NotFound)?;
        draft.name.as_str().clone_into(&mut size.name);
        draft.value.as_str().clone_into(&mut size.value);
        size.updated_at = Utc::now();
        Ok(size.clone())
    }

    async fn delete_size(&self, store: StoreId, id: SizeId) -> Result<Size, RepositoryError> {
        let mut tables = self.tables.write().await;
        let index = tables
            .sizes
            .iter()
            .position(|s| s.store_id == store && s.id == id)
            .ok_or(RepositoryError::NotFound)?;
        if tables.products.iter().any(|p| p.size_id == id) {
            return Err(still_referenced("size"));
        }
        Ok(tables.sizes.remove(index))
    }

    // =========================================================================
    // Colors
    // =========================================================================

    async fn list_colors(&self, store: StoreId) -> Result<Vec<Color>, RepositoryError> {
        let tables = self.tables.read().await;
        Ok(newest_first(&tables.colors, |c| c.store_id == store))
    }

    async fn get_color(
        &self,
        store: StoreId,
        id: ColorId,
    ) -> Result<Option<Color>, RepositoryError> {
        let tables = self.tables.read().await;
        Ok(tables
            .colors
            .iter()
            .find(|c| c.store_id == store && c.id == id)
            .cloned())
    }

    async fn create_color(
        &self,
        store: StoreId,
        draft: &ColorDraft,
    ) -> Result<Color, RepositoryError> {
        let mut tables = self.tables.write().await;
        tables.store_exists(store)?;
        let now = Utc::now();
        let color = Color {
            id: ColorId::generate(),
            store_id: store,
            name: draft.name.as_str().to_owned(),
            value: draft.value.as_str().to_owned(),
            created_at: now,
            updated_at: now,
        };
        tables.colors.push(color.clone());
        Ok(color)
    }

    async fn update_color(
        &self,
        store: StoreId,
        id: ColorId,
        draft: &ColorDraft,
    ) -> Result<Color, RepositoryError> {
        let mut tables = self.tables.write().await;
        let color = tables
            .colors
            .iter_mut()
            .find(|c| c.store_id == store && c.id == id)
            .ok_or(RepositoryError::NotFound)?;
        draft.name.as_str().clone_into(&mut color.name);
        draft.value.as_str().clone_into(&mut color.value);
        color.updated_at = Utc::now();
        Ok(color.clone())
    }

    async fn delete_color(&self, store: StoreId, id: ColorId) -> Result<Color, RepositoryError> {
        let mut tables = self.tables.write().await;
        let index = tables
            .colors
            .iter()
            .position(|c| c.store_id == store && c.id == id)
            .ok_or(RepositoryError::NotFound)?;
        if tables.products.iter().any(|p| p.color_id == id) {
            return Err(still_referenced("color"));
        }
        Ok(tables.colors.remove(index))
    }

    // =========================================================================
    // Products
    // =========================================================================

    async fn list_products(
        &self,
        store: StoreId,
        filter: &ProductFilter,
    ) -> Result<Vec<ProductDetail>, RepositoryError> {
        let tables = self.tables.read().await;
        let products = newest_first(&tables.products, |p| {
            p.store_id == store && filter.matches(p)
        });
        tables.product_details(store, products)
    }

    async fn get_product(
        &self,
        store: StoreId,
        id: ProductId,
    ) -> Result<Option<ProductDetail>, RepositoryError> {
        let tables = self.tables.read().await;
        let products: Vec<Product> = tables
            .products
            .iter()
            .filter(|p| p.store_id == store && p.id == id)
            .cloned()
            .collect();
        Ok(tables.product_details(store, products)?.pop())
    }

    async fn create_product(
        &self,
        store: StoreId,
        draft: &ProductDraft,
    ) -> Result<Product, RepositoryError> {
        let mut tables = self.tables.write().await;
        tables.store_exists(store)?;
        let now = Utc::now();
        let product = Product {
            id: ProductId::generate(),
            store_id: store,
            category_id: draft.category_id,
            size_id: draft.size_id,
            color_id: draft.color_id,
            name: draft.name.as_str().to_owned(),
            price: draft.price,
            is_featured: draft.is_featured,
            is_archived: draft.is_archived,
            images: images(draft),
            created_at: now,
            updated_at: now,
        };
        tables.products.push(product.clone());
        Ok(product)
    }

    async fn update_product(
        &self,
        store: StoreId,
        id: ProductId,
        draft: &ProductDraft,
    ) -> Result<Product, RepositoryError> {
        let mut tables = self.tables.write().await;
        let product = tables
            .products
            .iter_mut()
            .find(|p| p.store_id == store && p.id == id)
            .ok_or(RepositoryError::NotFound)?;
        product.category_id = draft.category_id;
        product.size_id = draft.size_id;
        product.color_id = draft.color_id;
        draft.name.as_str().clone_into(&mut product.name);
        product.price = draft.price;
        product.is_featured = draft.is_featured;
        product.is_archived = draft.is_archived;
        product.images = images(draft);
        product.updated_at = Utc::now();
        Ok(product.clone())
    }

    async fn delete_product(
        &self,
        store: StoreId,
        id: ProductId,
    ) -> Result<Product, RepositoryError> {
        let mut tables = self.tables.write().await;
        let index = tables
            .products
            .iter()
            .position(|p| p.store_id == store && p.id == id)
            .ok_or(RepositoryError::NotFound)?;
        let ordered = tables
            .orders
            .iter()
            .any(|o| o.items.iter().any(|item| item.product_id == id));
        if ordered {
            return Err(still_referenced("product"));
        }
        Ok(tables.products.remove(index))
    }

    // =========================================================================
    // Orders
    // =========================================================================

    async fn list_orders(&self, store: StoreId) -> Result<Vec<OrderDetail>, RepositoryError> {
        let tables = self.tables.read().await;
        let orders = newest_first(&tables.orders, |o| o.store_id == store);
        Ok(order_details(orders, &tables.products_in(store)))
    }

    async fn get_order(
        &self,
        store: StoreId,
        id: OrderId,
    ) -> Result<Option<OrderDetail>, RepositoryError> {
        let tables = self.tables.read().await;
        let orders: Vec<Order> = tables
            .orders
            .iter()
            .filter(|o| o.store_id == store && o.id == id)
            .cloned()
            .collect();
        Ok(order_details(orders, &tables.products_in(store)).pop())
    }

    async fn create_order(
        &self,
        store: StoreId,
        draft: &OrderDraft,
    ) -> Result<Order, RepositoryError> {
        let mut tables = self.tables.write().await;
        tables.store_exists(store)?;
        let now = Utc::now();
        let order = Order {
            id: OrderId::generate(),
            store_id: store,
            is_paid: draft.is_paid,
            phone: draft.phone.as_str().to_owned(),
            address: draft.address.as_str().to_owned(),
            items: items(draft),
            created_at: now,
            updated_at: now,
        };
        tables.orders.push(order.clone());
        Ok(order)
    }

    async fn update_order(
        &self,
        store: StoreId,
        id: OrderId,
        draft: &OrderDraft,
    ) -> Result<Order, RepositoryError> {
        let mut tables = self.tables.write().await;
        let order = tables
            .orders
            .iter_mut()
            .find(|o| o.store_id == store && o.id == id)
            .ok_or(RepositoryError::NotFound)?;
        order.is_paid = draft.is_paid;
        draft.phone.as_str().clone_into(&mut order.phone);
        draft.address.as_str().clone_into(&mut order.address);
        order.items = items(draft);
        order.updated_at = Utc::now();
        Ok(order.clone())
    }

    async fn delete_order(&self, store: StoreId, id: OrderId) -> Result<Order, RepositoryError> {
        let mut tables = self.tables.write().await;
        let index = tables
            .orders
            .iter()
            .position(|o| o.store_id == store && o.id == id)
            .ok_or(RepositoryError::NotFound)?;
        Ok(tables.orders.remove(index))
    }
}

fn images(draft: &ProductDraft) -> Vec<Image> {
    draft
        .image_urls
        .iter()
        .map(|url| Image {
            id: ImageId::generate(),
            url: url.as_str().to_owned(),
        })
        .collect()
}

fn items(draft: &OrderDraft) -> Vec<OrderItem> {
    draft
        .product_ids
        .iter()
        .map(|&product_id| OrderItem {
            id: OrderItemId::generate(),
            product_id,
        })
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use storeadmin_core::{
        BillboardInput, CategoryInput, ColorInput, FormSchema, ImageInput, OrderInput,
        ProductInput, SizeInput, StoreInput,
    };

    use super::*;

    async fn seeded() -> (MemoryCatalogStore, Store) {
        let db = MemoryCatalogStore::new();
        let owner = db
            .create_owner(&Email::parse("owner@example.com").unwrap(), "Owner", "hash")
            .await
            .unwrap();
        let store = db
            .create_store(
                owner.id,
                &StoreInput {
                    name: "Shop".to_owned(),
                }
                .validate()
                .unwrap(),
            )
            .await
            .unwrap();
        (db, store)
    }

    async fn billboard(db: &MemoryCatalogStore, store: StoreId) -> Billboard {
        let draft = BillboardInput {
            label: "Hero".to_owned(),
            image_url: "https://img/hero.png".to_owned(),
        }
        .validate()
        .unwrap();
        db.create_billboard(store, &draft).await.unwrap()
    }

    async fn product(db: &MemoryCatalogStore, store: StoreId) -> Product {
        let billboard = billboard(db, store).await;
        let category = db
            .create_category(
                store,
                &CategoryInput {
                    name: "Shirts".to_owned(),
                    billboard_id: billboard.id.to_string(),
                }
                .validate()
                .unwrap(),
            )
            .await
            .unwrap();
        let size = db
            .create_size(
                store,
                &SizeInput {
                    name: "Large".to_owned(),
                    value: "L".to_owned(),
                }
                .validate()
                .unwrap(),
            )
            .await
            .unwrap();
        let color = db
            .create_color(
                store,
                &ColorInput {
                    name: "Red".to_owned(),
                    value: "#FF0000".to_owned(),
                }
                .validate()
                .unwrap(),
            )
            .await
            .unwrap();
        let draft = ProductInput {
            name: "Tee".to_owned(),
            price: Some("20".to_owned()),
            category_id: category.id.to_string(),
            size_id: size.id.to_string(),
            color_id: color.id.to_string(),
            images: vec![ImageInput {
                url: "https://img/tee.png".to_owned(),
            }],
            ..ProductInput::default()
        }
        .validate()
        .unwrap();
        db.create_product(store, &draft).await.unwrap()
    }

    #[tokio::test]
    async fn test_duplicate_owner_email_conflicts() {
        let (db, _) = seeded().await;
        let err = db
            .create_owner(&Email::parse("OWNER@example.com").unwrap(), "Again", "hash")
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_lists_newest_first() {
        let (db, store) = seeded().await;
        let first = billboard(&db, store.id).await;
        let second = billboard(&db, store.id).await;
        let ids: Vec<_> = db
            .list_billboards(store.id)
            .await
            .unwrap()
            .into_iter()
            .map(|b| b.id)
            .collect();
        assert_eq!(ids, vec![second.id, first.id]);
    }

    #[tokio::test]
    async fn test_reads_are_scoped_to_store() {
        let (db, store) = seeded().await;
        let bb = billboard(&db, store.id).await;
        let other = StoreId::generate();
        assert!(db.get_billboard(other, bb.id).await.unwrap().is_none());
        let draft = BillboardInput {
            label: "x".to_owned(),
            image_url: "y".to_owned(),
        }
        .validate()
        .unwrap();
        assert!(matches!(
            db.update_billboard(other, bb.id, &draft).await,
            Err(RepositoryError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_delete_referenced_category_conflicts() {
        let (db, store) = seeded().await;
        let product = product(&db, store.id).await;
        let err = db
            .delete_category(store.id, product.category_id)
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::Conflict(_)));
        assert!(
            db.get_category(store.id, product.category_id)
                .await
                .unwrap()
                .is_some()
        );
        assert!(db.get_product(store.id, product.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_ordered_product_cannot_be_deleted_until_order_is() {
        let (db, store) = seeded().await;
        let product = product(&db, store.id).await;
        let order = db
            .create_order(
                store.id,
                &OrderInput {
                    phone: "555".to_owned(),
                    address: "1 Main".to_owned(),
                    product_ids: vec![product.id.to_string()],
                    is_paid: true,
                }
                .validate()
                .unwrap(),
            )
            .await
            .unwrap();

        assert!(matches!(
            db.delete_product(store.id, product.id).await,
            Err(RepositoryError::Conflict(_))
        ));
        let detail = db.get_order(store.id, order.id).await.unwrap().unwrap();
        assert_eq!(detail.products.len(), 1);
        assert_eq!(detail.total_price, product.price.amount());

        db.delete_order(store.id, order.id).await.unwrap();
        db.delete_product(store.id, product.id).await.unwrap();
    }

    #[tokio::test]
    async fn test_store_with_rows_cannot_be_deleted() {
        let (db, store) = seeded().await;
        let bb = billboard(&db, store.id).await;
        assert!(matches!(
            db.delete_store(store.id).await,
            Err(RepositoryError::Conflict(_))
        ));
        db.delete_billboard(store.id, bb.id).await.unwrap();
        db.delete_store(store.id).await.unwrap();
        assert!(db.get_store(store.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_product_list_hides_archived_unless_asked() {
        let (db, store) = seeded().await;
        let product = product(&db, store.id).await;
        let mut draft = ProductInput {
            name: product.name.clone(),
            price: Some("20".to_owned()),
            category_id: product.category_id.to_string(),
            size_id: product.size_id.to_string(),
            color_id: product.color_id.to_string(),
            images: vec![ImageInput {
                url: "https://img/tee.png".to_owned(),
            }],
            ..ProductInput::default()
        };
        draft.is_archived = true;
        db.update_product(store.id, product.id, &draft.validate().unwrap())
            .await
            .unwrap();

        let public = db
            .list_products(store.id, &ProductFilter::default())
            .await
            .unwrap();
        assert!(public.is_empty());

        let all = ProductFilter {
            include_archived: true,
            ..ProductFilter::default()
        };
        let listed = db.list_products(store.id, &all).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].size.value, "L");
    }
}
