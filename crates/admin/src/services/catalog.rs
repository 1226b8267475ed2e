//! Catalog service.
//!
//! One pipeline for every store-scoped write:
//!
//! 1. ownership guard ([`authorize`])
//! 2. field validation ([`FormSchema::validate`])
//! 3. same-store reference checks ([`ResourceKind::check_references`])
//! 4. persistence
//!
//! A request that fails at any step leaves the catalog untouched. Reads
//! are public and skip the guard.

use chrono::Datelike;
use rust_decimal::Decimal;
use serde::Serialize;
use thiserror::Error;
use tracing::instrument;

use storeadmin_core::{
    FieldError, FormSchema, OwnerId, ProductFilter, RequestFailure, Resource, Store, StoreId,
    StoreInput,
};

use super::ownership::authorize;
use super::resources::{Orders, Products, ResourceKind};
use crate::db::{CatalogStore, RepositoryError};

/// Errors from the catalog service.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("not signed in")]
    Unauthenticated,

    #[error("store is not owned by the caller")]
    Forbidden,

    #[error("{0}")]
    Invalid(FieldError),

    #[error("{} not found", .0.singular())]
    NotFound(Resource),

    #[error("{0}")]
    Conflict(String),

    #[error("repository error: {0}")]
    Repository(#[from] RepositoryError),
}

impl CatalogError {
    /// Map a repository failure on a row of `resource`.
    ///
    /// `Conflict` on a delete means dependents still point at the row.
    fn on_delete(resource: Resource, err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound => Self::NotFound(resource),
            RepositoryError::Conflict(_) => Self::Conflict(resource.still_referenced_message()),
            other => Self::Repository(other),
        }
    }

    /// `Conflict` on a write means a referenced row vanished mid-request.
    fn on_write(resource: Resource, err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound => Self::NotFound(resource),
            RepositoryError::Conflict(detail) => Self::Conflict(detail),
            other => Self::Repository(other),
        }
    }

    /// How a form should report this failure.
    #[must_use]
    pub fn to_failure(&self) -> RequestFailure {
        match self {
            Self::Unauthenticated => RequestFailure::Unauthenticated,
            Self::Forbidden => RequestFailure::Forbidden,
            Self::Invalid(field) => RequestFailure::Invalid(field.clone()),
            Self::NotFound(_) => RequestFailure::NotFound,
            Self::Conflict(_) => RequestFailure::Conflict,
            Self::Repository(_) => RequestFailure::Internal,
        }
    }
}

/// Revenue of paid orders in one calendar month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthlyRevenue {
    pub month: &'static str,
    #[serde(with = "rust_decimal::serde::str")]
    pub total: Decimal,
}

const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Headline numbers for a store's dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreOverview {
    pub store: Store,
    #[serde(with = "rust_decimal::serde::str")]
    pub total_revenue: Decimal,
    pub sales_count: usize,
    pub stock_count: usize,
    pub monthly_revenue: Vec<MonthlyRevenue>,
}

/// Store and catalog operations on behalf of a principal.
pub struct CatalogService<'a> {
    db: &'a dyn CatalogStore,
}

impl<'a> CatalogService<'a> {
    #[must_use]
    pub const fn new(db: &'a dyn CatalogStore) -> Self {
        Self { db }
    }

    // =========================================================================
    // Store-scoped resources
    // =========================================================================

    /// List a store's rows of kind `K`, newest first.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Repository` if the backend fails.
    #[instrument(skip(self, filter), fields(resource = %K::resource().path()))]
    pub async fn list<K: ResourceKind>(
        &self,
        store_id: StoreId,
        filter: &K::Filter,
    ) -> Result<Vec<K::View>, CatalogError> {
        Ok(K::list(self.db, store_id, filter).await?)
    }

    /// Get one row of kind `K` from a store.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::NotFound` if the store has no such row.
    #[instrument(skip(self), fields(resource = %K::resource().path()))]
    pub async fn get<K: ResourceKind>(
        &self,
        store_id: StoreId,
        id: K::Id,
    ) -> Result<K::View, CatalogError> {
        K::get(self.db, store_id, id)
            .await?
            .ok_or(CatalogError::NotFound(K::resource()))
    }

    /// Create a row of kind `K` in a store the principal owns.
    ///
    /// # Errors
    ///
    /// Returns `Unauthenticated`/`Forbidden` from the guard, `Invalid` for a
    /// bad field or a reference into another store.
    #[instrument(skip(self, input), fields(resource = %K::resource().path()))]
    pub async fn create<K: ResourceKind>(
        &self,
        principal: Option<OwnerId>,
        store_id: StoreId,
        input: &K::Input,
    ) -> Result<K::Row, CatalogError> {
        authorize(self.db, principal, store_id).await?;
        let draft = input.validate().map_err(CatalogError::Invalid)?;
        K::check_references(self.db, store_id, &draft).await?;

        let row = K::insert(self.db, store_id, &draft)
            .await
            .map_err(|e| CatalogError::on_write(K::resource(), e))?;

        tracing::info!(%store_id, id = %K::row_id(&row), "row created");
        Ok(row)
    }

    /// Replace the fields of `(store_id, id)`.
    ///
    /// # Errors
    ///
    /// As [`Self::create`], plus `NotFound` if the store has no such row.
    #[instrument(skip(self, input), fields(resource = %K::resource().path()))]
    pub async fn update<K: ResourceKind>(
        &self,
        principal: Option<OwnerId>,
        store_id: StoreId,
        id: K::Id,
        input: &K::Input,
    ) -> Result<K::Row, CatalogError> {
        authorize(self.db, principal, store_id).await?;
        let draft = input.validate().map_err(CatalogError::Invalid)?;
        K::check_references(self.db, store_id, &draft).await?;

        let row = K::update(self.db, store_id, id, &draft)
            .await
            .map_err(|e| CatalogError::on_write(K::resource(), e))?;

        tracing::info!(%store_id, %id, "row updated");
        Ok(row)
    }

    /// Delete `(store_id, id)` and return the removed row.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the store has no such row and `Conflict` if
    /// other rows still reference it.
    #[instrument(skip(self), fields(resource = %K::resource().path()))]
    pub async fn delete<K: ResourceKind>(
        &self,
        principal: Option<OwnerId>,
        store_id: StoreId,
        id: K::Id,
    ) -> Result<K::Row, CatalogError> {
        authorize(self.db, principal, store_id).await?;

        let row = K::remove(self.db, store_id, id)
            .await
            .map_err(|e| CatalogError::on_delete(K::resource(), e))?;

        tracing::info!(%store_id, %id, "row deleted");
        Ok(row)
    }

    // =========================================================================
    // Stores
    // =========================================================================

    /// The principal's stores, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `Unauthenticated` without a principal.
    pub async fn list_stores(&self, principal: Option<OwnerId>) -> Result<Vec<Store>, CatalogError> {
        let owner = principal.ok_or(CatalogError::Unauthenticated)?;
        Ok(self.db.list_stores(owner).await?)
    }

    /// A store the principal owns.
    ///
    /// # Errors
    ///
    /// See [`authorize`].
    pub async fn get_store(
        &self,
        principal: Option<OwnerId>,
        store_id: StoreId,
    ) -> Result<Store, CatalogError> {
        authorize(self.db, principal, store_id).await
    }

    /// Create a store owned by the principal.
    ///
    /// # Errors
    ///
    /// Returns `Unauthenticated` without a principal, `Invalid` for a bad name.
    #[instrument(skip(self, input))]
    pub async fn create_store(
        &self,
        principal: Option<OwnerId>,
        input: &StoreInput,
    ) -> Result<Store, CatalogError> {
        let owner = principal.ok_or(CatalogError::Unauthenticated)?;
        let draft = input.validate().map_err(CatalogError::Invalid)?;
        let store = self
            .db
            .create_store(owner, &draft)
            .await
            .map_err(|e| CatalogError::on_write(Resource::Store, e))?;

        tracing::info!(store_id = %store.id, %owner, "store created");
        Ok(store)
    }

    /// Rename a store.
    ///
    /// # Errors
    ///
    /// See [`authorize`]; `Invalid` for a bad name.
    #[instrument(skip(self, input))]
    pub async fn update_store(
        &self,
        principal: Option<OwnerId>,
        store_id: StoreId,
        input: &StoreInput,
    ) -> Result<Store, CatalogError> {
        authorize(self.db, principal, store_id).await?;
        let draft = input.validate().map_err(CatalogError::Invalid)?;
        let store = self
            .db
            .update_store(store_id, &draft)
            .await
            .map_err(|e| CatalogError::on_write(Resource::Store, e))?;

        tracing::info!(%store_id, "store renamed");
        Ok(store)
    }

    /// Delete an empty store.
    ///
    /// # Errors
    ///
    /// Returns `Conflict` while the store still holds any rows.
    #[instrument(skip(self))]
    pub async fn delete_store(
        &self,
        principal: Option<OwnerId>,
        store_id: StoreId,
    ) -> Result<Store, CatalogError> {
        authorize(self.db, principal, store_id).await?;
        let store = self
            .db
            .delete_store(store_id)
            .await
            .map_err(|e| CatalogError::on_delete(Resource::Store, e))?;

        tracing::info!(%store_id, "store deleted");
        Ok(store)
    }

    /// Revenue, sales and stock for a store the principal owns.
    ///
    /// Monthly buckets cover paid orders of every year, keyed by calendar
    /// month.
    ///
    /// # Errors
    ///
    /// See [`authorize`].
    #[instrument(skip(self))]
    pub async fn overview(
        &self,
        principal: Option<OwnerId>,
        store_id: StoreId,
    ) -> Result<StoreOverview, CatalogError> {
        let store = authorize(self.db, principal, store_id).await?;
        let orders = Orders::list(self.db, store_id, &Default::default()).await?;
        let stock = Products::list(self.db, store_id, &ProductFilter::default()).await?;

        let mut monthly = [Decimal::ZERO; 12];
        let mut total_revenue = Decimal::ZERO;
        let mut sales_count = 0;
        for order in orders.iter().filter(|o| o.order.is_paid) {
            total_revenue += order.total_price;
            sales_count += 1;
            if let Some(bucket) = monthly.get_mut(order.order.created_at.month0() as usize) {
                *bucket += order.total_price;
            }
        }

        Ok(StoreOverview {
            store,
            total_revenue,
            sales_count,
            stock_count: stock.len(),
            monthly_revenue: MONTHS
                .iter()
                .zip(monthly)
                .map(|(&month, total)| MonthlyRevenue { month, total })
                .collect(),
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use storeadmin_core::{
        BillboardInput, CategoryInput, ColorInput, Email, ImageInput, OrderInput, ProductFilter,
        ProductInput, SizeInput,
    };

    use super::*;
    use crate::db::MemoryCatalogStore;
    use crate::services::resources::{Billboards, Categories, Colors, NoFilter, Sizes};

    struct Fixture {
        db: MemoryCatalogStore,
        alice: OwnerId,
        bob: OwnerId,
        shop: StoreId,
        other: StoreId,
    }

    async fn fixture() -> Fixture {
        let db = MemoryCatalogStore::new();
        let alice = db
            .create_owner(&Email::parse("alice@example.com").unwrap(), "Alice", "x")
            .await
            .unwrap()
            .id;
        let bob = db
            .create_owner(&Email::parse("bob@example.com").unwrap(), "Bob", "x")
            .await
            .unwrap()
            .id;
        let service = CatalogService::new(&db);
        let shop = service
            .create_store(Some(alice), &StoreInput { name: "Shop".into() })
            .await
            .unwrap()
            .id;
        let other = service
            .create_store(Some(bob), &StoreInput { name: "Other".into() })
            .await
            .unwrap()
            .id;
        Fixture {
            db,
            alice,
            bob,
            shop,
            other,
        }
    }

    fn billboard() -> BillboardInput {
        BillboardInput {
            label: "Summer".into(),
            image_url: "https://img.example.com/summer.jpg".into(),
        }
    }

    /// Billboard, category, size and color in `store`, ready for a product.
    async fn product_input(
        service: &CatalogService<'_>,
        owner: OwnerId,
        store: StoreId,
        price: &str,
    ) -> ProductInput {
        let billboard = service
            .create::<Billboards>(Some(owner), store, &billboard())
            .await
            .unwrap();
        let category = service
            .create::<Categories>(
                Some(owner),
                store,
                &CategoryInput {
                    name: "Shirts".into(),
                    billboard_id: billboard.id.to_string(),
                },
            )
            .await
            .unwrap();
        let size = service
            .create::<Sizes>(
                Some(owner),
                store,
                &SizeInput {
                    name: "Large".into(),
                    value: "L".into(),
                },
            )
            .await
            .unwrap();
        let color = service
            .create::<Colors>(
                Some(owner),
                store,
                &ColorInput {
                    name: "Red".into(),
                    value: "#ff0000".into(),
                },
            )
            .await
            .unwrap();
        ProductInput {
            name: "Tee".into(),
            price: Some(price.into()),
            category_id: category.id.to_string(),
            size_id: size.id.to_string(),
            color_id: color.id.to_string(),
            images: vec![ImageInput {
                url: "https://img.example.com/tee.jpg".into(),
            }],
            ..ProductInput::default()
        }
    }

    #[tokio::test]
    async fn test_create_in_foreign_store_is_forbidden_and_writes_nothing() {
        let f = fixture().await;
        let service = CatalogService::new(&f.db);

        let err = service
            .create::<Billboards>(Some(f.alice), f.other, &billboard())
            .await
            .unwrap_err();
        assert!(matches!(err, CatalogError::Forbidden));

        let rows = service.list::<Billboards>(f.other, &NoFilter {}).await.unwrap();
        assert!(rows.is_empty());
    }

    #[tokio::test]
    async fn test_missing_field_is_invalid_and_writes_nothing() {
        let f = fixture().await;
        let service = CatalogService::new(&f.db);

        let input = BillboardInput {
            label: "  ".into(),
            ..billboard()
        };
        let err = service
            .create::<Billboards>(Some(f.alice), f.shop, &input)
            .await
            .unwrap_err();
        match err {
            CatalogError::Invalid(field) => assert_eq!(field.field, "label"),
            other => panic!("expected Invalid, got {other:?}"),
        }
        assert!(service.list::<Billboards>(f.shop, &NoFilter {}).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_price_must_be_positive() {
        let f = fixture().await;
        let service = CatalogService::new(&f.db);

        for price in ["-5", "0"] {
            let input = product_input(&service, f.alice, f.shop, price).await;
            let err = service
                .create::<Products>(Some(f.alice), f.shop, &input)
                .await
                .unwrap_err();
            match err {
                CatalogError::Invalid(field) => assert_eq!(field.field, "price"),
                other => panic!("expected Invalid, got {other:?}"),
            }
        }
    }

    #[tokio::test]
    async fn test_referenced_category_delete_conflicts_and_keeps_rows() {
        let f = fixture().await;
        let service = CatalogService::new(&f.db);
        let input = product_input(&service, f.alice, f.shop, "12.50").await;
        let product = service
            .create::<Products>(Some(f.alice), f.shop, &input)
            .await
            .unwrap();

        let err = service
            .delete::<Categories>(Some(f.alice), f.shop, product.category_id)
            .await
            .unwrap_err();
        match err {
            CatalogError::Conflict(message) => assert_eq!(
                message,
                "Make sure you removed all products using this category first."
            ),
            other => panic!("expected Conflict, got {other:?}"),
        }

        service
            .get::<Categories>(f.shop, product.category_id)
            .await
            .unwrap();
        service.get::<Products>(f.shop, product.id).await.unwrap();
    }

    #[tokio::test]
    async fn test_repeated_update_is_idempotent() {
        let f = fixture().await;
        let service = CatalogService::new(&f.db);
        let size = service
            .create::<Sizes>(
                Some(f.alice),
                f.shop,
                &SizeInput {
                    name: "Small".into(),
                    value: "S".into(),
                },
            )
            .await
            .unwrap();
        let input = SizeInput {
            name: "Medium".into(),
            value: "M".into(),
        };

        let first = service
            .update::<Sizes>(Some(f.alice), f.shop, size.id, &input)
            .await
            .unwrap();
        let second = service
            .update::<Sizes>(Some(f.alice), f.shop, size.id, &input)
            .await
            .unwrap();
        assert_eq!(
            (first.name.as_str(), first.value.as_str()),
            (second.name.as_str(), second.value.as_str())
        );
        assert_eq!(first.id, second.id);
        assert_eq!(service.list::<Sizes>(f.shop, &NoFilter {}).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_update_in_other_store_is_not_found() {
        let f = fixture().await;
        let service = CatalogService::new(&f.db);
        let bobs = service
            .create::<Billboards>(Some(f.bob), f.other, &billboard())
            .await
            .unwrap();

        let err = service
            .update::<Billboards>(Some(f.alice), f.shop, bobs.id, &billboard())
            .await
            .unwrap_err();
        assert!(matches!(err, CatalogError::NotFound(Resource::Billboard)));
    }

    #[tokio::test]
    async fn test_category_with_foreign_billboard_is_invalid() {
        let f = fixture().await;
        let service = CatalogService::new(&f.db);
        let bobs = service
            .create::<Billboards>(Some(f.bob), f.other, &billboard())
            .await
            .unwrap();

        let err = service
            .create::<Categories>(
                Some(f.alice),
                f.shop,
                &CategoryInput {
                    name: "Shirts".into(),
                    billboard_id: bobs.id.to_string(),
                },
            )
            .await
            .unwrap_err();
        match err {
            CatalogError::Invalid(field) => assert_eq!(field.field, "billboardId"),
            other => panic!("expected Invalid, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_order_with_foreign_product_is_invalid() {
        let f = fixture().await;
        let service = CatalogService::new(&f.db);
        let input = product_input(&service, f.bob, f.other, "3.00").await;
        let bobs = service
            .create::<Products>(Some(f.bob), f.other, &input)
            .await
            .unwrap();

        let err = service
            .create::<Orders>(
                Some(f.alice),
                f.shop,
                &OrderInput {
                    phone: "555-0100".into(),
                    address: "1 Main St".into(),
                    product_ids: vec![bobs.id.to_string()],
                    is_paid: false,
                },
            )
            .await
            .unwrap_err();
        match err {
            CatalogError::Invalid(field) => assert_eq!(field.field, "productIds"),
            other => panic!("expected Invalid, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_price_beyond_column_is_invalid() {
        let f = fixture().await;
        let service = CatalogService::new(&f.db);
        let input = product_input(&service, f.alice, f.shop, "10000000000").await;

        let err = service
            .create::<Products>(Some(f.alice), f.shop, &input)
            .await
            .unwrap_err();
        match err {
            CatalogError::Invalid(field) => {
                assert_eq!(field.field, "price");
                assert_eq!(field.message, "Price must be at most 9999999999.99");
            }
            other => panic!("expected Invalid, got {other:?}"),
        }
        let products = service
            .list::<Products>(f.shop, &ProductFilter::default())
            .await
            .unwrap();
        assert!(products.is_empty());
    }

    #[tokio::test]
    async fn test_product_with_foreign_references_is_invalid() {
        let f = fixture().await;
        let service = CatalogService::new(&f.db);
        let mine = product_input(&service, f.alice, f.shop, "12.50").await;
        let bobs = product_input(&service, f.bob, f.other, "12.50").await;

        let cases = [
            (
                "categoryId",
                ProductInput {
                    category_id: bobs.category_id.clone(),
                    ..mine.clone()
                },
            ),
            (
                "sizeId",
                ProductInput {
                    size_id: bobs.size_id.clone(),
                    ..mine.clone()
                },
            ),
            (
                "colorId",
                ProductInput {
                    color_id: bobs.color_id.clone(),
                    ..mine.clone()
                },
            ),
        ];

        for (expected, input) in cases {
            let err = service
                .create::<Products>(Some(f.alice), f.shop, &input)
                .await
                .unwrap_err();
            match err {
                CatalogError::Invalid(field) => assert_eq!(field.field, expected),
                other => panic!("expected Invalid on {expected}, got {other:?}"),
            }
        }

        for store in [f.shop, f.other] {
            let products = service
                .list::<Products>(store, &ProductFilter::default())
                .await
                .unwrap();
            assert!(products.is_empty());
        }
    }

    #[tokio::test]
    async fn test_store_with_rows_cannot_be_deleted() {
        let f = fixture().await;
        let service = CatalogService::new(&f.db);
        service
            .create::<Billboards>(Some(f.alice), f.shop, &billboard())
            .await
            .unwrap();

        let err = service.delete_store(Some(f.alice), f.shop).await.unwrap_err();
        assert!(matches!(err, CatalogError::Conflict(_)));

        let err = service.delete_store(Some(f.bob), f.shop).await.unwrap_err();
        assert!(matches!(err, CatalogError::Forbidden));
    }

    #[tokio::test]
    async fn test_overview_counts_paid_orders_and_stock() {
        let f = fixture().await;
        let service = CatalogService::new(&f.db);
        let input = product_input(&service, f.alice, f.shop, "12.50").await;
        let tee = service
            .create::<Products>(Some(f.alice), f.shop, &input)
            .await
            .unwrap();
        let archived = ProductInput {
            is_archived: true,
            ..input
        };
        service
            .create::<Products>(Some(f.alice), f.shop, &archived)
            .await
            .unwrap();

        for is_paid in [true, true, false] {
            service
                .create::<Orders>(
                    Some(f.alice),
                    f.shop,
                    &OrderInput {
                        phone: "555-0100".into(),
                        address: "1 Main St".into(),
                        product_ids: vec![tee.id.to_string()],
                        is_paid,
                    },
                )
                .await
                .unwrap();
        }

        let overview = service.overview(Some(f.alice), f.shop).await.unwrap();
        assert_eq!(overview.total_revenue, Decimal::new(2500, 2));
        assert_eq!(overview.sales_count, 2);
        assert_eq!(overview.stock_count, 1);
        assert_eq!(overview.monthly_revenue.len(), 12);
        let bucketed: Decimal = overview.monthly_revenue.iter().map(|m| m.total).sum();
        assert_eq!(bucketed, Decimal::new(2500, 2));
    }

    #[test]
    fn test_failure_mapping() {
        assert_eq!(
            CatalogError::Forbidden.to_failure(),
            RequestFailure::Forbidden
        );
        assert_eq!(
            CatalogError::Conflict("x".into()).to_failure(),
            RequestFailure::Conflict
        );
        assert_eq!(
            CatalogError::Repository(RepositoryError::NotFound).to_failure(),
            RequestFailure::Internal
        );
    }
}
