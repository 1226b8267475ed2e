//! Catalog and order entities as they appear on the wire.
//!
//! All attribute names are camelCase in JSON. The `*Detail` projections embed
//! the rows a foreign key points at, matching what list and detail views
//! need to render without a second round trip.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{
    BillboardId, CategoryId, ColorId, ImageId, OrderId, OrderItemId, OwnerId, Price, ProductId,
    SizeId, StoreId,
};

/// A tenant. Root of all catalog and order data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Store {
    pub id: StoreId,
    pub name: String,
    pub owner_id: OwnerId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Hero image with a caption, shown at the top of storefront pages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Billboard {
    pub id: BillboardId,
    pub store_id: StoreId,
    pub label: String,
    pub image_url: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: CategoryId,
    pub store_id: StoreId,
    pub billboard_id: BillboardId,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A category with its billboard embedded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryDetail {
    #[serde(flatten)]
    pub category: Category,
    pub billboard: Billboard,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Size {
    pub id: SizeId,
    pub store_id: StoreId,
    pub name: String,
    pub value: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Color {
    pub id: ColorId,
    pub store_id: StoreId,
    pub name: String,
    /// Hex code, e.g. `#ff0000`.
    pub value: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One gallery image. Order within [`Product::images`] is display order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Image {
    pub id: ImageId,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub store_id: StoreId,
    pub category_id: CategoryId,
    pub size_id: SizeId,
    pub color_id: ColorId,
    pub name: String,
    pub price: Price,
    pub is_featured: bool,
    pub is_archived: bool,
    pub images: Vec<Image>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A product with its category, size and color embedded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDetail {
    #[serde(flatten)]
    pub product: Product,
    pub category: Category,
    pub size: Size,
    pub color: Color,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub id: OrderItemId,
    pub product_id: ProductId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    pub store_id: StoreId,
    pub is_paid: bool,
    pub phone: String,
    pub address: String,
    pub items: Vec<OrderItem>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// An order with the ordered products resolved and the total computed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderDetail {
    #[serde(flatten)]
    pub order: Order,
    pub products: Vec<Product>,
    #[serde(with = "rust_decimal::serde::str")]
    pub total_price: Decimal,
}

impl OrderDetail {
    /// Resolve an order against the products it references.
    ///
    /// Items whose product is missing from `products` are skipped rather
    /// than failing the whole projection.
    #[must_use]
    pub fn assemble(order: Order, products: &[Product]) -> Self {
        let resolved: Vec<Product> = order
            .items
            .iter()
            .filter_map(|item| products.iter().find(|p| p.id == item.product_id).cloned())
            .collect();
        let total_price = resolved.iter().map(|p| p.price.amount()).sum();
        Self {
            order,
            products: resolved,
            total_price,
        }
    }
}

/// Optional filters for product listings.
///
/// Archived products are excluded unless `include_archived` is set, which
/// only the dashboard does; it cannot be set from a query string.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductFilter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_id: Option<CategoryId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size_id: Option<SizeId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color_id: Option<ColorId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_featured: Option<bool>,
    #[serde(skip)]
    pub include_archived: bool,
}

impl ProductFilter {
    /// Whether a product passes this filter.
    #[must_use]
    pub fn matches(&self, product: &Product) -> bool {
        (self.include_archived || !product.is_archived)
            && self.category_id.is_none_or(|id| id == product.category_id)
            && self.size_id.is_none_or(|id| id == product.size_id)
            && self.color_id.is_none_or(|id| id == product.color_id)
            && self.is_featured.is_none_or(|f| f == product.is_featured)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn product(price: &str) -> Product {
        Product {
            id: ProductId::generate(),
            store_id: StoreId::generate(),
            category_id: CategoryId::generate(),
            size_id: SizeId::generate(),
            color_id: ColorId::generate(),
            name: "Shirt".to_owned(),
            price: Price::parse(price).unwrap(),
            is_featured: false,
            is_archived: false,
            images: vec![],
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_product_serializes_camel_case() {
        let json = serde_json::to_value(product("12.50")).unwrap();
        assert_eq!(json["price"], "12.50");
        assert_eq!(json["isFeatured"], false);
        assert!(json.get("categoryId").is_some());
        assert!(json.get("category_id").is_none());
    }

    #[test]
    fn test_filter_excludes_archived() {
        let mut p = product("1");
        assert!(ProductFilter::default().matches(&p));
        p.is_archived = true;
        assert!(!ProductFilter::default().matches(&p));
        let all = ProductFilter {
            include_archived: true,
            ..ProductFilter::default()
        };
        assert!(all.matches(&p));
    }

    #[test]
    fn test_filter_ignores_include_archived_in_query() {
        let filter: ProductFilter =
            serde_json::from_str(r#"{"includeArchived":true,"isFeatured":true}"#).unwrap();
        assert!(!filter.include_archived);
        assert_eq!(filter.is_featured, Some(true));
    }

    #[test]
    fn test_filter_by_category_and_featured() {
        let mut p = product("1");
        let other = ProductFilter {
            category_id: Some(CategoryId::generate()),
            ..ProductFilter::default()
        };
        assert!(!other.matches(&p));

        let featured = ProductFilter {
            category_id: Some(p.category_id),
            is_featured: Some(true),
            ..ProductFilter::default()
        };
        assert!(!featured.matches(&p));
        p.is_featured = true;
        assert!(featured.matches(&p));
    }

    #[test]
    fn test_order_detail_totals_resolved_products() {
        let a = product("10.00");
        let b = product("2.50");
        let order = Order {
            id: OrderId::generate(),
            store_id: a.store_id,
            is_paid: true,
            phone: "555".to_owned(),
            address: "1 Main St".to_owned(),
            items: vec![
                OrderItem {
                    id: OrderItemId::generate(),
                    product_id: a.id,
                },
                OrderItem {
                    id: OrderItemId::generate(),
                    product_id: b.id,
                },
                OrderItem {
                    id: OrderItemId::generate(),
                    product_id: ProductId::generate(),
                },
            ],
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let detail = OrderDetail::assemble(order, &[a, b]);
        assert_eq!(detail.products.len(), 2);
        assert_eq!(detail.total_price, Decimal::new(1250, 2));

        let json = serde_json::to_value(&detail).unwrap();
        assert_eq!(json["totalPrice"], "12.50");
        assert_eq!(json["isPaid"], true);
    }
}
