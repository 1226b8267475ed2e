//! Storefront route handlers.
//!
//! Pages read the catalog through [`crate::api::CatalogClient`]. The category
//! navigation is loaded for every page.

mod category;
mod home;
mod product;

use axum::{
    Router,
    extract::{FromRequestParts, Path, Query, State},
    http::StatusCode,
    routing::get,
};

use storeadmin_core::{CategoryDetail, CategoryId, ProductDetail};

use crate::api::ApiError;
use crate::error::StorefrontError;
use crate::state::AppState;

/// Build the storefront router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
        .route("/", get(home::show))
        .route("/category/{category_id}", get(category::show))
        .route("/product/{product_id}", get(product::show))
        .fallback(not_found)
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Returns 503 Service Unavailable if the catalog API is not reachable.
async fn readiness(State(state): State<AppState>) -> StatusCode {
    match state.catalog().ping().await {
        Ok(()) => StatusCode::OK,
        Err(e) => {
            tracing::warn!(error = %e, "Catalog API not ready");
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}

async fn not_found() -> StorefrontError {
    StorefrontError::NotFound("page".to_string())
}

// =============================================================================
// Extractors
// =============================================================================

/// `Path` whose rejection renders the 404 page.
#[derive(Debug, FromRequestParts)]
#[from_request(via(Path), rejection(StorefrontError))]
pub struct PagePath<T>(pub T);

/// `Query` whose rejection renders the 404 page.
#[derive(Debug, FromRequestParts)]
#[from_request(via(Query), rejection(StorefrontError))]
pub struct PageQuery<T>(pub T);

// =============================================================================
// Shared view models
// =============================================================================

/// A category link in the navigation bar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavLink {
    pub href: String,
    pub label: String,
    pub active: bool,
}

/// Build the navigation bar, marking `active` as the current category.
fn nav_links(categories: &[CategoryDetail], active: Option<CategoryId>) -> Vec<NavLink> {
    categories
        .iter()
        .map(|detail| NavLink {
            href: format!("/category/{}", detail.category.id),
            label: detail.category.name.clone(),
            active: Some(detail.category.id) == active,
        })
        .collect()
}

/// Load the navigation bar for a page.
async fn navigation(state: &AppState, active: Option<CategoryId>) -> Result<Vec<NavLink>, ApiError> {
    let categories = state.catalog().categories().await?;
    Ok(nav_links(&categories, active))
}

/// A product tile in a grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductCard {
    pub href: String,
    pub name: String,
    pub category: String,
    pub price: String,
    pub image_url: Option<String>,
}

impl From<&ProductDetail> for ProductCard {
    fn from(detail: &ProductDetail) -> Self {
        Self {
            href: format!("/product/{}", detail.product.id),
            name: detail.product.name.clone(),
            category: detail.category.name.clone(),
            price: detail.product.price.display(),
            image_url: detail.product.images.first().map(|image| image.url.clone()),
        }
    }
}

fn product_cards<'a>(products: impl IntoIterator<Item = &'a ProductDetail>) -> Vec<ProductCard> {
    products.into_iter().map(ProductCard::from).collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) mod fixtures {
    use chrono::Utc;
    use rust_decimal::Decimal;

    use storeadmin_core::{
        Billboard, BillboardId, Category, CategoryDetail, CategoryId, Color, ColorId, Image,
        ImageId, Price, Product, ProductDetail, ProductId, Size, SizeId, StoreId,
    };

    pub fn billboard(store_id: StoreId) -> Billboard {
        Billboard {
            id: BillboardId::generate(),
            store_id,
            label: "Summer".to_string(),
            image_url: "https://img.test/summer.jpg".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    pub fn category(name: &str) -> CategoryDetail {
        let store_id = StoreId::generate();
        let billboard = billboard(store_id);
        CategoryDetail {
            category: Category {
                id: CategoryId::generate(),
                store_id,
                billboard_id: billboard.id,
                name: name.to_string(),
                created_at: Utc::now(),
                updated_at: Utc::now(),
            },
            billboard,
        }
    }

    pub fn product(category: &CategoryDetail, name: &str, cents: i64) -> ProductDetail {
        let store_id = category.category.store_id;
        let size = Size {
            id: SizeId::generate(),
            store_id,
            name: "Large".to_string(),
            value: "L".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let color = Color {
            id: ColorId::generate(),
            store_id,
            name: "Black".to_string(),
            value: "#000000".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        ProductDetail {
            product: Product {
                id: ProductId::generate(),
                store_id,
                category_id: category.category.id,
                size_id: size.id,
                color_id: color.id,
                name: name.to_string(),
                price: Price::new(Decimal::new(cents, 2)).unwrap(),
                is_featured: true,
                is_archived: false,
                images: vec![Image {
                    id: ImageId::generate(),
                    url: format!("https://img.test/{cents}.jpg"),
                }],
                created_at: Utc::now(),
                updated_at: Utc::now(),
            },
            category: category.category.clone(),
            size,
            color,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nav_marks_active_category() {
        let shirts = fixtures::category("Shirts");
        let hats = fixtures::category("Hats");
        let links = nav_links(&[shirts.clone(), hats], Some(shirts.category.id));

        assert_eq!(links.len(), 2);
        assert_eq!(links.first().map(|l| l.active), Some(true));
        assert_eq!(links.get(1).map(|l| l.active), Some(false));
        assert_eq!(
            links.first().map(|l| l.href.clone()),
            Some(format!("/category/{}", shirts.category.id))
        );
    }

    #[test]
    fn test_product_card() {
        let shirts = fixtures::category("Shirts");
        let tee = fixtures::product(&shirts, "Tee", 1250);
        let card = ProductCard::from(&tee);

        assert_eq!(card.href, format!("/product/{}", tee.product.id));
        assert_eq!(card.category, "Shirts");
        assert_eq!(card.price, "$12.50");
        assert_eq!(card.image_url.as_deref(), Some("https://img.test/1250.jpg"));
    }
}
