//! Product detail route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::State;
use tracing::instrument;

use storeadmin_core::{Color, Image, ProductDetail, ProductFilter, ProductId, Size};

use super::{NavLink, PagePath, ProductCard, navigation};
use crate::error::{Result, StorefrontError};
use crate::filters;
use crate::state::AppState;

const RELATED_LIMIT: usize = 4;

#[derive(Template, WebTemplate)]
#[template(path = "product.html")]
pub struct ProductTemplate {
    pub nav: Vec<NavLink>,
    pub name: String,
    pub price: String,
    pub category_name: String,
    pub category_href: String,
    pub size: Size,
    pub color: Color,
    pub images: Vec<Image>,
    /// Related products from the same category
    pub products: Vec<ProductCard>,
}

/// GET /product/{product_id}
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    PagePath(product_id): PagePath<ProductId>,
) -> Result<ProductTemplate> {
    let detail = state.catalog().product(product_id).await?;
    if detail.product.is_archived {
        return Err(StorefrontError::NotFound(format!("product {product_id}")));
    }
    let category_id = detail.category.id;

    let same_category = ProductFilter {
        category_id: Some(category_id),
        ..Default::default()
    };
    let (nav, siblings) = tokio::try_join!(
        navigation(&state, Some(category_id)),
        state.catalog().products(&same_category),
    )?;

    let related = related_cards(product_id, &siblings);
    let ProductDetail {
        product,
        category,
        size,
        color,
    } = detail;

    Ok(ProductTemplate {
        nav,
        price: product.price.display(),
        name: product.name,
        category_href: format!("/category/{}", category.id),
        category_name: category.name,
        size,
        color,
        images: product.images,
        products: related,
    })
}

/// Other products from the same category.
fn related_cards(product_id: ProductId, siblings: &[ProductDetail]) -> Vec<ProductCard> {
    siblings
        .iter()
        .filter(|detail| detail.product.id != product_id)
        .take(RELATED_LIMIT)
        .map(ProductCard::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::super::fixtures;
    use super::*;

    #[test]
    fn test_related_excludes_current_and_caps() {
        let shirts = fixtures::category("Shirts");
        let products: Vec<_> = (1..=6)
            .map(|n| fixtures::product(&shirts, &format!("Tee {n}"), n * 100))
            .collect();
        let current = products.first().map(|p| p.product.id).unwrap_or_else(ProductId::generate);

        let related = related_cards(current, &products);
        assert_eq!(related.len(), RELATED_LIMIT);
        assert!(related.iter().all(|card| card.href != format!("/product/{current}")));
    }
}
