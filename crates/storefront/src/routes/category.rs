//! Category page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::State;
use serde::Deserialize;
use tracing::instrument;

use storeadmin_core::{Billboard, CategoryId, ColorId, ProductFilter, SizeId};

use super::{NavLink, PagePath, PageQuery, ProductCard, navigation, product_cards};
use crate::error::Result;
use crate::filters;
use crate::state::AppState;

/// Size and color filters, as query parameters.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryQuery {
    pub size_id: Option<SizeId>,
    pub color_id: Option<ColorId>,
}

/// One toggle in the filter sidebar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterOption {
    pub label: String,
    pub href: String,
    pub active: bool,
    /// Hex color for color filters
    pub swatch: Option<String>,
}

#[derive(Template, WebTemplate)]
#[template(path = "category.html")]
pub struct CategoryTemplate {
    pub nav: Vec<NavLink>,
    pub name: String,
    pub billboard: Billboard,
    pub sizes: Vec<FilterOption>,
    pub colors: Vec<FilterOption>,
    pub filtered: bool,
    pub clear_href: String,
    pub products: Vec<ProductCard>,
}

/// GET /category/{category_id}?sizeId=&colorId=
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    PagePath(category_id): PagePath<CategoryId>,
    PageQuery(query): PageQuery<CategoryQuery>,
) -> Result<CategoryTemplate> {
    let catalog = state.catalog();
    let filter = ProductFilter {
        category_id: Some(category_id),
        size_id: query.size_id,
        color_id: query.color_id,
        ..Default::default()
    };

    let (detail, nav, sizes, colors, products) = tokio::try_join!(
        catalog.category(category_id),
        navigation(&state, Some(category_id)),
        catalog.sizes(),
        catalog.colors(),
        catalog.products(&filter),
    )?;

    let sizes = sizes
        .into_iter()
        .map(|size| {
            let active = query.size_id == Some(size.id);
            let next = (!active).then_some(size.id);
            FilterOption {
                label: size.name,
                href: filter_href(category_id, next, query.color_id),
                active,
                swatch: None,
            }
        })
        .collect();

    let colors = colors
        .into_iter()
        .map(|color| {
            let active = query.color_id == Some(color.id);
            let next = (!active).then_some(color.id);
            FilterOption {
                label: color.name,
                href: filter_href(category_id, query.size_id, next),
                active,
                swatch: Some(color.value),
            }
        })
        .collect();

    Ok(CategoryTemplate {
        nav,
        name: detail.category.name,
        billboard: detail.billboard,
        sizes,
        colors,
        filtered: query.size_id.is_some() || query.color_id.is_some(),
        clear_href: filter_href(category_id, None, None),
        products: product_cards(&products),
    })
}

/// Link to the category with the given filters applied.
fn filter_href(category_id: CategoryId, size_id: Option<SizeId>, color_id: Option<ColorId>) -> String {
    let mut params = Vec::new();
    if let Some(id) = size_id {
        params.push(format!("sizeId={id}"));
    }
    if let Some(id) = color_id {
        params.push(format!("colorId={id}"));
    }

    if params.is_empty() {
        format!("/category/{category_id}")
    } else {
        format!("/category/{category_id}?{}", params.join("&"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_href() {
        let category = CategoryId::generate();
        let size = SizeId::generate();
        let color = ColorId::generate();

        assert_eq!(filter_href(category, None, None), format!("/category/{category}"));
        assert_eq!(
            filter_href(category, Some(size), None),
            format!("/category/{category}?sizeId={size}")
        );
        assert_eq!(
            filter_href(category, Some(size), Some(color)),
            format!("/category/{category}?sizeId={size}&colorId={color}")
        );
    }
}
