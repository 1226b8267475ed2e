//! Home page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::State;
use tracing::instrument;

use storeadmin_core::{Billboard, ProductFilter};

use super::{NavLink, ProductCard, navigation, product_cards};
use crate::api::ApiError;
use crate::error::StorefrontError;
use crate::filters;
use crate::state::AppState;

/// Home page: the configured billboard and featured products.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub nav: Vec<NavLink>,
    pub billboard: Option<Billboard>,
    pub products: Vec<ProductCard>,
}

/// GET /
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>) -> Result<HomeTemplate, StorefrontError> {
    let featured = ProductFilter {
        is_featured: Some(true),
        ..Default::default()
    };

    let (nav, billboard, products) = tokio::try_join!(
        navigation(&state, None),
        home_billboard(&state),
        state.catalog().products(&featured),
    )?;

    Ok(HomeTemplate {
        nav,
        billboard,
        products: product_cards(&products),
    })
}

/// The configured home billboard. A deleted billboard hides the hero.
async fn home_billboard(state: &AppState) -> Result<Option<Billboard>, ApiError> {
    let Some(id) = state.config().home_billboard_id else {
        return Ok(None);
    };

    match state.catalog().billboard(id).await {
        Ok(billboard) => Ok(Some(billboard)),
        Err(e) if e.is_not_found() => {
            tracing::warn!(billboard_id = %id, "Configured home billboard not found");
            Ok(None)
        }
        Err(e) => Err(e),
    }
}
