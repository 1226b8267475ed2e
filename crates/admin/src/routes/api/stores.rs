//! Store endpoints. Every one of them needs a signed-in owner.

use axum::{
    Json, Router,
    extract::State,
    routing::{get, patch},
};
use tracing::instrument;

use storeadmin_core::{Store, StoreId, StoreInput};

use crate::error::{ApiJson, ApiPath, AppError};
use crate::middleware::OptionalOwner;
use crate::services::authorize;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/stores", get(list).post(create))
        .route("/stores/{store_id}", patch(update).delete(destroy))
}

/// GET /api/stores
#[instrument(skip_all)]
async fn list(
    State(state): State<AppState>,
    owner: OptionalOwner,
) -> Result<Json<Vec<Store>>, AppError> {
    Ok(Json(state.catalog().list_stores(owner.principal()).await?))
}

/// POST /api/stores
#[instrument(skip_all)]
async fn create(
    State(state): State<AppState>,
    owner: OptionalOwner,
    body: Result<ApiJson<StoreInput>, AppError>,
) -> Result<Json<Store>, AppError> {
    if owner.principal().is_none() {
        return Err(AppError::Unauthenticated);
    }
    let ApiJson(input) = body?;

    Ok(Json(
        state
            .catalog()
            .create_store(owner.principal(), &input)
            .await?,
    ))
}

/// PATCH /api/stores/{store_id}
#[instrument(skip(state, owner, body))]
async fn update(
    State(state): State<AppState>,
    owner: OptionalOwner,
    ApiPath(store_id): ApiPath<StoreId>,
    body: Result<ApiJson<StoreInput>, AppError>,
) -> Result<Json<Store>, AppError> {
    authorize(state.store(), owner.principal(), store_id).await?;
    let ApiJson(input) = body?;

    Ok(Json(
        state
            .catalog()
            .update_store(owner.principal(), store_id, &input)
            .await?,
    ))
}

/// DELETE /api/stores/{store_id}
#[instrument(skip(state, owner))]
async fn destroy(
    State(state): State<AppState>,
    owner: OptionalOwner,
    ApiPath(store_id): ApiPath<StoreId>,
) -> Result<Json<Store>, AppError> {
    Ok(Json(
        state
            .catalog()
            .delete_store(owner.principal(), store_id)
            .await?,
    ))
}
