//! Store-scoped resource endpoints.
//!
//! One set of generic handlers serves every [`ResourceKind`]. Reads are
//! public; writes pass the principal to the catalog service, which runs the
//! ownership guard before anything else. Write bodies are only looked at once
//! the guard has passed, so a stranger gets 401/403 whatever they send.

use axum::{
    Json, Router,
    extract::State,
    routing::get,
};
use tracing::instrument;

use storeadmin_core::StoreId;

use crate::error::{ApiJson, ApiPath, ApiQuery, AppError};
use crate::middleware::OptionalOwner;
use crate::services::{ResourceKind, authorize};
use crate::state::AppState;

/// Routes for `/{store_id}/{kind}` and `/{store_id}/{kind}/{id}`.
pub fn router<K: ResourceKind>() -> Router<AppState> {
    let segment = K::resource().path();
    Router::new()
        .route(&format!("/{{store_id}}/{segment}"), get(list::<K>).post(create::<K>))
        .route(
            &format!("/{{store_id}}/{segment}/{{id}}"),
            get(show::<K>).patch(update::<K>).delete(destroy::<K>),
        )
}

/// GET /api/{store_id}/{kind}
#[instrument(skip(state, filter), fields(resource = %K::resource().path()))]
async fn list<K: ResourceKind>(
    State(state): State<AppState>,
    ApiPath(store_id): ApiPath<StoreId>,
    ApiQuery(filter): ApiQuery<K::Filter>,
) -> Result<Json<Vec<K::View>>, AppError> {
    Ok(Json(state.catalog().list::<K>(store_id, &filter).await?))
}

/// GET /api/{store_id}/{kind}/{id}
#[instrument(skip(state), fields(resource = %K::resource().path()))]
async fn show<K: ResourceKind>(
    State(state): State<AppState>,
    ApiPath((store_id, id)): ApiPath<(StoreId, K::Id)>,
) -> Result<Json<K::View>, AppError> {
    Ok(Json(state.catalog().get::<K>(store_id, id).await?))
}

/// POST /api/{store_id}/{kind}
#[instrument(skip(state, owner, body), fields(resource = %K::resource().path()))]
async fn create<K: ResourceKind>(
    State(state): State<AppState>,
    owner: OptionalOwner,
    ApiPath(store_id): ApiPath<StoreId>,
    body: Result<ApiJson<K::Input>, AppError>,
) -> Result<Json<K::Row>, AppError> {
    authorize(state.store(), owner.principal(), store_id).await?;
    let ApiJson(input) = body?;

    let row = state
        .catalog()
        .create::<K>(owner.principal(), store_id, &input)
        .await?;
    Ok(Json(row))
}

/// PATCH /api/{store_id}/{kind}/{id}
#[instrument(skip(state, owner, body), fields(resource = %K::resource().path()))]
async fn update<K: ResourceKind>(
    State(state): State<AppState>,
    owner: OptionalOwner,
    ApiPath((store_id, id)): ApiPath<(StoreId, K::Id)>,
    body: Result<ApiJson<K::Input>, AppError>,
) -> Result<Json<K::Row>, AppError> {
    authorize(state.store(), owner.principal(), store_id).await?;
    let ApiJson(input) = body?;

    let row = state
        .catalog()
        .update::<K>(owner.principal(), store_id, id, &input)
        .await?;
    Ok(Json(row))
}

/// DELETE /api/{store_id}/{kind}/{id}
#[instrument(skip(state, owner), fields(resource = %K::resource().path()))]
async fn destroy<K: ResourceKind>(
    State(state): State<AppState>,
    owner: OptionalOwner,
    ApiPath((store_id, id)): ApiPath<(StoreId, K::Id)>,
) -> Result<Json<K::Row>, AppError> {
    let row = state
        .catalog()
        .delete::<K>(owner.principal(), store_id, id)
        .await?;
    Ok(Json(row))
}
