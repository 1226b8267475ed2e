//! Owner authentication API.
//!
//! ```text
//! POST /api/auth/register  {email, name, password}  - create owner, sign in
//! POST /api/auth/login     {email, password}        - sign in
//! POST /api/auth/logout                             - sign out
//! GET  /api/auth/me                                 - current owner
//! ```

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{get, post},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{ApiJson, AppError, clear_sentry_user, set_sentry_user};
use crate::middleware::{RequireOwner, clear_current_owner, set_current_owner};
use crate::models::{CurrentOwner, Owner};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/logout", post(logout))
        .route("/auth/me", get(me))
}

#[derive(Deserialize)]
struct RegisterRequest {
    email: String,
    name: String,
    password: String,
}

#[derive(Deserialize)]
struct LoginRequest {
    email: String,
    password: String,
}

async fn sign_in(session: &Session, owner: &Owner) -> Result<CurrentOwner, AppError> {
    let current = CurrentOwner::from(owner);
    set_current_owner(session, &current)
        .await
        .map_err(|e| AppError::Internal(format!("session error: {e}")))?;
    set_sentry_user(&owner.id, Some(owner.email.as_str()));
    Ok(current)
}

/// POST /api/auth/register
#[instrument(skip_all)]
async fn register(
    State(state): State<AppState>,
    session: Session,
    ApiJson(body): ApiJson<RegisterRequest>,
) -> Result<Json<CurrentOwner>, AppError> {
    let owner = state
        .auth()
        .register(&body.email, &body.name, &body.password)
        .await?;
    Ok(Json(sign_in(&session, &owner).await?))
}

/// POST /api/auth/login
#[instrument(skip_all)]
async fn login(
    State(state): State<AppState>,
    session: Session,
    ApiJson(body): ApiJson<LoginRequest>,
) -> Result<Json<CurrentOwner>, AppError> {
    let owner = state.auth().login(&body.email, &body.password).await?;
    tracing::info!(owner_id = %owner.id, "owner signed in");
    Ok(Json(sign_in(&session, &owner).await?))
}

/// POST /api/auth/logout
async fn logout(session: Session) -> Result<StatusCode, AppError> {
    clear_current_owner(&session)
        .await
        .map_err(|e| AppError::Internal(format!("session error: {e}")))?;
    clear_sentry_user();
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/auth/me
async fn me(RequireOwner(owner): RequireOwner) -> Json<CurrentOwner> {
    Json(owner)
}
