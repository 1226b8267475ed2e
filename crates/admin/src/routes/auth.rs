//! Authentication route handlers for the dashboard.
//!
//! Provides the login page and logout. Accounts are created through
//! `POST /api/auth/register` or `sa-cli owner create`.

use askama::Template;
use axum::{
    Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{AppError, clear_sentry_user, set_sentry_user};
use crate::filters;
use crate::middleware::{OptionalOwner, clear_current_owner, set_current_owner};
use crate::models::CurrentOwner;
use crate::routes::dashboard::{PageError, PageForm, render};
use crate::state::AppState;

/// Login page template.
#[derive(Template)]
#[template(path = "auth/login.html")]
struct LoginPageTemplate {
    email: String,
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    email: String,
    #[serde(default)]
    password: String,
}

/// Build the auth router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/auth/login", get(login_page).post(login))
        .route("/auth/logout", post(logout))
}

/// Render the login page.
///
/// GET /auth/login
async fn login_page(owner: OptionalOwner) -> Response {
    if owner.0.is_some() {
        return Redirect::to("/").into_response();
    }
    render(&LoginPageTemplate {
        email: String::new(),
        error: None,
    })
    .into_response()
}

/// Check credentials and start a session.
///
/// POST /auth/login
#[instrument(skip_all)]
async fn login(
    State(state): State<AppState>,
    session: Session,
    PageForm(form): PageForm<LoginForm>,
) -> Result<Response, PageError> {
    let owner = match state.auth().login(&form.email, &form.password).await {
        Ok(owner) => owner,
        Err(err) => {
            let err = AppError::from(err);
            if err.is_server_error() {
                return Err(err.into());
            }
            let page = LoginPageTemplate {
                email: form.email,
                error: Some(err.public_message()),
            };
            return Ok((StatusCode::UNAUTHORIZED, render(&page)).into_response());
        }
    };

    set_current_owner(&session, &CurrentOwner::from(&owner))
        .await
        .map_err(|e| AppError::Internal(format!("session error: {e}")))?;
    set_sentry_user(&owner.id, Some(owner.email.as_str()));
    tracing::info!(owner_id = %owner.id, "owner signed in");

    Ok(Redirect::to("/").into_response())
}

/// Logout and clear session.
///
/// POST /auth/logout
async fn logout(session: Session) -> Redirect {
    if let Err(e) = clear_current_owner(&session).await {
        tracing::warn!(error = %e, "failed to clear session");
    }
    clear_sentry_user();
    Redirect::to("/auth/login")
}
