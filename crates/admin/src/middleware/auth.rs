//! Authentication extractors for admin.
//!
//! The principal is the [`CurrentOwner`] stored in the session at login.

use axum::{
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;

use storeadmin_core::OwnerId;

use crate::models::{CurrentOwner, session_keys};

/// Extractor that requires a signed-in owner.
///
/// If nobody is signed in, returns a redirect to the login page for HTML
/// requests, or 401 Unauthorized for API requests.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     RequireOwner(owner): RequireOwner,
/// ) -> impl IntoResponse {
///     format!("Hello, {}!", owner.name)
/// }
/// ```
pub struct RequireOwner(pub CurrentOwner);

/// Rejection for [`RequireOwner`].
pub enum OwnerAuthRejection {
    /// Redirect to login page (for HTML requests).
    RedirectToLogin,
    /// Unauthorized response (for API requests).
    Unauthorized,
}

impl IntoResponse for OwnerAuthRejection {
    fn into_response(self) -> Response {
        match self {
            Self::RedirectToLogin => Redirect::to("/auth/login").into_response(),
            Self::Unauthorized => StatusCode::UNAUTHORIZED.into_response(),
        }
    }
}

impl<S> FromRequestParts<S> for RequireOwner
where
    S: Send + Sync,
{
    type Rejection = OwnerAuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let is_api = parts.uri.path().starts_with("/api/");
        let rejection = || {
            if is_api {
                OwnerAuthRejection::Unauthorized
            } else {
                OwnerAuthRejection::RedirectToLogin
            }
        };

        let session = parts.extensions.get::<Session>().ok_or_else(rejection)?;
        let owner: CurrentOwner = session
            .get(session_keys::CURRENT_OWNER)
            .await
            .ok()
            .flatten()
            .ok_or_else(rejection)?;

        Ok(Self(owner))
    }
}

/// Extractor that optionally gets the signed-in owner.
///
/// Store-scoped API handlers use this and let the ownership guard decide,
/// so an anonymous write fails with the guard's `Unauthenticated`.
pub struct OptionalOwner(pub Option<CurrentOwner>);

impl OptionalOwner {
    /// The principal's id, if any.
    #[must_use]
    pub fn principal(&self) -> Option<OwnerId> {
        self.0.as_ref().map(|owner| owner.id)
    }
}

impl<S> FromRequestParts<S> for OptionalOwner
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let owner = match parts.extensions.get::<Session>() {
            Some(session) => session
                .get::<CurrentOwner>(session_keys::CURRENT_OWNER)
                .await
                .ok()
                .flatten(),
            None => None,
        };

        Ok(Self(owner))
    }
}

/// Sign an owner in. The session id is rotated first.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_current_owner(
    session: &Session,
    owner: &CurrentOwner,
) -> Result<(), tower_sessions::session::Error> {
    session.cycle_id().await?;
    session.insert(session_keys::CURRENT_OWNER, owner).await
}

/// Sign the current owner out and drop the session.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn clear_current_owner(session: &Session) -> Result<(), tower_sessions::session::Error> {
    session.flush().await
}
