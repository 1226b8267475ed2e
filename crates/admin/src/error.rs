//! Unified error handling for admin.
//!
//! API handlers return `Result<T, AppError>`. Every error renders as a JSON
//! body `{ "error": code, "message": ..., "field"?: ... }`. Server-side
//! failures are captured to Sentry and their detail is never sent to the
//! client.

use axum::{
    Json,
    extract::{
        FromRequest, FromRequestParts,
        rejection::{FormRejection, JsonRejection, PathRejection, QueryRejection},
    },
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use storeadmin_core::FieldError;

use crate::db::RepositoryError;
use crate::services::{AuthError, CatalogError};

/// Application-level error type for the admin.
#[derive(Debug, Error)]
pub enum AppError {
    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),

    /// Authentication operation failed.
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// No signed-in owner.
    #[error("Unauthenticated")]
    Unauthenticated,

    /// The store is not the caller's.
    #[error("Forbidden")]
    Forbidden,

    /// A field failed validation.
    #[error("{0}")]
    InvalidArgument(FieldError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The row is still referenced.
    #[error("{0}")]
    Conflict(String),

    /// Malformed request.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<CatalogError> for AppError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::Unauthenticated => Self::Unauthenticated,
            CatalogError::Forbidden => Self::Forbidden,
            CatalogError::Invalid(field) => Self::InvalidArgument(field),
            CatalogError::NotFound(resource) => Self::NotFound(resource.singular().to_owned()),
            CatalogError::Conflict(message) => Self::Conflict(message),
            CatalogError::Repository(err) => Self::Database(err),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl From<FormRejection> for AppError {
    fn from(rejection: FormRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

// A path segment that is not an id cannot name an existing row.
impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        Self::NotFound(rejection.body_text())
    }
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    field: Option<&'a str>,
}

impl AppError {
    /// HTTP status for this error.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Database(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Auth(err) => match err {
                AuthError::InvalidCredentials => StatusCode::UNAUTHORIZED,
                AuthError::OwnerAlreadyExists => StatusCode::CONFLICT,
                AuthError::InvalidEmail(_)
                | AuthError::InvalidName(_)
                | AuthError::WeakPassword(_) => StatusCode::BAD_REQUEST,
                AuthError::Repository(_) | AuthError::PasswordHash => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
            Self::Unauthenticated => StatusCode::UNAUTHORIZED,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::InvalidArgument(_) | Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
        }
    }

    /// Machine-readable error code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Database(_) | Self::Internal(_) => "internal",
            Self::Auth(AuthError::OwnerAlreadyExists) => "conflict",
            Self::Auth(AuthError::InvalidCredentials) | Self::Unauthenticated => "unauthenticated",
            Self::Auth(AuthError::Repository(_) | AuthError::PasswordHash) => "internal",
            Self::Auth(_) | Self::InvalidArgument(_) => "invalid_argument",
            Self::Forbidden => "forbidden",
            Self::NotFound(_) => "not_found",
            Self::Conflict(_) => "conflict",
            Self::BadRequest(_) => "bad_request",
        }
    }

    /// Message safe to show a client.
    #[must_use]
    pub fn public_message(&self) -> String {
        match self {
            Self::Database(_) | Self::Internal(_) => "Internal server error".to_owned(),
            Self::Auth(err) => match err {
                AuthError::InvalidCredentials => "Invalid credentials".to_owned(),
                AuthError::OwnerAlreadyExists => {
                    "An account with this email already exists".to_owned()
                }
                AuthError::WeakPassword(msg) => msg.clone(),
                AuthError::InvalidEmail(_) => "Invalid email address".to_owned(),
                AuthError::InvalidName(e) => format!("Name {e}"),
                AuthError::Repository(_) | AuthError::PasswordHash => {
                    "Authentication error".to_owned()
                }
            },
            Self::Unauthenticated => "Sign in required".to_owned(),
            Self::Forbidden => "You do not have access to this store".to_owned(),
            Self::InvalidArgument(field) => field.message.clone(),
            Self::NotFound(what) => format!("Not found: {what}"),
            Self::Conflict(message) | Self::BadRequest(message) => message.clone(),
        }
    }

    /// Whether this is a server-side failure worth reporting.
    #[must_use]
    pub fn is_server_error(&self) -> bool {
        self.status().is_server_error()
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if self.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Admin request error"
            );
        }

        let field = match &self {
            Self::InvalidArgument(field) => Some(field.field.as_str()),
            Self::Auth(AuthError::InvalidEmail(_)) => Some("email"),
            Self::Auth(AuthError::InvalidName(_)) => Some("name"),
            Self::Auth(AuthError::WeakPassword(_)) => Some("password"),
            _ => None,
        };
        let body = ErrorBody {
            error: self.code(),
            message: self.public_message(),
            field,
        };

        (self.status(), Json(body)).into_response()
    }
}

/// JSON body extractor that rejects with an [`AppError`].
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct ApiJson<T>(pub T);

impl<T: Serialize> IntoResponse for ApiJson<T> {
    fn into_response(self) -> Response {
        Json(self.0).into_response()
    }
}

/// Path extractor that rejects with an [`AppError`].
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(AppError))]
pub struct ApiPath<T>(pub T);

/// Query extractor that rejects with an [`AppError`].
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(AppError))]
pub struct ApiQuery<T>(pub T);

/// Set the Sentry user context from an owner ID.
pub fn set_sentry_user(owner_id: &impl ToString, email: Option<&str>) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(owner_id.to_string()),
            email: email.map(String::from),
            ..Default::default()
        }));
    });
}

/// Clear the Sentry user context.
pub fn clear_sentry_user() {
    sentry::configure_scope(|scope| {
        scope.set_user(None);
    });
}
