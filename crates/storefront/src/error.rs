//! Storefront error type with Sentry integration.
//!
//! Handlers return `Result<T, StorefrontError>`. Every error renders the
//! error page; upstream failures are captured to Sentry before responding.

use askama::Template;
use axum::{
    extract::rejection::{PathRejection, QueryRejection},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use thiserror::Error;

use crate::api::ApiError;
use crate::filters;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum StorefrontError {
    /// The catalog API failed or answered 404.
    #[error("Catalog API error: {0}")]
    Api(#[from] ApiError),

    /// Page or resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Template rendering failed.
    #[error("Template error: {0}")]
    Template(#[from] askama::Error),
}

impl StorefrontError {
    /// HTTP status for this error.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Api(err) if err.is_not_found() => StatusCode::NOT_FOUND,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Api(_) => StatusCode::BAD_GATEWAY,
            Self::Template(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<PathRejection> for StorefrontError {
    fn from(rejection: PathRejection) -> Self {
        Self::NotFound(rejection.body_text())
    }
}

impl From<QueryRejection> for StorefrontError {
    fn from(rejection: QueryRejection) -> Self {
        Self::NotFound(rejection.body_text())
    }
}

#[derive(Template)]
#[template(path = "error.html")]
struct ErrorTemplate {
    status: u16,
    title: &'static str,
    message: &'static str,
}

impl IntoResponse for StorefrontError {
    fn into_response(self) -> Response {
        let status = self.status();

        if status.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        } else {
            tracing::debug!(error = %self, "Page not found");
        }

        // Don't expose upstream details to shoppers
        let (title, message) = match status {
            StatusCode::NOT_FOUND => ("Not found", "We couldn't find what you were looking for."),
            StatusCode::BAD_GATEWAY => (
                "Store unavailable",
                "The catalog is temporarily unavailable. Please try again shortly.",
            ),
            _ => ("Something went wrong", "Please try again shortly."),
        };

        let page = ErrorTemplate {
            status: status.as_u16(),
            title,
            message,
        };

        match page.render() {
            Ok(html) => (status, Html(html)).into_response(),
            Err(e) => {
                tracing::error!(error = %e, "Failed to render error page");
                (status, title).into_response()
            }
        }
    }
}

/// Result type alias for `StorefrontError`.
pub type Result<T> = std::result::Result<T, StorefrontError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn get_status(err: StorefrontError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_error_display() {
        let err = StorefrontError::NotFound("product".to_string());
        assert_eq!(err.to_string(), "Not found: product");
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(
            get_status(StorefrontError::NotFound("x".to_string())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(StorefrontError::Api(ApiError::NotFound("/products/x".to_string()))),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(StorefrontError::Api(ApiError::Status {
                status: 500,
                body: "boom".to_string(),
            })),
            StatusCode::BAD_GATEWAY
        );
    }
}
