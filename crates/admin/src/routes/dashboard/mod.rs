//! Owner dashboard (server-rendered HTML).
//!
//! ```text
//! GET          /                                  first store, or create-store form
//! GET          /stores/new                        create-store form
//! POST         /stores                            create store
//! GET          /{store_id}                        overview
//! GET|POST     /{store_id}/settings               rename store
//! GET|POST     /{store_id}/settings/delete        delete store
//! GET|POST     /{store_id}/{kind}                 list / create
//! GET          /{store_id}/{kind}/new             blank form
//! GET|POST     /{store_id}/{kind}/{id}            edit form / update
//! GET|POST     /{store_id}/{kind}/{id}/delete     confirm / delete
//! ```
//!
//! Orders are list-only. Every page requires a signed-in owner and a store
//! they own.

mod kinds;
mod overview;
mod resources;
mod stores;

pub use kinds::{DashboardForm, DashboardList};

use askama::Template;
use axum::{
    Router,
    extract::{
        FromRequest, FromRequestParts,
        rejection::{FormRejection, PathRejection},
    },
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
};
use tower_sessions::Session;

use storeadmin_core::{Notice, Resource, SelectOption, Store};

use crate::error::AppError;
use crate::filters;
use crate::middleware::take_flash;
use crate::models::CurrentOwner;
use crate::services::{Billboards, CatalogError, Categories, Colors, Orders, Products, Sizes};
use crate::state::AppState;

/// Build the dashboard router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(stores::index))
        .route("/stores", post(stores::create))
        .route("/stores/new", get(stores::new_form))
        .route("/{store_id}", get(overview::show))
        .route("/{store_id}/settings", get(stores::settings).post(stores::rename))
        .route(
            "/{store_id}/settings/delete",
            get(stores::confirm_delete).post(stores::destroy),
        )
        .merge(resources::editable::<Billboards>())
        .merge(resources::editable::<Categories>())
        .merge(resources::editable::<Sizes>())
        .merge(resources::editable::<Colors>())
        .merge(resources::editable::<Products>())
        .merge(resources::list_only::<Orders>())
}

// =============================================================================
// Errors and extractors
// =============================================================================

/// Error rendered as an HTML page.
#[derive(Debug)]
pub struct PageError(pub AppError);

impl From<AppError> for PageError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

impl From<CatalogError> for PageError {
    fn from(err: CatalogError) -> Self {
        Self(err.into())
    }
}

#[derive(Template)]
#[template(path = "error.html")]
struct ErrorTemplate {
    status: u16,
    title: String,
    message: String,
}

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        let err = self.0;
        if matches!(err, AppError::Unauthenticated) {
            return Redirect::to("/auth/login").into_response();
        }
        if err.is_server_error() {
            let event_id = sentry::capture_error(&err);
            tracing::error!(
                error = %err,
                sentry_event_id = %event_id,
                "Dashboard request error"
            );
        }

        let status = err.status();
        let template = ErrorTemplate {
            status: status.as_u16(),
            title: status.canonical_reason().unwrap_or("Error").to_owned(),
            message: err.public_message(),
        };
        (status, render(&template)).into_response()
    }
}

/// Path extractor that renders an error page on rejection.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(PageError))]
pub struct PagePath<T>(pub T);

/// Form body extractor that renders an error page on rejection.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Form), rejection(PageError))]
pub struct PageForm<T>(pub T);

impl From<PathRejection> for PageError {
    fn from(rejection: PathRejection) -> Self {
        Self(AppError::from(rejection))
    }
}

impl From<FormRejection> for PageError {
    fn from(rejection: FormRejection) -> Self {
        Self(AppError::from(rejection))
    }
}

/// Render a template, logging instead of failing on template errors.
pub(crate) fn render(template: &impl Template) -> Html<String> {
    Html(template.render().unwrap_or_else(|e| {
        tracing::error!(error = %e, "Template render error");
        "Internal Server Error".to_owned()
    }))
}

// =============================================================================
// Layout
// =============================================================================

/// Owner shown in the header.
#[derive(Debug, Clone)]
pub struct OwnerView {
    pub name: String,
    pub email: String,
}

impl From<&CurrentOwner> for OwnerView {
    fn from(owner: &CurrentOwner) -> Self {
        Self {
            name: owner.name.clone(),
            email: owner.email.to_string(),
        }
    }
}

/// A link in the store navigation bar.
#[derive(Debug, Clone)]
pub struct NavLink {
    pub href: String,
    pub label: &'static str,
    pub active: bool,
}

/// Everything `base.html` needs: who is signed in, the store switcher and
/// the pending notice.
#[derive(Debug, Clone)]
pub struct Layout {
    pub owner: OwnerView,
    pub stores: Vec<SelectOption>,
    pub store: Option<Store>,
    pub current_path: String,
    pub notice: Option<Notice>,
}

impl Layout {
    /// Load the switcher entries and take the flash notice.
    pub async fn load(
        state: &AppState,
        session: &Session,
        owner: &CurrentOwner,
        store: Option<Store>,
        current_path: impl Into<String>,
    ) -> Result<Self, PageError> {
        let stores = state.catalog().list_stores(Some(owner.id)).await?;
        Ok(Self {
            owner: OwnerView::from(owner),
            stores: SelectOption::from_all(&stores),
            store,
            current_path: current_path.into(),
            notice: take_flash(session).await,
        })
    }

    /// Replace the flash with `notice`, if there is one.
    #[must_use]
    pub fn with_notice(mut self, notice: Option<Notice>) -> Self {
        if notice.is_some() {
            self.notice = notice;
        }
        self
    }

    /// Links for the current store.
    #[must_use]
    pub fn nav(&self) -> Vec<NavLink> {
        let Some(store) = &self.store else {
            return Vec::new();
        };
        let base = format!("/{}", store.id);
        let mut links = vec![NavLink {
            active: self.current_path == base,
            href: base.clone(),
            label: "Overview",
        }];
        for kind in Resource::NESTED {
            let href = format!("{base}/{}", kind.path());
            links.push(NavLink {
                active: self.current_path.starts_with(&href),
                href,
                label: kind.plural_title(),
            });
        }
        let settings = format!("{base}/settings");
        links.push(NavLink {
            active: self.current_path.starts_with(&settings),
            href: settings,
            label: "Settings",
        });
        links
    }

    #[must_use]
    pub fn is_current_store(&self, option: &SelectOption) -> bool {
        self.store
            .as_ref()
            .is_some_and(|store| store.id.as_uuid() == option.id)
    }
}

/// Resolve a store the owner can manage, for page handlers.
pub(crate) async fn owned_store(
    state: &AppState,
    owner: &CurrentOwner,
    store_id: storeadmin_core::StoreId,
) -> Result<Store, PageError> {
    state
        .catalog()
        .get_store(Some(owner.id), store_id)
        .await
        .map_err(PageError::from)
}

/// Log a failure the form will only show generically.
pub(crate) fn report(err: &CatalogError) {
    if let CatalogError::Repository(e) = err {
        let event_id = sentry::capture_error(e);
        tracing::error!(error = %e, sentry_event_id = %event_id, "Dashboard write failed");
    }
}

/// Status for a page re-rendered with an error notice.
pub(crate) const fn stay_status(notice: &Notice) -> StatusCode {
    if notice.is_error() {
        StatusCode::UNPROCESSABLE_ENTITY
    } else {
        StatusCode::OK
    }
}
