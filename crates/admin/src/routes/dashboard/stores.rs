//! Store selection, creation and settings pages.

use askama::Template;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use storeadmin_core::{Effect, FieldError, FormController, Notice, Store, StoreId, StoreInput};

use super::resources::DeleteTemplate;
use super::{Layout, PageError, PageForm, PagePath, owned_store, render, report, stay_status};
use crate::error::AppError;
use crate::filters;
use crate::middleware::{RequireOwner, set_flash};
use crate::models::CurrentOwner;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct StoreForm {
    #[serde(default)]
    name: String,
}

#[derive(Template)]
#[template(path = "stores/new.html")]
struct NewStoreTemplate {
    layout: Layout,
    name: String,
    field_error: Option<FieldError>,
}

#[derive(Template)]
#[template(path = "stores/settings.html")]
struct SettingsTemplate {
    layout: Layout,
    store_id: StoreId,
    name: String,
    field_error: Option<FieldError>,
    api_url: String,
}

/// GET /
///
/// Opens the owner's first store, or the create-store form when they have
/// none.
#[instrument(skip_all)]
pub async fn index(
    State(state): State<AppState>,
    session: Session,
    RequireOwner(owner): RequireOwner,
) -> Result<Response, PageError> {
    let stores = state.catalog().list_stores(Some(owner.id)).await?;
    if let Some(store) = stores.first() {
        return Ok(Redirect::to(&format!("/{}", store.id)).into_response());
    }
    render_new(&state, &session, &owner, &StoreInput::default(), None, None).await
}

/// GET /stores/new
#[instrument(skip_all)]
pub async fn new_form(
    State(state): State<AppState>,
    session: Session,
    RequireOwner(owner): RequireOwner,
) -> Result<Response, PageError> {
    render_new(&state, &session, &owner, &StoreInput::default(), None, None).await
}

/// POST /stores
#[instrument(skip_all)]
pub async fn create(
    State(state): State<AppState>,
    session: Session,
    RequireOwner(owner): RequireOwner,
    PageForm(form): PageForm<StoreForm>,
) -> Result<Response, PageError> {
    let mut controller = FormController::new(None, StoreInput { name: form.name });
    let effect = match controller.submit() {
        Ok(_) => {
            let outcome = state
                .catalog()
                .create_store(Some(owner.id), controller.values())
                .await
                .map(|store| store.id.as_uuid())
                .map_err(|e| {
                    report(&e);
                    e.to_failure()
                });
            controller.complete(outcome)
        }
        Err(_) => None,
    };

    match effect {
        Some(Effect::Navigate { to, notice }) => {
            set_flash(&session, &notice).await;
            Ok(Redirect::to(&to).into_response())
        }
        Some(Effect::Stay { notice }) => {
            let field_error = controller.field_error().cloned();
            render_new(&state, &session, &owner, controller.values(), field_error, Some(notice))
                .await
        }
        None => {
            let field_error = controller.field_error().cloned();
            let notice = field_error.as_ref().map(|e| Notice::error(e.message.clone()));
            render_new(&state, &session, &owner, controller.values(), field_error, notice).await
        }
    }
}

/// GET /{store_id}/settings
#[instrument(skip(state, session, owner))]
pub async fn settings(
    State(state): State<AppState>,
    session: Session,
    RequireOwner(owner): RequireOwner,
    PagePath(store_id): PagePath<StoreId>,
) -> Result<Response, PageError> {
    let store = owned_store(&state, &owner, store_id).await?;
    let name = store.name.clone();
    render_settings(&state, &session, &owner, store, name, None, None).await
}

/// POST /{store_id}/settings
#[instrument(skip(state, session, owner, form))]
pub async fn rename(
    State(state): State<AppState>,
    session: Session,
    RequireOwner(owner): RequireOwner,
    PagePath(store_id): PagePath<StoreId>,
    PageForm(form): PageForm<StoreForm>,
) -> Result<Response, PageError> {
    let store = owned_store(&state, &owner, store_id).await?;
    let mut controller =
        FormController::edit(None, store.id.as_uuid(), StoreInput { name: form.name });

    let effect = match controller.submit() {
        Ok(_) => {
            let outcome = state
                .catalog()
                .update_store(Some(owner.id), store.id, controller.values())
                .await
                .map(|store| store.id.as_uuid())
                .map_err(|e| {
                    report(&e);
                    e.to_failure()
                });
            controller.complete(outcome)
        }
        Err(_) => None,
    };

    let name = controller.values().name.clone();
    let field_error = controller.field_error().cloned();
    match effect {
        Some(Effect::Navigate { to, notice }) => {
            set_flash(&session, &notice).await;
            Ok(Redirect::to(&to).into_response())
        }
        Some(Effect::Stay { notice }) => {
            render_settings(&state, &session, &owner, store, name, field_error, Some(notice)).await
        }
        None => {
            let notice = field_error.as_ref().map(|e| Notice::error(e.message.clone()));
            render_settings(&state, &session, &owner, store, name, field_error, notice).await
        }
    }
}

/// GET /{store_id}/settings/delete
#[instrument(skip(state, session, owner))]
pub async fn confirm_delete(
    State(state): State<AppState>,
    session: Session,
    RequireOwner(owner): RequireOwner,
    PagePath(store_id): PagePath<StoreId>,
) -> Result<Response, PageError> {
    let store = owned_store(&state, &owner, store_id).await?;
    render_delete(&state, &session, &owner, store, None).await
}

/// POST /{store_id}/settings/delete
#[instrument(skip(state, session, owner))]
pub async fn destroy(
    State(state): State<AppState>,
    session: Session,
    RequireOwner(owner): RequireOwner,
    PagePath(store_id): PagePath<StoreId>,
) -> Result<Response, PageError> {
    let store = owned_store(&state, &owner, store_id).await?;
    let mut controller = FormController::edit(
        None,
        store.id.as_uuid(),
        StoreInput {
            name: store.name.clone(),
        },
    );
    controller.request_delete();
    let target = controller
        .confirm_delete()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let outcome = state
        .catalog()
        .delete_store(Some(owner.id), StoreId::from_uuid(target))
        .await
        .map(|_| ())
        .map_err(|e| {
            report(&e);
            e.to_failure()
        });

    match controller.complete_delete(outcome) {
        Some(Effect::Navigate { to, notice }) => {
            set_flash(&session, &notice).await;
            Ok(Redirect::to(&to).into_response())
        }
        Some(Effect::Stay { notice }) => {
            render_delete(&state, &session, &owner, store, Some(notice)).await
        }
        None => Err(AppError::Internal("delete did not settle".to_owned()).into()),
    }
}

async fn render_new(
    state: &AppState,
    session: &Session,
    owner: &CurrentOwner,
    values: &StoreInput,
    field_error: Option<FieldError>,
    notice: Option<Notice>,
) -> Result<Response, PageError> {
    let status = notice.as_ref().map_or(StatusCode::OK, stay_status);
    let template = NewStoreTemplate {
        layout: Layout::load(state, session, owner, None, "/stores/new")
            .await?
            .with_notice(notice),
        name: values.name.clone(),
        field_error,
    };
    Ok((status, render(&template)).into_response())
}

async fn render_settings(
    state: &AppState,
    session: &Session,
    owner: &CurrentOwner,
    store: Store,
    name: String,
    field_error: Option<FieldError>,
    notice: Option<Notice>,
) -> Result<Response, PageError> {
    let status = notice.as_ref().map_or(StatusCode::OK, stay_status);
    let store_id = store.id;
    let template = SettingsTemplate {
        layout: Layout::load(state, session, owner, Some(store), format!("/{store_id}/settings"))
            .await?
            .with_notice(notice),
        store_id,
        name,
        field_error,
        api_url: format!("/api/stores/{store_id}"),
    };
    Ok((status, render(&template)).into_response())
}

async fn render_delete(
    state: &AppState,
    session: &Session,
    owner: &CurrentOwner,
    store: Store,
    notice: Option<Notice>,
) -> Result<Response, PageError> {
    let status = notice.as_ref().map_or(StatusCode::OK, stay_status);
    let store_id = store.id;
    let template = DeleteTemplate {
        title: format!("Delete store \"{}\"?", store.name),
        action_url: format!("/{store_id}/settings/delete"),
        cancel_url: format!("/{store_id}/settings"),
        layout: Layout::load(state, session, owner, Some(store), format!("/{store_id}/settings"))
            .await?
            .with_notice(notice),
    };
    Ok((status, render(&template)).into_response())
}
