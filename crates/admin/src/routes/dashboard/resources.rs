//! List, form and delete pages shared by every resource kind.

use std::collections::HashMap;

use askama::Template;
use axum::{
    Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    routing::get,
};
use tower_sessions::Session;
use tracing::instrument;
use uuid::Uuid;

use storeadmin_core::{Effect, FieldError, FormController, Notice, Store, StoreId, Submission};

use super::{
    DashboardForm, DashboardList, Layout, PageError, PageForm, PagePath, owned_store, render,
    report, stay_status,
};
use crate::components::{DataTable, FormField};
use crate::error::AppError;
use crate::filters;
use crate::middleware::{RequireOwner, set_flash};
use crate::models::CurrentOwner;
use crate::state::AppState;

/// List, create, edit and delete pages for `K`.
pub fn editable<K: DashboardForm>() -> Router<AppState> {
    let segment = K::resource().path();
    Router::new()
        .route(&format!("/{{store_id}}/{segment}"), get(list::<K>).post(create::<K>))
        .route(&format!("/{{store_id}}/{segment}/new"), get(new_form::<K>))
        .route(
            &format!("/{{store_id}}/{segment}/{{id}}"),
            get(edit_form::<K>).post(update::<K>),
        )
        .route(
            &format!("/{{store_id}}/{segment}/{{id}}/delete"),
            get(confirm_delete::<K>).post(destroy::<K>),
        )
}

/// Only the list page for `K`.
pub fn list_only<K: DashboardList>() -> Router<AppState> {
    let segment = K::resource().path();
    Router::new().route(&format!("/{{store_id}}/{segment}"), get(list::<K>))
}

fn base_path<K: DashboardList>(store: StoreId) -> String {
    format!("/{store}/{}", K::resource().path())
}

// =============================================================================
// Templates
// =============================================================================

#[derive(Template)]
#[template(path = "resources/list.html")]
struct ListTemplate {
    layout: Layout,
    title: &'static str,
    new_url: Option<String>,
    api_url: String,
    table: DataTable,
}

#[derive(Template)]
#[template(path = "resources/form.html")]
struct FormTemplate {
    layout: Layout,
    title: String,
    action_url: String,
    action_label: &'static str,
    fields: Vec<FormField>,
    field_error: Option<FieldError>,
    back_url: String,
    delete_url: Option<String>,
}

/// Confirmation page for a destructive action.
#[derive(Template)]
#[template(path = "resources/delete.html")]
pub(super) struct DeleteTemplate {
    pub layout: Layout,
    pub title: String,
    pub action_url: String,
    pub cancel_url: String,
}

// =============================================================================
// Handlers
// =============================================================================

/// GET /{store_id}/{kind}
#[instrument(skip(state, session, owner), fields(resource = %K::resource().path()))]
async fn list<K: DashboardList>(
    State(state): State<AppState>,
    session: Session,
    RequireOwner(owner): RequireOwner,
    PagePath(store_id): PagePath<StoreId>,
) -> Result<Response, PageError> {
    let store = owned_store(&state, &owner, store_id).await?;
    let views = state
        .catalog()
        .list::<K>(store.id, &K::dashboard_filter())
        .await?;

    let base = base_path::<K>(store.id);
    let mut table = DataTable::new(K::columns(), views.iter().map(K::row).collect(), base.clone());
    if K::READ_ONLY {
        table = table.read_only();
    }
    let template = ListTemplate {
        title: K::resource().plural_title(),
        new_url: (!K::READ_ONLY).then(|| format!("{base}/new")),
        api_url: format!("/api{base}"),
        table,
        layout: Layout::load(&state, &session, &owner, Some(store), base).await?,
    };
    Ok(render(&template).into_response())
}

/// GET /{store_id}/{kind}/new
#[instrument(skip(state, session, owner), fields(resource = %K::resource().path()))]
async fn new_form<K: DashboardForm>(
    State(state): State<AppState>,
    session: Session,
    RequireOwner(owner): RequireOwner,
    PagePath(store_id): PagePath<StoreId>,
) -> Result<Response, PageError> {
    let store = owned_store(&state, &owner, store_id).await?;
    let controller = FormController::new(Some(store.id), K::Input::default());
    render_form::<K>(&state, &session, &owner, store, None, &controller, None).await
}

/// GET /{store_id}/{kind}/{id}
#[instrument(skip(state, session, owner), fields(resource = %K::resource().path()))]
async fn edit_form<K: DashboardForm>(
    State(state): State<AppState>,
    session: Session,
    RequireOwner(owner): RequireOwner,
    PagePath((store_id, id)): PagePath<(StoreId, K::Id)>,
) -> Result<Response, PageError> {
    let store = owned_store(&state, &owner, store_id).await?;
    let view = state.catalog().get::<K>(store.id, id).await?;
    let controller = FormController::edit(Some(store.id), id.into(), K::input_from_view(&view));
    render_form::<K>(&state, &session, &owner, store, Some(id), &controller, None).await
}

/// POST /{store_id}/{kind}
#[instrument(skip(state, session, owner, form), fields(resource = %K::resource().path()))]
async fn create<K: DashboardForm>(
    State(state): State<AppState>,
    session: Session,
    RequireOwner(owner): RequireOwner,
    PagePath(store_id): PagePath<StoreId>,
    PageForm(form): PageForm<HashMap<String, String>>,
) -> Result<Response, PageError> {
    let store = owned_store(&state, &owner, store_id).await?;
    save::<K>(&state, &session, &owner, store, None, &form).await
}

/// POST /{store_id}/{kind}/{id}
#[instrument(skip(state, session, owner, form), fields(resource = %K::resource().path()))]
async fn update<K: DashboardForm>(
    State(state): State<AppState>,
    session: Session,
    RequireOwner(owner): RequireOwner,
    PagePath((store_id, id)): PagePath<(StoreId, K::Id)>,
    PageForm(form): PageForm<HashMap<String, String>>,
) -> Result<Response, PageError> {
    let store = owned_store(&state, &owner, store_id).await?;
    save::<K>(&state, &session, &owner, store, Some(id), &form).await
}

/// GET /{store_id}/{kind}/{id}/delete
#[instrument(skip(state, session, owner), fields(resource = %K::resource().path()))]
async fn confirm_delete<K: DashboardForm>(
    State(state): State<AppState>,
    session: Session,
    RequireOwner(owner): RequireOwner,
    PagePath((store_id, id)): PagePath<(StoreId, K::Id)>,
) -> Result<Response, PageError> {
    let store = owned_store(&state, &owner, store_id).await?;
    state.catalog().get::<K>(store.id, id).await?;
    render_delete::<K>(&state, &session, &owner, store, id, None).await
}

/// POST /{store_id}/{kind}/{id}/delete
#[instrument(skip(state, session, owner), fields(resource = %K::resource().path()))]
async fn destroy<K: DashboardForm>(
    State(state): State<AppState>,
    session: Session,
    RequireOwner(owner): RequireOwner,
    PagePath((store_id, id)): PagePath<(StoreId, K::Id)>,
) -> Result<Response, PageError> {
    let store = owned_store(&state, &owner, store_id).await?;
    let mut controller = FormController::edit(Some(store.id), id.into(), K::Input::default());
    controller.request_delete();
    let target = controller
        .confirm_delete()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let outcome = state
        .catalog()
        .delete::<K>(Some(owner.id), store.id, K::Id::from(target))
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
            render_delete::<K>(&state, &session, &owner, store, id, Some(notice)).await
        }
        None => Err(AppError::Internal("delete did not settle".to_owned()).into()),
    }
}

// =============================================================================
// Shared
// =============================================================================

/// Run a submitted form through the controller and the catalog service.
async fn save<K: DashboardForm>(
    state: &AppState,
    session: &Session,
    owner: &CurrentOwner,
    store: Store,
    id: Option<K::Id>,
    form: &HashMap<String, String>,
) -> Result<Response, PageError> {
    let input = K::input_from_form(form);
    let mut controller = match id {
        Some(id) => FormController::edit(Some(store.id), id.into(), input),
        None => FormController::new(Some(store.id), input),
    };

    let effect = match controller.submit() {
        Ok(submission) => {
            let catalog = state.catalog();
            let saved = match submission {
                Submission::Create(_) => {
                    catalog
                        .create::<K>(Some(owner.id), store.id, controller.values())
                        .await
                }
                Submission::Update { id, .. } => {
                    catalog
                        .update::<K>(Some(owner.id), store.id, K::Id::from(id), controller.values())
                        .await
                }
            };
            let outcome = saved
                .map(|row| -> Uuid { K::row_id(&row).into() })
                .map_err(|e| {
                    report(&e);
                    e.to_failure()
                });
            controller.complete(outcome)
        }
        // The field error stays on the controller.
        Err(_) => None,
    };

    match effect {
        Some(Effect::Navigate { to, notice }) => {
            set_flash(session, &notice).await;
            Ok(Redirect::to(&to).into_response())
        }
        Some(Effect::Stay { notice }) => {
            render_form::<K>(state, session, owner, store, id, &controller, Some(notice)).await
        }
        None => {
            let notice = controller
                .field_error()
                .map(|err| Notice::error(err.message.clone()));
            render_form::<K>(state, session, owner, store, id, &controller, notice).await
        }
    }
}

async fn render_form<K: DashboardForm>(
    state: &AppState,
    session: &Session,
    owner: &CurrentOwner,
    store: Store,
    id: Option<K::Id>,
    controller: &FormController<K::Input>,
    notice: Option<Notice>,
) -> Result<Response, PageError> {
    let base = base_path::<K>(store.id);
    let fields = K::fields(state.store(), store.id, controller.values())
        .await
        .map_err(AppError::from)?;
    let status = notice.as_ref().map_or(StatusCode::OK, stay_status);

    let template = FormTemplate {
        title: controller.title(),
        action_url: id.map_or_else(|| base.clone(), |id| format!("{base}/{id}")),
        action_label: controller.action_label(),
        fields,
        field_error: controller.field_error().cloned(),
        delete_url: id.map(|id| format!("{base}/{id}/delete")),
        layout: Layout::load(state, session, owner, Some(store), base.clone())
            .await?
            .with_notice(notice),
        back_url: base,
    };
    Ok((status, render(&template)).into_response())
}

async fn render_delete<K: DashboardForm>(
    state: &AppState,
    session: &Session,
    owner: &CurrentOwner,
    store: Store,
    id: K::Id,
    notice: Option<Notice>,
) -> Result<Response, PageError> {
    let base = base_path::<K>(store.id);
    let status = notice.as_ref().map_or(StatusCode::OK, stay_status);
    let template = DeleteTemplate {
        title: format!("Delete this {}?", K::resource().singular()),
        action_url: format!("{base}/{id}/delete"),
        cancel_url: format!("{base}/{id}"),
        layout: Layout::load(state, session, owner, Some(store), base)
            .await?
            .with_notice(notice),
    };
    Ok((status, render(&template)).into_response())
}
