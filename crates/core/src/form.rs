//! Form lifecycle for editing one resource instance.
//!
//! [`FormController`] performs no I/O. A caller (the dashboard handlers, or
//! any other client) asks it for the request to issue, performs the request
//! itself, and reports the outcome back. The controller answers with the
//! [`Effect`] to apply: navigate away with a confirmation, or stay on the
//! form with an error notice.
//!
//! ```text
//!  Idle ──submit──▶ Submitting ──complete(Ok)──▶ Success
//!   ▲                   │
//!   └──────────── complete(Err) ──▶ Failed (accepts submit again)
//! ```

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::catalog::{Billboard, Category, Color, Product, Size, Store};
use crate::resource::Resource;
use crate::types::StoreId;
use crate::validation::{FieldError, FormSchema};

/// Generic fallback for unexpected failures.
pub const GENERIC_ERROR: &str = "Something went wrong.";

/// Where a form currently is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormState {
    Idle,
    Submitting,
    Success,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeLevel {
    Success,
    Error,
}

/// A transient message shown once (toast / flash).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }

    #[must_use]
    pub const fn is_error(&self) -> bool {
        matches!(self.level, NoticeLevel::Error)
    }
}

/// Why a request issued on behalf of a form failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestFailure {
    Unauthenticated,
    Forbidden,
    Invalid(FieldError),
    NotFound,
    Conflict,
    Internal,
}

/// The request a form wants issued.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission<D> {
    Create(D),
    Update { id: Uuid, draft: D },
}

impl<D> Submission<D> {
    #[must_use]
    pub const fn is_create(&self) -> bool {
        matches!(self, Self::Create(_))
    }
}

/// Why [`FormController::submit`] did not produce a request.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SubmitError {
    /// A request from this form is still in flight.
    #[error("a request is already in progress")]
    Busy,
    /// Local validation failed; nothing was sent.
    #[error("{0}")]
    Invalid(FieldError),
}

/// Why [`FormController::confirm_delete`] did not produce a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum DeleteError {
    #[error("a request is already in progress")]
    Busy,
    #[error("delete was not confirmed")]
    NotConfirmed,
    #[error("nothing to delete: the form is not editing an existing row")]
    NothingToDelete,
}

/// What the caller should do after a request settles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Refresh and go to `to`, showing `notice` there.
    Navigate { to: String, notice: Notice },
    /// Remain on the form, showing `notice`. Entered values are kept.
    Stay { notice: Notice },
}

impl Effect {
    #[must_use]
    pub const fn notice(&self) -> &Notice {
        match self {
            Self::Navigate { notice, .. } | Self::Stay { notice } => notice,
        }
    }
}

/// State machine for one create/edit form plus its delete confirmation.
#[derive(Debug, Clone)]
pub struct FormController<S> {
    scope: Option<StoreId>,
    existing: Option<Uuid>,
    values: S,
    state: FormState,
    field_error: Option<FieldError>,
    confirm_open: bool,
}

impl<S: FormSchema> FormController<S> {
    /// A blank form that will create a row.
    ///
    /// `scope` is the owning store; it is `None` only for store forms.
    #[must_use]
    pub const fn new(scope: Option<StoreId>, values: S) -> Self {
        Self {
            scope,
            existing: None,
            values,
            state: FormState::Idle,
            field_error: None,
            confirm_open: false,
        }
    }

    /// A form prefilled from an existing row that will update it.
    #[must_use]
    pub const fn edit(scope: Option<StoreId>, id: Uuid, values: S) -> Self {
        Self {
            scope,
            existing: Some(id),
            values,
            state: FormState::Idle,
            field_error: None,
            confirm_open: false,
        }
    }

    #[must_use]
    pub const fn state(&self) -> FormState {
        self.state
    }

    #[must_use]
    pub const fn values(&self) -> &S {
        &self.values
    }

    /// Replace the entered values. Ignored while a request is in flight.
    pub fn set_values(&mut self, values: S) {
        if self.state != FormState::Submitting {
            self.values = values;
        }
    }

    #[must_use]
    pub const fn field_error(&self) -> Option<&FieldError> {
        self.field_error.as_ref()
    }

    #[must_use]
    pub const fn is_loading(&self) -> bool {
        matches!(self.state, FormState::Submitting)
    }

    #[must_use]
    pub const fn is_edit(&self) -> bool {
        self.existing.is_some()
    }

    #[must_use]
    pub const fn confirm_open(&self) -> bool {
        self.confirm_open
    }

    /// Heading for the page, e.g. "Create billboard" / "Edit billboard".
    #[must_use]
    pub fn title(&self) -> String {
        let verb = if self.is_edit() { "Edit" } else { "Create" };
        format!("{verb} {}", S::RESOURCE.singular())
    }

    /// Label for the submit button.
    #[must_use]
    pub const fn action_label(&self) -> &'static str {
        if self.is_edit() { "Save changes" } else { "Create" }
    }

    /// Validate locally and, if valid, enter `Submitting`.
    ///
    /// # Errors
    ///
    /// Returns [`SubmitError::Busy`] while a request is in flight, or
    /// [`SubmitError::Invalid`] when a field fails validation (the form stays
    /// `Idle` with its values intact).
    pub fn submit(&mut self) -> Result<Submission<S::Draft>, SubmitError> {
        if self.state == FormState::Submitting {
            return Err(SubmitError::Busy);
        }
        match self.values.validate() {
            Ok(draft) => {
                self.field_error = None;
                self.state = FormState::Submitting;
                Ok(match self.existing {
                    Some(id) => Submission::Update { id, draft },
                    None => Submission::Create(draft),
                })
            }
            Err(err) => {
                self.field_error = Some(err.clone());
                self.state = FormState::Idle;
                Err(SubmitError::Invalid(err))
            }
        }
    }

    /// Settle a submission. `outcome` carries the id of the saved row.
    ///
    /// Returns `None` when no submission was in flight.
    pub fn complete(&mut self, outcome: Result<Uuid, RequestFailure>) -> Option<Effect> {
        if self.state != FormState::Submitting {
            return None;
        }
        match outcome {
            Ok(saved) => {
                self.state = FormState::Success;
                let verb = if self.is_edit() { "updated" } else { "created" };
                Some(Effect::Navigate {
                    to: self.list_path(saved),
                    notice: Notice::success(format!("{} {verb}.", S::RESOURCE.title())),
                })
            }
            Err(failure) => {
                self.state = FormState::Failed;
                let message = match failure {
                    RequestFailure::Invalid(err) => {
                        let message = err.message.clone();
                        self.field_error = Some(err);
                        message
                    }
                    RequestFailure::Unauthenticated => "Please sign in again.".to_owned(),
                    RequestFailure::Forbidden => "You do not have access to this store.".to_owned(),
                    RequestFailure::NotFound => {
                        format!("This {} no longer exists.", S::RESOURCE.singular())
                    }
                    RequestFailure::Conflict | RequestFailure::Internal => {
                        GENERIC_ERROR.to_owned()
                    }
                };
                Some(Effect::Stay {
                    notice: Notice::error(message),
                })
            }
        }
    }

    /// Open the delete confirmation. Only meaningful for existing rows.
    pub fn request_delete(&mut self) {
        if self.existing.is_some() && self.state != FormState::Submitting {
            self.confirm_open = true;
        }
    }

    /// Close the delete confirmation without deleting.
    pub fn cancel_delete(&mut self) {
        if self.state != FormState::Submitting {
            self.confirm_open = false;
        }
    }

    /// Issue the delete once the confirmation is open.
    ///
    /// # Errors
    ///
    /// Fails when the form is not editing a row, the confirmation was not
    /// opened, or a request is already in flight.
    pub fn confirm_delete(&mut self) -> Result<Uuid, DeleteError> {
        let id = self.existing.ok_or(DeleteError::NothingToDelete)?;
        if self.state == FormState::Submitting {
            return Err(DeleteError::Busy);
        }
        if !self.confirm_open {
            return Err(DeleteError::NotConfirmed);
        }
        self.state = FormState::Submitting;
        Ok(id)
    }

    /// Settle a delete. A `Conflict` names what still references the row.
    ///
    /// Returns `None` when no delete was in flight.
    pub fn complete_delete(&mut self, outcome: Result<(), RequestFailure>) -> Option<Effect> {
        if self.state != FormState::Submitting || !self.confirm_open {
            return None;
        }
        self.confirm_open = false;
        match outcome {
            Ok(()) => {
                self.state = FormState::Success;
                let to = match (S::RESOURCE, self.scope) {
                    (Resource::Store, _) | (_, None) => "/".to_owned(),
                    (kind, Some(store)) => format!("/{store}/{}", kind.path()),
                };
                Some(Effect::Navigate {
                    to,
                    notice: Notice::success(format!("{} deleted.", S::RESOURCE.title())),
                })
            }
            Err(failure) => {
                self.state = FormState::Failed;
                let message = match failure {
                    RequestFailure::Conflict => S::RESOURCE.still_referenced_message(),
                    RequestFailure::NotFound => {
                        format!("This {} no longer exists.", S::RESOURCE.singular())
                    }
                    _ => GENERIC_ERROR.to_owned(),
                };
                Some(Effect::Stay {
                    notice: Notice::error(message),
                })
            }
        }
    }

    fn list_path(&self, saved: Uuid) -> String {
        match (S::RESOURCE, self.scope) {
            (Resource::Store, _) => format!("/{saved}"),
            (kind, Some(store)) => format!("/{store}/{}", kind.path()),
            (_, None) => "/".to_owned(),
        }
    }
}

/// A typed `{id, label}` pair for select fields.
///
/// Select widgets render any entity through this projection, so they never
/// see the entity type itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectOption {
    pub id: Uuid,
    pub label: String,
}

impl SelectOption {
    /// Project a slice of entities into options.
    #[must_use]
    pub fn from_all<'a, T>(items: &'a [T]) -> Vec<Self>
    where
        Self: From<&'a T>,
    {
        items.iter().map(Self::from).collect()
    }
}

impl From<&Store> for SelectOption {
    fn from(store: &Store) -> Self {
        Self {
            id: store.id.as_uuid(),
            label: store.name.clone(),
        }
    }
}

impl From<&Billboard> for SelectOption {
    fn from(billboard: &Billboard) -> Self {
        Self {
            id: billboard.id.as_uuid(),
            label: billboard.label.clone(),
        }
    }
}

impl From<&Category> for SelectOption {
    fn from(category: &Category) -> Self {
        Self {
            id: category.id.as_uuid(),
            label: category.name.clone(),
        }
    }
}

impl From<&Size> for SelectOption {
    fn from(size: &Size) -> Self {
        Self {
            id: size.id.as_uuid(),
            label: format!("{} ({})", size.name, size.value),
        }
    }
}

impl From<&Color> for SelectOption {
    fn from(color: &Color) -> Self {
        Self {
            id: color.id.as_uuid(),
            label: color.name.clone(),
        }
    }
}

impl From<&Product> for SelectOption {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.as_uuid(),
            label: product.name.clone(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::validation::{BillboardInput, StoreInput};

    fn valid_billboard() -> BillboardInput {
        BillboardInput {
            label: "Summer".to_owned(),
            image_url: "https://cdn.example.com/summer.png".to_owned(),
        }
    }

    #[test]
    fn test_invalid_submit_keeps_values_and_stays_idle() {
        let store = StoreId::generate();
        let mut form = FormController::new(Some(store), BillboardInput::default());
        let err = form.submit().unwrap_err();
        assert!(matches!(err, SubmitError::Invalid(ref e) if e.field == "label"));
        assert_eq!(form.state(), FormState::Idle);
        assert_eq!(form.field_error().unwrap().field, "label");
        assert_eq!(form.values(), &BillboardInput::default());
    }

    #[test]
    fn test_submit_blocks_while_in_flight() {
        let mut form = FormController::new(Some(StoreId::generate()), valid_billboard());
        assert!(form.submit().unwrap().is_create());
        assert!(form.is_loading());
        assert_eq!(form.submit().unwrap_err(), SubmitError::Busy);
    }

    #[test]
    fn test_edit_submits_update() {
        let id = Uuid::new_v4();
        let mut form = FormController::edit(Some(StoreId::generate()), id, valid_billboard());
        match form.submit().unwrap() {
            Submission::Update { id: got, .. } => assert_eq!(got, id),
            Submission::Create(_) => panic!("expected update"),
        }
        assert_eq!(form.title(), "Edit billboard");
        assert_eq!(form.action_label(), "Save changes");
    }

    #[test]
    fn test_success_navigates_to_list_with_notice() {
        let store = StoreId::generate();
        let mut form = FormController::new(Some(store), valid_billboard());
        form.submit().unwrap();
        let effect = form.complete(Ok(Uuid::new_v4())).unwrap();
        assert_eq!(
            effect,
            Effect::Navigate {
                to: format!("/{store}/billboards"),
                notice: Notice::success("Billboard created."),
            }
        );
        assert_eq!(form.state(), FormState::Success);
    }

    #[test]
    fn test_failure_stays_and_allows_retry() {
        let mut form = FormController::new(Some(StoreId::generate()), valid_billboard());
        form.submit().unwrap();
        let effect = form.complete(Err(RequestFailure::Internal)).unwrap();
        assert_eq!(effect.notice(), &Notice::error(GENERIC_ERROR));
        assert_eq!(form.state(), FormState::Failed);
        assert_eq!(form.values(), &valid_billboard());
        assert!(form.submit().is_ok());
    }

    #[test]
    fn test_server_field_error_is_surfaced() {
        let mut form = FormController::new(Some(StoreId::generate()), valid_billboard());
        form.submit().unwrap();
        let effect = form
            .complete(Err(RequestFailure::Invalid(FieldError::new(
                "imageUrl",
                "Background image is required",
            ))))
            .unwrap();
        assert_eq!(effect.notice().message, "Background image is required");
        assert_eq!(form.field_error().unwrap().field, "imageUrl");
    }

    #[test]
    fn test_complete_without_submit_is_ignored() {
        let mut form = FormController::new(Some(StoreId::generate()), valid_billboard());
        assert!(form.complete(Ok(Uuid::new_v4())).is_none());
    }

    #[test]
    fn test_delete_requires_confirmation() {
        let mut form =
            FormController::edit(Some(StoreId::generate()), Uuid::new_v4(), valid_billboard());
        assert_eq!(form.confirm_delete(), Err(DeleteError::NotConfirmed));
        form.request_delete();
        assert!(form.confirm_open());
        form.cancel_delete();
        assert!(!form.confirm_open());
    }

    #[test]
    fn test_delete_on_new_form_is_rejected() {
        let mut form = FormController::new(Some(StoreId::generate()), valid_billboard());
        form.request_delete();
        assert!(!form.confirm_open());
        assert_eq!(form.confirm_delete(), Err(DeleteError::NothingToDelete));
    }

    #[test]
    fn test_delete_conflict_names_dependents() {
        let id = Uuid::new_v4();
        let mut form = FormController::edit(Some(StoreId::generate()), id, valid_billboard());
        form.request_delete();
        assert_eq!(form.confirm_delete(), Ok(id));
        assert_eq!(form.confirm_delete(), Err(DeleteError::Busy));
        let effect = form.complete_delete(Err(RequestFailure::Conflict)).unwrap();
        assert_eq!(
            effect.notice().message,
            "Make sure you removed all categories using this billboard first."
        );
        assert!(!form.confirm_open());
        assert_eq!(form.state(), FormState::Failed);
    }

    #[test]
    fn test_delete_success_returns_to_list() {
        let store = StoreId::generate();
        let mut form = FormController::edit(Some(store), Uuid::new_v4(), valid_billboard());
        form.request_delete();
        form.confirm_delete().unwrap();
        let effect = form.complete_delete(Ok(())).unwrap();
        assert_eq!(
            effect,
            Effect::Navigate {
                to: format!("/{store}/billboards"),
                notice: Notice::success("Billboard deleted."),
            }
        );
    }

    #[test]
    fn test_store_create_navigates_to_new_store() {
        let mut form = FormController::new(
            None,
            StoreInput {
                name: "Main".to_owned(),
            },
        );
        form.submit().unwrap();
        let saved = Uuid::new_v4();
        let effect = form.complete(Ok(saved)).unwrap();
        assert!(matches!(effect, Effect::Navigate { ref to, .. } if *to == format!("/{saved}")));
    }

    #[test]
    fn test_select_options_use_display_label() {
        let now = chrono::Utc::now();
        let billboard = Billboard {
            id: crate::BillboardId::generate(),
            store_id: StoreId::generate(),
            label: "Summer".to_owned(),
            image_url: "https://x".to_owned(),
            created_at: now,
            updated_at: now,
        };
        let options = SelectOption::from_all(std::slice::from_ref(&billboard));
        assert_eq!(options[0].label, "Summer");
        assert_eq!(options[0].id, billboard.id.as_uuid());
    }
}
