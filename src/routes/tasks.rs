//! Tasks page routes — the list page and its form posts.
//!
//! DESIGN
//! ======
//! Every mutation is a POST that answers `303 See Other` back to the list
//! with the caller's filters and a notice key, so a reload never resubmits.
//! The service has invalidated the cached lists by then, so the redirected
//! GET refetches. Validation failures are the exception: they re-render the
//! page with the modal open and answer 422.

use axum::extract::{Form, Path, Query, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Redirect, Response};
use serde::Deserialize;
use uuid::Uuid;

use super::session::{PageSession, Session, sign_in_redirect};
use crate::state::AppState;
use crate::tasks::schema::{FilterParams, TaskFormFields, ValidationErrors, parse_create_form, parse_filters, parse_update_form};
use crate::tasks::service::TaskError;
use crate::tasks::types::TaskStatus;
use crate::views::{ListState, Notice};
use crate::views::task_form::FormMode;
use crate::views::tasks_page::{Modal, TaskLoad, TasksPageModel, render_tasks_page};

// =============================================================================
// PARAMS
// =============================================================================

#[derive(Debug, Default, Deserialize)]
pub struct PageParams {
    #[serde(flatten)]
    pub filters: FilterParams,
    #[serde(default)]
    pub form: Option<String>,
    #[serde(default)]
    pub edit: Option<String>,
    #[serde(default)]
    pub confirm_delete: Option<String>,
    #[serde(default)]
    pub notice: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ToggleForm {
    pub status: String,
}

/// Filters from the URL. Unknown values fall back to the default view.
fn list_state(params: &FilterParams) -> ListState {
    match parse_filters(params) {
        Ok((filters, sort)) => ListState::new(filters, sort),
        Err(errors) => {
            tracing::debug!(%errors, "ignoring invalid list filters");
            ListState::default()
        }
    }
}

fn parse_id(raw: Option<&str>) -> Option<Uuid> {
    raw.and_then(|s| Uuid::parse_str(s.trim()).ok())
}

// =============================================================================
// RENDERING
// =============================================================================

async fn load(state: &AppState, session: &Session, list: &ListState) -> Result<TaskLoad, TaskError> {
    match state.tasks.list_tasks(&session.token, &list.filters, list.sort).await {
        Ok(tasks) => Ok(TaskLoad::Loaded(tasks)),
        Err(TaskError::Unauthenticated) => Err(TaskError::Unauthenticated),
        Err(e) => {
            tracing::error!(user_id = %session.user.id, error = %e, "failed to load tasks");
            Ok(TaskLoad::Failed)
        }
    }
}

async fn render_page(
    state: &AppState,
    session: &Session,
    list: ListState,
    notice: Option<Notice>,
    modal: Option<Modal>,
    status: StatusCode,
) -> Response {
    let load = match load(state, session, &list).await {
        Ok(load) => load,
        Err(_) => return sign_in_redirect(&list.list_url(&[]), state.cookie_secure),
    };
    let model = TasksPageModel { state: list, load, notice, modal, user_email: session.user.email.clone() };
    (status, Html(render_tasks_page(model))).into_response()
}

/// Redirect back to the list after a mutation.
fn back_to_list(list: &ListState, notice: Notice) -> Response {
    Redirect::to(&list.list_url(&[("notice", notice.key())])).into_response()
}

/// Outcome of a failed mutation: sign-in for a dead session, otherwise back
/// to the list with a failure notice.
fn mutation_failed(state: &AppState, list: &ListState, err: &TaskError, notice: Notice) -> Response {
    if matches!(err, TaskError::Unauthenticated) {
        return sign_in_redirect(&list.list_url(&[]), state.cookie_secure);
    }
    tracing::error!(error = %err, notice = notice.key(), "task mutation failed");
    back_to_list(list, notice)
}

async fn invalid_form(
    state: &AppState,
    session: &Session,
    list: ListState,
    mode: FormMode,
    values: TaskFormFields,
    errors: ValidationErrors,
) -> Response {
    let modal = Modal::Form { mode, values, errors };
    render_page(state, session, list, None, Some(modal), StatusCode::UNPROCESSABLE_ENTITY).await
}

// =============================================================================
// HANDLERS
// =============================================================================

/// `GET /home/tasks` — the list, with `?form=new`, `?edit=<id>` or
/// `?confirm_delete=<id>` opening a modal on top.
pub async fn tasks_page(
    State(state): State<AppState>,
    PageSession(session): PageSession,
    Query(params): Query<PageParams>,
) -> Response {
    let list = list_state(&params.filters);
    let notice = params.notice.as_deref().and_then(Notice::parse);

    let modal = if params.form.as_deref() == Some("new") {
        Some(Modal::new_task())
    } else if let Some(id) = parse_id(params.edit.as_deref()) {
        match state.tasks.get_task(&session.token, id).await {
            Ok(task) => Some(Modal::edit_task(&task)),
            Err(TaskError::Unauthenticated) => return sign_in_redirect(&list.list_url(&[]), state.cookie_secure),
            Err(e) => {
                tracing::warn!(task_id = %id, error = %e, "edit target unavailable");
                None
            }
        }
    } else {
        parse_id(params.confirm_delete.as_deref()).map(Modal::ConfirmDelete)
    };

    render_page(&state, &session, list, notice, modal, StatusCode::OK).await
}

/// `POST /home/tasks` — create from the modal form.
pub async fn create_task(
    State(state): State<AppState>,
    PageSession(session): PageSession,
    Query(filters): Query<FilterParams>,
    Form(fields): Form<TaskFormFields>,
) -> Response {
    let list = list_state(&filters);
    let new_task = match parse_create_form(&fields) {
        Ok(task) => task,
        Err(errors) => return invalid_form(&state, &session, list, FormMode::Create, fields, errors).await,
    };

    match state.tasks.create_task(&session.token, new_task.into()).await {
        Ok(_) => back_to_list(&list, Notice::Created),
        Err(TaskError::Validation(errors)) => invalid_form(&state, &session, list, FormMode::Create, fields, errors).await,
        Err(e) => mutation_failed(&state, &list, &e, Notice::CreateFailed),
    }
}

/// `POST /home/tasks/{id}` — save the edit form.
pub async fn update_task(
    State(state): State<AppState>,
    PageSession(session): PageSession,
    Path(id): Path<Uuid>,
    Query(filters): Query<FilterParams>,
    Form(fields): Form<TaskFormFields>,
) -> Response {
    let list = list_state(&filters);
    let mode = FormMode::Edit(id);
    let update = match parse_update_form(&fields) {
        Ok(update) => update,
        Err(errors) => return invalid_form(&state, &session, list, mode, fields, errors).await,
    };

    match state.tasks.update_task(&session.token, id, update.into()).await {
        Ok(_) => back_to_list(&list, Notice::Updated),
        Err(TaskError::Validation(errors)) => invalid_form(&state, &session, list, mode, fields, errors).await,
        Err(e) => mutation_failed(&state, &list, &e, Notice::UpdateFailed),
    }
}

/// `POST /home/tasks/{id}/toggle` — flip completion. The form carries the
/// status the card was rendered with.
pub async fn toggle_task(
    State(state): State<AppState>,
    PageSession(session): PageSession,
    Path(id): Path<Uuid>,
    Query(filters): Query<FilterParams>,
    Form(form): Form<ToggleForm>,
) -> Response {
    let list = list_state(&filters);
    let Some(current) = TaskStatus::parse(&form.status) else {
        return (StatusCode::BAD_REQUEST, "unknown status").into_response();
    };

    match state.tasks.toggle_status(&session.token, id, current).await {
        Ok(task) if task.is_completed() => back_to_list(&list, Notice::Completed),
        Ok(_) => back_to_list(&list, Notice::Reopened),
        Err(e) => mutation_failed(&state, &list, &e, Notice::UpdateFailed),
    }
}

/// `POST /home/tasks/{id}/delete` — confirmed delete.
pub async fn delete_task(
    State(state): State<AppState>,
    PageSession(session): PageSession,
    Path(id): Path<Uuid>,
    Query(filters): Query<FilterParams>,
) -> Response {
    let list = list_state(&filters);
    match state.tasks.delete_task(&session.token, id).await {
        Ok(()) => back_to_list(&list, Notice::Deleted),
        Err(e) => mutation_failed(&state, &list, &e, Notice::DeleteFailed),
    }
}

#[cfg(test)]
#[path = "tasks_test.rs"]
mod tests;
