//! JSON task API — same service as the pages, bearer token or cookie auth.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde::{Deserialize, Deserializer, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use super::session::ApiSession;
use crate::error::ErrorCode;
use crate::state::AppState;
use crate::tasks::schema::{FieldError, FilterParams, ValidationErrors, parse_due_date, parse_filters};
use crate::tasks::service::TaskError;
use crate::tasks::types::{CreateTaskInput, Task, TaskPriority, TaskStatus, UpdateTaskInput};

// =============================================================================
// ERRORS
// =============================================================================

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: &'static str,
    pub message: String,
    pub retryable: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<FieldError>,
}

pub(crate) fn task_error_to_status(err: &TaskError) -> StatusCode {
    match err {
        TaskError::Unauthenticated => StatusCode::UNAUTHORIZED,
        TaskError::NotFound(_) => StatusCode::NOT_FOUND,
        TaskError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        TaskError::Backend(_) => StatusCode::BAD_GATEWAY,
    }
}

fn error_response(err: &TaskError) -> Response {
    let status = task_error_to_status(err);
    if status == StatusCode::BAD_GATEWAY {
        tracing::error!(error = %err, "task api backend failure");
    }
    let errors = match err {
        TaskError::Validation(v) => v.errors.clone(),
        _ => Vec::new(),
    };
    let body = ErrorBody { code: err.error_code(), message: err.to_string(), retryable: err.retryable(), errors };
    (status, Json(body)).into_response()
}

fn bad_request(errors: ValidationErrors) -> Response {
    let body = ErrorBody { code: "E_BAD_REQUEST", message: errors.to_string(), retryable: false, errors: errors.errors };
    (StatusCode::BAD_REQUEST, Json(body)).into_response()
}

// =============================================================================
// BODIES
// =============================================================================

/// Distinguish an absent field (`None`) from an explicit `null` (`Some(None)`).
#[allow(clippy::option_option)]
fn nullable<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[derive(Debug, Deserialize)]
pub struct CreateTaskBody {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub priority: Option<String>,
    /// `YYYY-MM-DD` or RFC 3339.
    #[serde(default)]
    pub due_date: Option<String>,
}

#[allow(clippy::option_option)]
#[derive(Debug, Default, Deserialize)]
pub struct UpdateTaskBody {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub description: Option<Option<String>>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub priority: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub due_date: Option<Option<String>>,
}

fn due_date(raw: Option<&str>, errors: &mut ValidationErrors) -> Option<OffsetDateTime> {
    match parse_due_date(raw.unwrap_or_default()) {
        Ok(date) => date,
        Err(message) => {
            errors.add("due_date", message);
            None
        }
    }
}

fn priority(raw: Option<&str>, errors: &mut ValidationErrors) -> Option<TaskPriority> {
    let raw = raw?;
    let priority = TaskPriority::parse(raw);
    if priority.is_none() {
        errors.add("priority", "Select a valid priority");
    }
    priority
}

fn status(raw: Option<&str>, errors: &mut ValidationErrors) -> Option<TaskStatus> {
    let raw = raw?;
    let status = TaskStatus::parse(raw);
    if status.is_none() {
        errors.add("status", "Select a valid status");
    }
    status
}

impl CreateTaskBody {
    fn into_input(self) -> Result<CreateTaskInput, ValidationErrors> {
        let mut errors = ValidationErrors::default();
        let priority = priority(self.priority.as_deref(), &mut errors);
        let due_date = due_date(self.due_date.as_deref(), &mut errors);
        let input = CreateTaskInput { title: self.title, description: self.description, priority, due_date };
        if errors.is_empty() { Ok(input) } else { Err(errors) }
    }
}

impl UpdateTaskBody {
    fn into_input(self) -> Result<UpdateTaskInput, ValidationErrors> {
        let mut errors = ValidationErrors::default();
        let status = status(self.status.as_deref(), &mut errors);
        let priority = priority(self.priority.as_deref(), &mut errors);
        let due_date = self.due_date.map(|raw| due_date(raw.as_deref(), &mut errors));
        let input = UpdateTaskInput {
            title: self.title,
            description: self.description,
            status,
            priority,
            due_date,
        };
        if errors.is_empty() { Ok(input) } else { Err(errors) }
    }
}

// =============================================================================
// HANDLERS
// =============================================================================

/// `GET /api/tasks` — filtered, sorted list.
pub async fn list_tasks(
    State(state): State<AppState>,
    ApiSession(session): ApiSession,
    Query(params): Query<FilterParams>,
) -> Response {
    let (filters, sort) = match parse_filters(&params) {
        Ok(parsed) => parsed,
        Err(errors) => return bad_request(errors),
    };
    match state.tasks.list_tasks(&session.token, &filters, sort).await {
        Ok(tasks) => Json(tasks).into_response(),
        Err(e) => error_response(&e),
    }
}

/// `POST /api/tasks` — create.
pub async fn create_task(
    State(state): State<AppState>,
    ApiSession(session): ApiSession,
    Json(body): Json<CreateTaskBody>,
) -> Response {
    let input = match body.into_input() {
        Ok(input) => input,
        Err(errors) => return bad_request(errors),
    };
    match state.tasks.create_task(&session.token, input).await {
        Ok(task) => (StatusCode::CREATED, Json(task)).into_response(),
        Err(e) => error_response(&e),
    }
}

/// `GET /api/tasks/{id}`.
pub async fn get_task(State(state): State<AppState>, ApiSession(session): ApiSession, Path(id): Path<Uuid>) -> Response {
    respond(state.tasks.get_task(&session.token, id).await)
}

/// `PATCH /api/tasks/{id}` — partial update; `null` clears nullable fields.
pub async fn update_task(
    State(state): State<AppState>,
    ApiSession(session): ApiSession,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateTaskBody>,
) -> Response {
    let input = match body.into_input() {
        Ok(input) => input,
        Err(errors) => return bad_request(errors),
    };
    respond(state.tasks.update_task(&session.token, id, input).await)
}

/// `DELETE /api/tasks/{id}`.
pub async fn delete_task(
    State(state): State<AppState>,
    ApiSession(session): ApiSession,
    Path(id): Path<Uuid>,
) -> Response {
    match state.tasks.delete_task(&session.token, id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => error_response(&e),
    }
}

/// `POST /api/tasks/{id}/toggle` — flip completion based on the stored status.
pub async fn toggle_task(
    State(state): State<AppState>,
    ApiSession(session): ApiSession,
    Path(id): Path<Uuid>,
) -> Response {
    let current = match state.tasks.get_task(&session.token, id).await {
        Ok(task) => task.status,
        Err(e) => return error_response(&e),
    };
    respond(state.tasks.toggle_status(&session.token, id, current).await)
}

fn respond(result: Result<Task, TaskError>) -> Response {
    match result {
        Ok(task) => Json(task).into_response(),
        Err(e) => error_response(&e),
    }
}
