//! Validation for task inputs, form submissions and list filters.
//!
//! DESIGN
//! ======
//! Every check runs and errors are collected per field, so a re-rendered
//! form can show each message under its own input. Validated output is a
//! distinct type (`NewTask`, `TaskUpdate`, `TaskFilters`) so nothing
//! unvalidated reaches the store.

use serde::{Deserialize, Serialize};
use time::macros::format_description;
use time::format_description::well_known::Rfc3339;
use time::{Date, OffsetDateTime, UtcOffset};

use super::types::{
    Choice, CreateTaskInput, NewTask, TaskFilters, TaskPriority, TaskSort, TaskStatus, TaskUpdate, UpdateTaskInput,
};

pub const TITLE_MAX_CHARS: usize = 255;
pub const DESCRIPTION_MAX_CHARS: usize = 5000;

pub const TITLE_REQUIRED: &str = "Title is required";
pub const TITLE_TOO_LONG: &str = "Title is too long";
pub const DESCRIPTION_TOO_LONG: &str = "Description is too long";
pub const INVALID_DATE: &str = "Enter a valid date";

// =============================================================================
// ERRORS
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

/// Field-level validation failures.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, thiserror::Error)]
#[error("validation failed: {}", summarize(.errors))]
pub struct ValidationErrors {
    pub errors: Vec<FieldError>,
}

impl ValidationErrors {
    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.errors.push(FieldError { field, message: message.into() });
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// First message recorded for `field`.
    #[must_use]
    pub fn message_for(&self, field: &str) -> Option<&str> {
        self.errors.iter().find(|e| e.field == field).map(|e| e.message.as_str())
    }

    fn into_result<T>(self, value: T) -> Result<T, Self> {
        if self.is_empty() { Ok(value) } else { Err(self) }
    }

    fn merge(&mut self, other: Self) {
        self.errors.extend(other.errors);
    }
}

fn summarize(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| format!("{}: {}", e.field, e.message))
        .collect::<Vec<_>>()
        .join("; ")
}

// =============================================================================
// FIELD RULES
// =============================================================================

fn check_title(raw: &str, errors: &mut ValidationErrors) -> String {
    let title = raw.trim();
    if title.is_empty() {
        errors.add("title", TITLE_REQUIRED);
    } else if title.chars().count() > TITLE_MAX_CHARS {
        errors.add("title", TITLE_TOO_LONG);
    }
    title.to_owned()
}

/// Blank descriptions are stored as `null`.
fn check_description(raw: Option<String>, errors: &mut ValidationErrors) -> Option<String> {
    let description = raw.filter(|d| !d.trim().is_empty())?;
    if description.chars().count() > DESCRIPTION_MAX_CHARS {
        errors.add("description", DESCRIPTION_TOO_LONG);
    }
    Some(description)
}

/// Parse a due date from a date input (`YYYY-MM-DD`, read as midnight UTC)
/// or an RFC 3339 timestamp. Blank means no due date.
///
/// # Errors
///
/// Returns a user-facing message when the value is neither format.
pub fn parse_due_date(raw: &str) -> Result<Option<OffsetDateTime>, &'static str> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    if let Ok(date) = Date::parse(raw, format_description!("[year]-[month]-[day]")) {
        return Ok(Some(date.midnight().assume_utc()));
    }
    OffsetDateTime::parse(raw, &Rfc3339)
        .map(Some)
        .map_err(|_| INVALID_DATE)
}

// =============================================================================
// CREATE / UPDATE
// =============================================================================

/// Validate a create request. Priority defaults to `medium`.
///
/// # Errors
///
/// Returns every field that failed validation.
pub fn validate_create(input: CreateTaskInput) -> Result<NewTask, ValidationErrors> {
    let mut errors = ValidationErrors::default();
    let title = check_title(&input.title, &mut errors);
    let description = check_description(input.description, &mut errors);

    errors.into_result(NewTask {
        title,
        description,
        priority: input.priority.unwrap_or_default(),
        due_date: input.due_date,
    })
}

/// Validate a partial update. Absent fields stay absent.
///
/// # Errors
///
/// Returns every field that failed validation.
pub fn validate_update(input: UpdateTaskInput) -> Result<TaskUpdate, ValidationErrors> {
    let mut errors = ValidationErrors::default();
    let title = input.title.map(|t| check_title(&t, &mut errors));
    let description = input.description.map(|d| check_description(d, &mut errors));

    errors.into_result(TaskUpdate {
        title,
        description,
        status: input.status,
        priority: input.priority,
        due_date: input.due_date,
    })
}

// =============================================================================
// HTML FORM
// =============================================================================

/// Raw fields posted by the task form. Every value arrives as a string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct TaskFormFields {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub priority: String,
    #[serde(default)]
    pub due_date: String,
    /// Stored due timestamp (RFC 3339), carried by the edit form so an
    /// unchanged day keeps its time of day.
    #[serde(default)]
    pub due_at: String,
    /// Only present on the edit form.
    #[serde(default)]
    pub status: Option<String>,
}

impl TaskFormFields {
    fn decode_priority(&self, errors: &mut ValidationErrors) -> Option<TaskPriority> {
        if self.priority.is_empty() {
            return None;
        }
        let parsed = TaskPriority::parse(&self.priority);
        if parsed.is_none() {
            errors.add("priority", "Select a valid priority");
        }
        parsed
    }

    fn decode_status(&self, errors: &mut ValidationErrors) -> Option<TaskStatus> {
        let raw = self.status.as_deref().filter(|s| !s.is_empty())?;
        let parsed = TaskStatus::parse(raw);
        if parsed.is_none() {
            errors.add("status", "Select a valid status");
        }
        parsed
    }

    /// True when the submitted date is the same day as the stored due date.
    fn keeps_stored_due_day(&self, submitted: Option<OffsetDateTime>) -> bool {
        let Ok(stored) = OffsetDateTime::parse(self.due_at.trim(), &Rfc3339) else {
            return false;
        };
        submitted.is_some_and(|d| d.date() == stored.to_offset(UtcOffset::UTC).date())
    }

    fn decode_due_date(&self, errors: &mut ValidationErrors) -> Option<OffsetDateTime> {
        match parse_due_date(&self.due_date) {
            Ok(date) => date,
            Err(message) => {
                errors.add("due_date", message);
                None
            }
        }
    }
}

/// Decode and validate the create form.
///
/// # Errors
///
/// Returns every field that failed decoding or validation.
pub fn parse_create_form(fields: &TaskFormFields) -> Result<NewTask, ValidationErrors> {
    let mut errors = ValidationErrors::default();
    let input = CreateTaskInput {
        title: fields.title.clone(),
        description: Some(fields.description.clone()),
        priority: fields.decode_priority(&mut errors),
        due_date: fields.decode_due_date(&mut errors),
    };

    match validate_create(input) {
        Ok(task) => errors.into_result(task),
        Err(more) => {
            errors.merge(more);
            Err(errors)
        }
    }
}

/// Decode and validate the edit form. The edit form always submits every
/// field, so the update writes all of them, except a due date left on its
/// stored day, which stays untouched.
///
/// # Errors
///
/// Returns every field that failed decoding or validation.
pub fn parse_update_form(fields: &TaskFormFields) -> Result<TaskUpdate, ValidationErrors> {
    let mut errors = ValidationErrors::default();
    let due_date = fields.decode_due_date(&mut errors);
    let input = UpdateTaskInput {
        title: Some(fields.title.clone()),
        description: Some(Some(fields.description.clone())),
        status: fields.decode_status(&mut errors),
        priority: fields.decode_priority(&mut errors),
        due_date: (!fields.keeps_stored_due_day(due_date)).then_some(due_date),
    };

    match validate_update(input) {
        Ok(update) => errors.into_result(update),
        Err(more) => {
            errors.merge(more);
            Err(errors)
        }
    }
}

// =============================================================================
// FILTERS
// =============================================================================

/// Raw list filters from a query string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct FilterParams {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub priority: Option<String>,
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub sort: Option<String>,
}

fn parse_choice<T>(raw: Option<&str>, parse: fn(&str) -> Option<T>) -> Option<Choice<T>> {
    match raw.map(str::trim) {
        None | Some("" | "all") => Some(Choice::All),
        Some(value) => parse(value).map(Choice::Only),
    }
}

/// Compose list filters. Status and priority default to `all`; search is
/// trimmed and empty search means no search.
///
/// # Errors
///
/// Returns an error for unknown status, priority or sort values.
pub fn parse_filters(params: &FilterParams) -> Result<(TaskFilters, TaskSort), ValidationErrors> {
    let mut errors = ValidationErrors::default();

    let status = parse_choice(params.status.as_deref(), TaskStatus::parse).unwrap_or_else(|| {
        errors.add("status", "Unknown status filter");
        Choice::All
    });
    let priority = parse_choice(params.priority.as_deref(), TaskPriority::parse).unwrap_or_else(|| {
        errors.add("priority", "Unknown priority filter");
        Choice::All
    });
    let sort = match params.sort.as_deref().map(str::trim) {
        None | Some("") => TaskSort::default(),
        Some(raw) => TaskSort::parse(raw).unwrap_or_else(|| {
            errors.add("sort", "Unknown sort");
            TaskSort::default()
        }),
    };
    let search = params.search.as_deref().unwrap_or_default().trim().to_owned();

    errors.into_result((TaskFilters { status, priority, search }, sort))
}

#[cfg(test)]
#[path = "schema_test.rs"]
mod tests;
