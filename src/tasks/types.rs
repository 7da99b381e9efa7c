//! Task domain types. `Task` mirrors a row of the `tasks` table.

use serde::{Deserialize, Serialize, Serializer};
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{OffsetDateTime, UtcOffset};
use uuid::Uuid;

// =============================================================================
// ENUMS
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    #[default]
    Pending,
    InProgress,
    Completed,
}

impl TaskStatus {
    pub const ALL: [Self; 3] = [Self::Pending, Self::InProgress, Self::Completed];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
        }
    }

    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|v| v.as_str() == s)
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::InProgress => "In Progress",
            Self::Completed => "Completed",
        }
    }

    /// Status after a completion toggle: completed tasks reopen as pending,
    /// anything else completes.
    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            Self::Completed => Self::Pending,
            Self::Pending | Self::InProgress => Self::Completed,
        }
    }

    #[must_use]
    pub fn color_class(self) -> &'static str {
        match self {
            Self::Pending => "status--pending",
            Self::InProgress => "status--in-progress",
            Self::Completed => "status--completed",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskPriority {
    Low,
    #[default]
    Medium,
    High,
    Urgent,
}

impl TaskPriority {
    pub const ALL: [Self; 4] = [Self::Low, Self::Medium, Self::High, Self::Urgent];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Urgent => "urgent",
        }
    }

    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|v| v.as_str() == s)
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
            Self::Urgent => "Urgent",
        }
    }

    #[must_use]
    pub fn color_class(self) -> &'static str {
        match self {
            Self::Low => "priority--low",
            Self::Medium => "priority--medium",
            Self::High => "priority--high",
            Self::Urgent => "priority--urgent",
        }
    }
}

// =============================================================================
// ROWS
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: Uuid,
    pub user_id: Uuid,
    pub account_id: Uuid,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub due_date: Option<OffsetDateTime>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub updated_at: Option<OffsetDateTime>,
}

impl Task {
    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.status == TaskStatus::Completed
    }

    /// Due date formatted for the list, e.g. `Mar 7, 2025`.
    #[must_use]
    pub fn due_label(&self) -> Option<String> {
        self.due_date.and_then(|d| format_due_label(d).ok())
    }

    /// Due date as the `YYYY-MM-DD` value of a date input.
    #[must_use]
    pub fn due_input_value(&self) -> String {
        self.due_date.and_then(|d| format_date_input(d).ok()).unwrap_or_default()
    }

    /// Full stored due timestamp (RFC 3339), empty when unset.
    #[must_use]
    pub fn due_at_value(&self) -> String {
        self.due_date.and_then(|d| d.format(&Rfc3339).ok()).unwrap_or_default()
    }
}

/// Row sent on insert. Status is left to the column default (`pending`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskInsert {
    pub title: String,
    pub description: Option<String>,
    pub priority: TaskPriority,
    #[serde(with = "time::serde::rfc3339::option")]
    pub due_date: Option<OffsetDateTime>,
    pub user_id: Uuid,
    pub account_id: Uuid,
}

/// Partial update. Outer `None` leaves a column untouched; `Some(None)` on a
/// nullable column writes `null`.
#[allow(clippy::option_option)]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TaskUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<TaskPriority>,
    #[serde(skip_serializing_if = "Option::is_none", serialize_with = "serialize_nullable_datetime")]
    pub due_date: Option<Option<OffsetDateTime>>,
}

impl TaskUpdate {
    #[must_use]
    pub fn status(status: TaskStatus) -> Self {
        Self { status: Some(status), ..Self::default() }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[allow(clippy::option_option, clippy::ref_option)]
fn serialize_nullable_datetime<S: Serializer>(
    value: &Option<Option<OffsetDateTime>>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match value {
        Some(Some(dt)) => time::serde::rfc3339::serialize(dt, serializer),
        _ => serializer.serialize_none(),
    }
}

// =============================================================================
// INPUTS
// =============================================================================

/// Unvalidated create request, as submitted by a form or API client.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreateTaskInput {
    pub title: String,
    pub description: Option<String>,
    pub priority: Option<TaskPriority>,
    pub due_date: Option<OffsetDateTime>,
}

/// Unvalidated update request.
#[allow(clippy::option_option)]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateTaskInput {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
    pub due_date: Option<Option<OffsetDateTime>>,
}

/// Validated create request; ownership is added by the service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    pub title: String,
    pub description: Option<String>,
    pub priority: TaskPriority,
    pub due_date: Option<OffsetDateTime>,
}

impl From<NewTask> for CreateTaskInput {
    fn from(task: NewTask) -> Self {
        Self { title: task.title, description: task.description, priority: Some(task.priority), due_date: task.due_date }
    }
}

impl From<TaskUpdate> for UpdateTaskInput {
    fn from(update: TaskUpdate) -> Self {
        Self {
            title: update.title,
            description: update.description,
            status: update.status,
            priority: update.priority,
            due_date: update.due_date,
        }
    }
}

// =============================================================================
// FILTERS + SORT
// =============================================================================

/// One enum value or `all`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Choice<T> {
    #[default]
    All,
    Only(T),
}

impl<T: Copy> Choice<T> {
    #[must_use]
    pub fn value(self) -> Option<T> {
        match self {
            Self::All => None,
            Self::Only(v) => Some(v),
        }
    }
}

pub type StatusFilter = Choice<TaskStatus>;
pub type PriorityFilter = Choice<TaskPriority>;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct TaskFilters {
    pub status: StatusFilter,
    pub priority: PriorityFilter,
    /// Trimmed search text; empty means no search.
    pub search: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TaskSortField {
    #[default]
    CreatedAt,
    DueDate,
    Priority,
    Title,
}

impl TaskSortField {
    pub const ALL: [Self; 4] = [Self::CreatedAt, Self::DueDate, Self::Priority, Self::Title];

    #[must_use]
    pub fn column(self) -> &'static str {
        match self {
            Self::CreatedAt => "created_at",
            Self::DueDate => "due_date",
            Self::Priority => "priority",
            Self::Title => "title",
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::CreatedAt => "Created",
            Self::DueDate => "Due date",
            Self::Priority => "Priority",
            Self::Title => "Title",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl SortDirection {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct TaskSort {
    pub field: TaskSortField,
    pub direction: SortDirection,
}

impl TaskSort {
    /// Wire form used in query strings: `<column>.<asc|desc>`.
    #[must_use]
    pub fn key(self) -> String {
        format!("{}.{}", self.field.column(), self.direction.as_str())
    }

    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        let (column, direction) = raw.split_once('.')?;
        let field = TaskSortField::ALL.into_iter().find(|f| f.column() == column)?;
        let direction = match direction {
            "asc" => SortDirection::Asc,
            "desc" => SortDirection::Desc,
            _ => return None,
        };
        Some(Self { field, direction })
    }

    /// Every selectable sort, for the filter bar.
    #[must_use]
    pub fn options() -> Vec<(Self, String)> {
        TaskSortField::ALL
            .into_iter()
            .flat_map(|field| {
                [SortDirection::Desc, SortDirection::Asc].into_iter().map(move |direction| {
                    let arrow = match direction {
                        SortDirection::Asc => "↑",
                        SortDirection::Desc => "↓",
                    };
                    (Self { field, direction }, format!("{} {arrow}", field.label()))
                })
            })
            .collect()
    }
}

// =============================================================================
// DATES
// =============================================================================

fn format_due_label(date: OffsetDateTime) -> Result<String, time::error::Format> {
    date.format(format_description!("[month repr:short] [day padding:none], [year]"))
}

fn format_date_input(date: OffsetDateTime) -> Result<String, time::error::Format> {
    date.to_offset(UtcOffset::UTC).format(format_description!("[year]-[month]-[day]"))
}

#[cfg(test)]
#[path = "types_test.rs"]
mod tests;
