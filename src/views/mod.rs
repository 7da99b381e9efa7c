//! Server-rendered HTML views.
//!
//! ARCHITECTURE
//! ============
//! Leptos components rendered to strings on the server; nothing hydrates.
//! Every interaction is a plain link or form: modals are query parameters on
//! the list page, mutations are POST forms that redirect back. The only
//! script is the filter-bar debounce in `assets/tasks.js`.

pub mod delete_dialog;
pub mod filter_bar;
pub mod sign_in;
pub mod task_form;
pub mod task_list;
pub mod tasks_page;

use leptos::prelude::*;

use crate::tasks::types::{Choice, TaskFilters, TaskSort};

pub const TASKS_PATH: &str = "/home/tasks";

// =============================================================================
// DOCUMENT
// =============================================================================

/// Render a full HTML document. `body` runs inside a fresh reactive owner.
pub fn render_document<F, V>(title: &str, body: F) -> String
where
    F: FnOnce() -> V,
    V: IntoView + 'static,
{
    let title = format!("{title} · Taskdesk");
    let owner = Owner::new();
    let html = owner.with(move || {
        view! {
            <html lang="en">
                <head>
                    <meta charset="utf-8"/>
                    <meta name="viewport" content="width=device-width, initial-scale=1"/>
                    <title>{title}</title>
                    <link rel="stylesheet" href="/assets/tasks.css"/>
                    <script src="/assets/tasks.js" defer="defer"></script>
                </head>
                <body>{body()}</body>
            </html>
        }
        .to_html()
    });
    format!("<!DOCTYPE html>{html}")
}

// =============================================================================
// LIST STATE
// =============================================================================

/// Filters and sort of the list page as carried in its URL. Every link and
/// form action built from it keeps the user's current view.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListState {
    pub filters: TaskFilters,
    pub sort: TaskSort,
}

impl ListState {
    #[must_use]
    pub fn new(filters: TaskFilters, sort: TaskSort) -> Self {
        Self { filters, sort }
    }

    /// Non-default filter params, in a stable order.
    fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if let Choice::Only(status) = self.filters.status {
            params.push(("status", status.as_str().to_owned()));
        }
        if let Choice::Only(priority) = self.filters.priority {
            params.push(("priority", priority.as_str().to_owned()));
        }
        if !self.filters.search.is_empty() {
            params.push(("search", self.filters.search.clone()));
        }
        if self.sort != TaskSort::default() {
            params.push(("sort", self.sort.key()));
        }
        params
    }

    /// `path` with the current filters plus `extra` as the query string.
    #[must_use]
    pub fn url(&self, path: &str, extra: &[(&str, &str)]) -> String {
        let query = self
            .params()
            .iter()
            .map(|(k, v)| (*k, v.as_str()))
            .chain(extra.iter().copied())
            .map(|(k, v)| format!("{k}={}", urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&");

        if query.is_empty() { path.to_owned() } else { format!("{path}?{query}") }
    }

    /// The list page with the current filters.
    #[must_use]
    pub fn list_url(&self, extra: &[(&str, &str)]) -> String {
        self.url(TASKS_PATH, extra)
    }
}

// =============================================================================
// NOTICES
// =============================================================================

/// Flash message shown once after a redirect, keyed by a short query value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    Created,
    Updated,
    Completed,
    Reopened,
    Deleted,
    CreateFailed,
    UpdateFailed,
    DeleteFailed,
}

impl Notice {
    const ALL: [Self; 8] = [
        Self::Created,
        Self::Updated,
        Self::Completed,
        Self::Reopened,
        Self::Deleted,
        Self::CreateFailed,
        Self::UpdateFailed,
        Self::DeleteFailed,
    ];

    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Updated => "updated",
            Self::Completed => "completed",
            Self::Reopened => "reopened",
            Self::Deleted => "deleted",
            Self::CreateFailed => "create_failed",
            Self::UpdateFailed => "update_failed",
            Self::DeleteFailed => "delete_failed",
        }
    }

    #[must_use]
    pub fn parse(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|n| n.key() == key)
    }

    #[must_use]
    pub fn message(self) -> &'static str {
        match self {
            Self::Created => "Task created successfully",
            Self::Updated => "Task updated successfully",
            Self::Completed => "Task completed!",
            Self::Reopened => "Task marked as pending",
            Self::Deleted => "Task deleted",
            Self::CreateFailed => "Failed to create task",
            Self::UpdateFailed => "Failed to update task",
            Self::DeleteFailed => "Failed to delete task",
        }
    }

    #[must_use]
    pub fn is_error(self) -> bool {
        matches!(self, Self::CreateFailed | Self::UpdateFailed | Self::DeleteFailed)
    }
}

/// Toast-style banner for a notice.
#[component]
pub fn NoticeBanner(notice: Notice) -> impl IntoView {
    let class = if notice.is_error() { "notice notice--error" } else { "notice notice--success" };
    view! {
        <div class=class role="status">{notice.message()}</div>
    }
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
