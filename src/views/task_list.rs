//! Stat cards, the task list and one card per task.

use leptos::prelude::*;

use super::{ListState, TASKS_PATH};
use crate::tasks::types::{Task, TaskStatus};

pub const EMPTY_MESSAGE: &str = "No tasks found. Create your first task to get started!";

// =============================================================================
// STATS
// =============================================================================

/// Counts over the currently filtered list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TaskCounts {
    pub total: usize,
    pub pending: usize,
    pub completed: usize,
}

impl TaskCounts {
    #[must_use]
    pub fn from_tasks(tasks: &[Task]) -> Self {
        let count = |status: TaskStatus| tasks.iter().filter(|t| t.status == status).count();
        Self { total: tasks.len(), pending: count(TaskStatus::Pending), completed: count(TaskStatus::Completed) }
    }
}

#[component]
pub fn StatCards(counts: TaskCounts) -> impl IntoView {
    view! {
        <section class="stats">
            <div class="stat-card">
                <span class="stat-card__label">"Total Tasks"</span>
                <span class="stat-card__value">{counts.total}</span>
            </div>
            <div class="stat-card">
                <span class="stat-card__label">"Pending"</span>
                <span class="stat-card__value stat-card__value--pending">{counts.pending}</span>
            </div>
            <div class="stat-card">
                <span class="stat-card__label">"Completed"</span>
                <span class="stat-card__value stat-card__value--completed">{counts.completed}</span>
            </div>
        </section>
    }
}

// =============================================================================
// LIST
// =============================================================================

#[component]
pub fn TaskList(tasks: Vec<Task>, state: ListState) -> impl IntoView {
    if tasks.is_empty() {
        return view! { <p class="task-list__empty">{EMPTY_MESSAGE}</p> }.into_any();
    }

    view! {
        <ul class="task-list">
            {tasks
                .into_iter()
                .map(|task| view! { <TaskCard task=task state=state.clone()/> })
                .collect_view()}
        </ul>
    }
    .into_any()
}

#[component]
pub fn TaskCard(task: Task, state: ListState) -> impl IntoView {
    let id = task.id.to_string();
    let completed = task.is_completed();
    let due = task.due_label();

    let card_class = if completed { "task-card task-card--completed" } else { "task-card" };
    let toggle_label = if completed { "Mark as pending" } else { "Mark as completed" };
    let toggle_url = state.url(&format!("{TASKS_PATH}/{id}/toggle"), &[]);
    let edit_url = state.list_url(&[("edit", &id)]);
    let delete_url = state.list_url(&[("confirm_delete", &id)]);
    let priority_class = format!("badge {}", task.priority.color_class());

    view! {
        <li class=card_class>
            <form class="task-card__toggle-form" method="post" action=toggle_url>
                <input type="hidden" name="status" value=task.status.as_str()/>
                <button class="task-card__toggle" type="submit" aria-label=toggle_label title=toggle_label>
                    {completed.then_some("✓")}
                </button>
            </form>
            <div class="task-card__body">
                <h3 class="task-card__title">{task.title}</h3>
                {task.description.map(|d| view! { <p class="task-card__description">{d}</p> })}
                <div class="task-card__meta">
                    <span class=priority_class>{task.priority.label()}</span>
                    {due.map(|d| view! { <span class="task-card__due">{format!("Due: {d}")}</span> })}
                    {(task.status == TaskStatus::InProgress).then(|| {
                        let class = format!("badge {}", task.status.color_class());
                        view! { <span class=class>{task.status.label()}</span> }
                    })}
                </div>
            </div>
            <div class="task-card__actions">
                <a class="button button--ghost" href=edit_url>"Edit"</a>
                <a class="button button--ghost button--danger" href=delete_url>"Delete"</a>
            </div>
        </li>
    }
}
