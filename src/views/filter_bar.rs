//! Filter bar: search, status, priority and sort.
//!
//! A GET form on the list page. `tasks.js` submits it 300 ms after the last
//! change; without script the Apply button does the same.

use leptos::prelude::*;

use super::{ListState, TASKS_PATH};
use crate::tasks::types::{TaskPriority, TaskSort, TaskStatus};

pub const DEBOUNCE_MS: u32 = 300;

#[component]
pub fn FilterBar(state: ListState) -> impl IntoView {
    let status = state.filters.status.value();
    let priority = state.filters.priority.value();
    let sort_key = state.sort.key();

    view! {
        <form
            class="filter-bar"
            id="task-filters"
            method="get"
            action=TASKS_PATH
            data-debounce-ms=DEBOUNCE_MS.to_string()
        >
            <input
                class="filter-bar__search"
                type="search"
                name="search"
                placeholder="Search tasks..."
                value=state.filters.search
            />
            <select class="filter-bar__select" name="status" aria-label="Status">
                <option value="all" selected=status.is_none()>"All Status"</option>
                {TaskStatus::ALL
                    .into_iter()
                    .map(|s| view! { <option value=s.as_str() selected={status == Some(s)}>{s.label()}</option> })
                    .collect_view()}
            </select>
            <select class="filter-bar__select" name="priority" aria-label="Priority">
                <option value="all" selected=priority.is_none()>"All Priorities"</option>
                {TaskPriority::ALL
                    .into_iter()
                    .map(|p| view! { <option value=p.as_str() selected={priority == Some(p)}>{p.label()}</option> })
                    .collect_view()}
            </select>
            <select class="filter-bar__select" name="sort" aria-label="Sort">
                {TaskSort::options()
                    .into_iter()
                    .map(|(sort, label)| {
                        let key = sort.key();
                        let selected = key == sort_key;
                        view! { <option value=key selected=selected>{label}</option> }
                    })
                    .collect_view()}
            </select>
            <noscript>
                <button class="button button--secondary" type="submit">"Apply"</button>
            </noscript>
        </form>
    }
}
