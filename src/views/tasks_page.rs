//! Tasks page container: header, filters, stats, list and the open modal.

use leptos::prelude::*;
use uuid::Uuid;

use super::delete_dialog::DeleteDialog;
use super::filter_bar::FilterBar;
use super::task_form::{FormMode, TaskFormModal};
use super::task_list::{StatCards, TaskCounts, TaskList};
use super::{ListState, Notice, NoticeBanner, render_document};
use crate::tasks::schema::{TaskFormFields, ValidationErrors};
use crate::tasks::types::Task;

pub const LOAD_FAILED_MESSAGE: &str = "Failed to load tasks. Please try again later.";

/// Result of the list fetch as the page shows it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskLoad {
    Loaded(Vec<Task>),
    Failed,
}

/// Which overlay is open on top of the list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Modal {
    Form { mode: FormMode, values: TaskFormFields, errors: ValidationErrors },
    ConfirmDelete(Uuid),
}

impl Modal {
    #[must_use]
    pub fn new_task() -> Self {
        Self::Form { mode: FormMode::Create, values: TaskFormFields::default(), errors: ValidationErrors::default() }
    }

    #[must_use]
    pub fn edit_task(task: &Task) -> Self {
        Self::Form { mode: FormMode::Edit(task.id), values: TaskFormFields::from(task), errors: ValidationErrors::default() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TasksPageModel {
    pub state: ListState,
    pub load: TaskLoad,
    pub notice: Option<Notice>,
    pub modal: Option<Modal>,
    pub user_email: Option<String>,
}

/// Full HTML document for the tasks page.
#[must_use]
pub fn render_tasks_page(model: TasksPageModel) -> String {
    render_document("Tasks", move || view! { <TasksPage model=model/> })
}

#[component]
pub fn TasksPage(model: TasksPageModel) -> impl IntoView {
    let TasksPageModel { state, load, notice, modal, user_email } = model;
    let new_task_url = state.list_url(&[("form", "new")]);

    let content = match load {
        TaskLoad::Failed => view! {
            <div class="alert alert--error" role="alert">{LOAD_FAILED_MESSAGE}</div>
        }
        .into_any(),
        TaskLoad::Loaded(tasks) => {
            let counts = TaskCounts::from_tasks(&tasks);
            view! {
                <StatCards counts=counts/>
                <TaskList tasks=tasks state=state.clone()/>
            }
            .into_any()
        }
    };

    let overlay = modal.map(|modal| match modal {
        Modal::Form { mode, values, errors } => view! {
            <TaskFormModal mode=mode values=values errors=errors state=state.clone()/>
        }
        .into_any(),
        Modal::ConfirmDelete(id) => view! { <DeleteDialog id=id state=state.clone()/> }.into_any(),
    });

    view! {
        <header class="topbar">
            <span class="topbar__brand">"Taskdesk"</span>
            <div class="topbar__session">
                {user_email.map(|email| view! { <span class="topbar__email">{email}</span> })}
                <form method="post" action="/auth/sign-out">
                    <button class="button button--ghost" type="submit">"Sign out"</button>
                </form>
            </div>
        </header>
        <main class="page">
            <div class="page__header">
                <div>
                    <h1 class="page__title">"Tasks"</h1>
                    <p class="page__subtitle">"Manage your tasks and stay organized"</p>
                </div>
                <a class="button button--primary" href=new_task_url>"New Task"</a>
            </div>
            {notice.map(|notice| view! { <NoticeBanner notice=notice/> })}
            <FilterBar state=state.clone()/>
            {content}
        </main>
        {overlay}
    }
}
