//! Create / edit modal.
//!
//! The same form serves both modes; only the title, action, submit label and
//! the status field differ. Re-rendered with the submitted values and
//! per-field messages when validation fails.

use leptos::prelude::*;
use uuid::Uuid;

use super::{ListState, TASKS_PATH};
use crate::tasks::schema::{DESCRIPTION_MAX_CHARS, TITLE_MAX_CHARS, TaskFormFields, ValidationErrors};
use crate::tasks::types::{Task, TaskPriority, TaskStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit(Uuid),
}

impl FormMode {
    fn heading(self) -> &'static str {
        match self {
            Self::Create => "Create New Task",
            Self::Edit(_) => "Edit Task",
        }
    }

    fn submit_label(self) -> &'static str {
        match self {
            Self::Create => "Create",
            Self::Edit(_) => "Update",
        }
    }

    fn action(self, state: &ListState) -> String {
        match self {
            Self::Create => state.url(TASKS_PATH, &[]),
            Self::Edit(id) => state.url(&format!("{TASKS_PATH}/{id}"), &[]),
        }
    }
}

impl From<&Task> for TaskFormFields {
    fn from(task: &Task) -> Self {
        Self {
            title: task.title.clone(),
            description: task.description.clone().unwrap_or_default(),
            priority: task.priority.as_str().to_owned(),
            due_date: task.due_input_value(),
            due_at: task.due_at_value(),
            status: Some(task.status.as_str().to_owned()),
        }
    }
}

fn field_error(errors: &ValidationErrors, field: &str) -> Option<AnyView> {
    let message = errors.message_for(field)?.to_owned();
    Some(view! { <p class="field__error" role="alert">{message}</p> }.into_any())
}

#[component]
pub fn TaskFormModal(
    mode: FormMode,
    values: TaskFormFields,
    #[prop(default = ValidationErrors::default())] errors: ValidationErrors,
    state: ListState,
) -> impl IntoView {
    let action = mode.action(&state);
    let cancel_url = state.list_url(&[]);
    let priority = if values.priority.is_empty() { TaskPriority::default().as_str().to_owned() } else { values.priority };
    let status = values.status.unwrap_or_else(|| TaskStatus::default().as_str().to_owned());

    let title_error = field_error(&errors, "title");
    let description_error = field_error(&errors, "description");
    let priority_error = field_error(&errors, "priority");
    let due_date_error = field_error(&errors, "due_date");
    let status_error = field_error(&errors, "status");

    let status_field = matches!(mode, FormMode::Edit(_)).then(move || {
        view! {
            <div class="field">
                <label class="field__label" for="task-status">"Status"</label>
                <select class="field__input" id="task-status" name="status">
                    {TaskStatus::ALL
                        .into_iter()
                        .map(|s| view! { <option value=s.as_str() selected={s.as_str() == status}>{s.label()}</option> })
                        .collect_view()}
                </select>
                {status_error}
            </div>
        }
    });

    view! {
        <div class="modal__backdrop">
            <div class="modal" role="dialog" aria-modal="true" aria-labelledby="task-form-title">
                <h2 class="modal__title" id="task-form-title">{mode.heading()}</h2>
                <form class="task-form" method="post" action=action>
                    <div class="field">
                        <label class="field__label" for="task-title">"Title *"</label>
                        <input
                            class="field__input"
                            id="task-title"
                            type="text"
                            name="title"
                            required="required"
                            maxlength=TITLE_MAX_CHARS.to_string()
                            value=values.title
                        />
                        {title_error}
                    </div>
                    <div class="field">
                        <label class="field__label" for="task-description">"Description"</label>
                        <textarea
                            class="field__input"
                            id="task-description"
                            name="description"
                            rows="4"
                            maxlength=DESCRIPTION_MAX_CHARS.to_string()
                        >
                            {values.description}
                        </textarea>
                        {description_error}
                    </div>
                    <div class="field">
                        <label class="field__label" for="task-priority">"Priority"</label>
                        <select class="field__input" id="task-priority" name="priority">
                            {TaskPriority::ALL
                                .into_iter()
                                .map(|p| view! { <option value=p.as_str() selected={p.as_str() == priority}>{p.label()}</option> })
                                .collect_view()}
                        </select>
                        {priority_error}
                    </div>
                    <div class="field">
                        <label class="field__label" for="task-due-date">"Due Date"</label>
                        <input class="field__input" id="task-due-date" type="date" name="due_date" value=values.due_date/>
                        <input type="hidden" name="due_at" value=values.due_at/>
                        {due_date_error}
                    </div>
                    {status_field}
                    <div class="modal__actions">
                        <a class="button button--secondary" href=cancel_url>"Cancel"</a>
                        <button class="button button--primary" type="submit">{mode.submit_label()}</button>
                    </div>
                </form>
            </div>
        </div>
    }
}
