//! Delete confirmation dialog.

use leptos::prelude::*;
use uuid::Uuid;

use super::{ListState, TASKS_PATH};

pub const CONFIRM_MESSAGE: &str = "Are you sure you want to delete this task? This action cannot be undone.";

#[component]
pub fn DeleteDialog(id: Uuid, state: ListState) -> impl IntoView {
    let action = state.url(&format!("{TASKS_PATH}/{id}/delete"), &[]);
    let cancel_url = state.list_url(&[]);

    view! {
        <div class="modal__backdrop">
            <div class="modal modal--narrow" role="alertdialog" aria-modal="true" aria-labelledby="delete-title">
                <h2 class="modal__title" id="delete-title">"Delete Task"</h2>
                <p class="modal__body">{CONFIRM_MESSAGE}</p>
                <form class="modal__actions" method="post" action=action>
                    <a class="button button--secondary" href=cancel_url>"Cancel"</a>
                    <button class="button button--danger" type="submit">"Delete"</button>
                </form>
            </div>
        </div>
    }
}
