//! Email + password sign-in page.

use leptos::prelude::*;

use super::render_document;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignInModel {
    pub email: String,
    /// Where to go after signing in.
    pub next: Option<String>,
    pub error: Option<String>,
}

#[must_use]
pub fn render_sign_in_page(model: SignInModel) -> String {
    render_document("Sign in", move || view! { <SignInPage model=model/> })
}

#[component]
pub fn SignInPage(model: SignInModel) -> impl IntoView {
    let SignInModel { email, next, error } = model;

    view! {
        <main class="auth">
            <form class="auth__card" method="post" action="/auth/sign-in">
                <h1 class="auth__title">"Sign in"</h1>
                {error.map(|message| view! { <div class="alert alert--error" role="alert">{message}</div> })}
                {next.map(|next| view! { <input type="hidden" name="next" value=next/> })}
                <div class="field">
                    <label class="field__label" for="email">"Email"</label>
                    <input class="field__input" id="email" type="email" name="email" required="required" autocomplete="email" value=email/>
                </div>
                <div class="field">
                    <label class="field__label" for="password">"Password"</label>
                    <input
                        class="field__input"
                        id="password"
                        type="password"
                        name="password"
                        required="required"
                        autocomplete="current-password"
                    />
                </div>
                <button class="button button--primary" type="submit">"Sign in"</button>
            </form>
        </main>
    }
}
