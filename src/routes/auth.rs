//! Auth routes — email + password sign-in against Supabase Auth, sign-out.

use axum::extract::{Form, Query, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;

use super::session::{COOKIE_NAME, SIGN_IN_PATH, clear_session_cookie, session_cookie};
use crate::error::ErrorCode;
use crate::state::AppState;
use crate::supabase::types::{AccessToken, SupabaseError};
use crate::views::TASKS_PATH;
use crate::views::sign_in::{SignInModel, render_sign_in_page};

#[derive(Debug, Default, Deserialize)]
pub struct SignInQuery {
    #[serde(default)]
    pub next: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SignInForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub next: Option<String>,
}

/// Only same-site absolute paths are followed after sign-in. Browsers read
/// `\` as `/`, so `/\host` is as off-site as `//host`.
pub(crate) fn safe_next(next: Option<&str>) -> String {
    let local = |path: &str| {
        let mut bytes = path.bytes();
        bytes.next() == Some(b'/')
            && !matches!(bytes.next(), Some(b'/' | b'\\'))
            && !path.chars().any(char::is_control)
            && !path.starts_with(SIGN_IN_PATH)
    };
    match next {
        Some(path) if local(path) => path.to_owned(),
        _ => TASKS_PATH.to_owned(),
    }
}

fn sign_in_failure_message(err: &SupabaseError) -> String {
    match err {
        SupabaseError::Api { status: 400 | 401 | 422, message, .. } => message.clone(),
        _ => "Sign in is unavailable right now. Please try again.".to_owned(),
    }
}

/// `GET /auth/sign-in`.
pub async fn sign_in_page(Query(query): Query<SignInQuery>) -> Html<String> {
    Html(render_sign_in_page(SignInModel { next: query.next, ..SignInModel::default() }))
}

/// `POST /auth/sign-in` — password grant, then set the session cookie.
pub async fn sign_in(State(state): State<AppState>, jar: CookieJar, Form(form): Form<SignInForm>) -> Response {
    let email = form.email.trim().to_owned();
    if email.is_empty() || form.password.is_empty() {
        let model = SignInModel { email, next: form.next, error: Some("Enter your email and password.".into()) };
        return (StatusCode::UNPROCESSABLE_ENTITY, Html(render_sign_in_page(model))).into_response();
    }

    match state.auth.sign_in_with_password(&email, &form.password).await {
        Ok(session) => {
            tracing::info!(user_id = %session.user.id, "signed in");
            let cookie = session_cookie(session.access_token, session.expires_in, state.cookie_secure);
            (jar.add(cookie), Redirect::to(&safe_next(form.next.as_deref()))).into_response()
        }
        Err(e) => {
            tracing::warn!(error = %e, "sign in failed");
            let status = if e.retryable() { StatusCode::BAD_GATEWAY } else { StatusCode::UNAUTHORIZED };
            let model = SignInModel { email, next: form.next, error: Some(sign_in_failure_message(&e)) };
            (status, Html(render_sign_in_page(model))).into_response()
        }
    }
}

/// `POST /auth/sign-out` — revoke the session upstream and drop the cookie.
pub async fn sign_out(State(state): State<AppState>, jar: CookieJar) -> Response {
    if let Some(token) = jar.get(COOKIE_NAME).map(|c| AccessToken::new(c.value())) {
        if let Err(e) = state.auth.sign_out(&token).await {
            tracing::warn!(error = %e, "sign out failed upstream");
        }
        state.tasks.invalidate_tasks(&token);
    }
    (jar.add(clear_session_cookie(state.cookie_secure)), Redirect::to(SIGN_IN_PATH)).into_response()
}

#[cfg(test)]
#[path = "auth_test.rs"]
mod tests;
