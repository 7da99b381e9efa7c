//! Session extractors.
//!
//! The Supabase access token travels in the `sb-access-token` cookie (pages)
//! or an `Authorization: Bearer` header (API). Either way it is resolved to a
//! user through the auth gateway on every request.

use axum::extract::{FromRef, FromRequestParts};
use axum::http::request::Parts;
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Redirect, Response};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};

use crate::state::AppState;
use crate::supabase::types::{AccessToken, AuthUser, SupabaseError};

pub const COOKIE_NAME: &str = "sb-access-token";
pub const SIGN_IN_PATH: &str = "/auth/sign-in";

/// An authenticated caller.
#[derive(Debug, Clone)]
pub struct Session {
    pub token: AccessToken,
    pub user: AuthUser,
}

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("no access token")]
    Missing,
    #[error("access token rejected")]
    Rejected,
    #[error("auth lookup failed: {0}")]
    Backend(#[from] SupabaseError),
}

fn bearer_token(parts: &Parts) -> Option<String> {
    let value = parts.headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let token = value.strip_prefix("Bearer ")?.trim();
    (!token.is_empty()).then(|| token.to_owned())
}

fn cookie_token(parts: &Parts) -> Option<String> {
    let jar = CookieJar::from_headers(&parts.headers);
    let token = jar.get(COOKIE_NAME).map(Cookie::value)?;
    (!token.is_empty()).then(|| token.to_owned())
}

async fn resolve(parts: &Parts, state: &AppState) -> Result<Session, SessionError> {
    let raw = bearer_token(parts).or_else(|| cookie_token(parts)).ok_or(SessionError::Missing)?;
    let token = AccessToken::new(raw);
    let user = state.auth.get_user(&token).await?.ok_or(SessionError::Rejected)?;
    Ok(Session { token, user })
}

// =============================================================================
// COOKIES
// =============================================================================

/// HTTP-only session cookie valid for `max_age_secs`.
#[must_use]
pub fn session_cookie(token: String, max_age_secs: i64, secure: bool) -> Cookie<'static> {
    Cookie::build((COOKIE_NAME, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .max_age(time::Duration::seconds(max_age_secs))
        .build()
}

/// Expired cookie that removes the session.
#[must_use]
pub fn clear_session_cookie(secure: bool) -> Cookie<'static> {
    Cookie::build((COOKIE_NAME, ""))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .max_age(time::Duration::ZERO)
        .build()
}

/// Send the browser to sign-in, dropping its cookie, then back to `next`.
#[must_use]
pub fn sign_in_redirect(next: &str, secure: bool) -> Response {
    let jar = CookieJar::new().add(clear_session_cookie(secure));
    let location = format!("{SIGN_IN_PATH}?next={}", urlencoding::encode(next));
    (jar, Redirect::to(&location)).into_response()
}

// =============================================================================
// PAGE EXTRACTOR
// =============================================================================

/// Session for HTML pages. Unauthenticated requests are redirected to
/// sign-in and come back to the page they asked for.
pub struct PageSession(pub Session);

impl<S> FromRequestParts<S> for PageSession
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);
        match resolve(parts, &app_state).await {
            Ok(session) => Ok(Self(session)),
            Err(SessionError::Backend(e)) => {
                tracing::error!(error = %e, "session lookup failed");
                Err((StatusCode::BAD_GATEWAY, "Authentication service unavailable").into_response())
            }
            Err(_) => {
                let next = parts.uri.path_and_query().map_or("/", |pq| pq.as_str());
                Err(sign_in_redirect(next, app_state.cookie_secure))
            }
        }
    }
}

// =============================================================================
// API EXTRACTOR
// =============================================================================

/// Session for the JSON API. Unauthenticated requests get 401.
pub struct ApiSession(pub Session);

impl<S> FromRequestParts<S> for ApiSession
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = StatusCode;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);
        match resolve(parts, &app_state).await {
            Ok(session) => Ok(Self(session)),
            Err(SessionError::Backend(e)) => {
                tracing::error!(error = %e, "session lookup failed");
                Err(StatusCode::BAD_GATEWAY)
            }
            Err(_) => Err(StatusCode::UNAUTHORIZED),
        }
    }
}

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;
