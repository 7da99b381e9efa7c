//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! One Axum router serves the server-rendered tasks pages, the sign-in flow,
//! the JSON task API and the static assets. Pages authenticate from the
//! session cookie and redirect to sign-in; the API also accepts a bearer
//! token and answers 401.

pub mod api;
pub mod auth;
pub mod session;
pub mod tasks;

use std::path::Path;

use axum::Router;
use axum::http::StatusCode;
use axum::response::Redirect;
use axum::routing::{get, post};
use tower_http::compression::CompressionLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::state::AppState;
use crate::views::TASKS_PATH;

/// JSON API under `/api`.
fn api_routes() -> Router<AppState> {
    let cors = CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any);

    Router::new()
        .route("/api/tasks", get(api::list_tasks).post(api::create_task))
        .route(
            "/api/tasks/{id}",
            get(api::get_task).patch(api::update_task).delete(api::delete_task),
        )
        .route("/api/tasks/{id}/toggle", post(api::toggle_task))
        .layer(cors)
}

/// HTML pages and form posts.
fn page_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(redirect_home))
        .route("/home/tasks", get(tasks::tasks_page).post(tasks::create_task))
        .route("/home/tasks/{id}", post(tasks::update_task))
        .route("/home/tasks/{id}/toggle", post(tasks::toggle_task))
        .route("/home/tasks/{id}/delete", post(tasks::delete_task))
        .route("/auth/sign-in", get(auth::sign_in_page).post(auth::sign_in))
        .route("/auth/sign-out", post(auth::sign_out))
}

/// Full application router.
pub fn app(state: AppState, assets_dir: &Path) -> Router {
    Router::new()
        .merge(page_routes())
        .merge(api_routes())
        .route("/healthz", get(healthz))
        .nest_service("/assets", ServeDir::new(assets_dir))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn redirect_home() -> Redirect {
    Redirect::to(TASKS_PATH)
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
