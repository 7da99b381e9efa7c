mod config;
mod error;
mod routes;
mod state;
mod supabase;
mod tasks;
mod views;

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use crate::config::AppConfig;
use crate::supabase::{AuthGateway, SupabaseClient};
use crate::tasks::store::TaskStore;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = AppConfig::from_env().expect("invalid configuration");
    let client = Arc::new(SupabaseClient::new(&config.supabase).expect("supabase client init failed"));

    let state = state::AppState::new(
        Arc::clone(&client) as Arc<dyn TaskStore>,
        client as Arc<dyn AuthGateway>,
        config.cache,
        config.cookie_secure,
    );

    let app = routes::app(state, &config.assets_dir);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.port))
        .await
        .expect("failed to bind");

    tracing::info!(port = config.port, supabase = %config.supabase.url, "taskdesk listening");
    axum::serve(listener, app).await.expect("server failed");
}
