//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor. It
//! holds the task service (store + query cache) and the auth gateway. Both
//! backends sit behind traits so tests run against an in-memory backend.

use std::sync::Arc;

use crate::config::CacheConfig;
use crate::supabase::AuthGateway;
use crate::tasks::service::TaskService;
use crate::tasks::store::TaskStore;

#[derive(Clone)]
pub struct AppState {
    pub tasks: Arc<TaskService>,
    pub auth: Arc<dyn AuthGateway>,
    /// Mark the session cookie `Secure`.
    pub cookie_secure: bool,
}

impl AppState {
    #[must_use]
    pub fn new(store: Arc<dyn TaskStore>, auth: Arc<dyn AuthGateway>, cache: CacheConfig, cookie_secure: bool) -> Self {
        let tasks = Arc::new(TaskService::new(store, Arc::clone(&auth), cache));
        Self { tasks, auth, cookie_secure }
    }
}
