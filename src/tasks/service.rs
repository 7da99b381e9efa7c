//! Task service — cached reads and invalidating mutations.
//!
//! DESIGN
//! ======
//! Reads go through the query cache, keyed by the caller's session so one
//! user's rows are never served to another. Mutations go straight to the
//! store and then invalidate: creating or deleting drops every cached task
//! query of the session, updating drops the lists plus that task's entry. No
//! mutation writes its result into the cache; the next read refetches.

use std::sync::Arc;

use uuid::Uuid;

use super::cache::{QueryCache, QueryKey};
use super::schema::{ValidationErrors, validate_create, validate_update};
use super::store::TaskStore;
use super::types::{CreateTaskInput, Task, TaskFilters, TaskInsert, TaskSort, TaskStatus, TaskUpdate, UpdateTaskInput};
use crate::config::CacheConfig;
use crate::error::ErrorCode;
use crate::supabase::AuthGateway;
use crate::supabase::types::{AccessToken, SupabaseError};

// =============================================================================
// TYPES
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum TaskError {
    #[error("User not authenticated")]
    Unauthenticated,
    #[error("task not found: {0}")]
    NotFound(Uuid),
    #[error(transparent)]
    Validation(#[from] ValidationErrors),
    #[error("backend error: {0}")]
    Backend(SupabaseError),
}

impl ErrorCode for TaskError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Unauthenticated => "E_UNAUTHENTICATED",
            Self::NotFound(_) => "E_TASK_NOT_FOUND",
            Self::Validation(_) => "E_VALIDATION",
            Self::Backend(e) => e.error_code(),
        }
    }

    fn retryable(&self) -> bool {
        matches!(self, Self::Backend(e) if e.retryable())
    }
}

impl TaskError {
    /// Map a store error, turning a missing row into `NotFound(id)` and a
    /// rejected token into `Unauthenticated`.
    fn from_store(err: SupabaseError, id: Option<Uuid>) -> Self {
        match (err, id) {
            (SupabaseError::NotFound, Some(id)) => Self::NotFound(id),
            (err, _) if err.is_unauthorized() => Self::Unauthenticated,
            (err, _) => Self::Backend(err),
        }
    }
}

// =============================================================================
// SERVICE
// =============================================================================

pub struct TaskService {
    store: Arc<dyn TaskStore>,
    auth: Arc<dyn AuthGateway>,
    lists: QueryCache<Vec<Task>>,
    items: QueryCache<Task>,
}

impl TaskService {
    #[must_use]
    pub fn new(store: Arc<dyn TaskStore>, auth: Arc<dyn AuthGateway>, cache: CacheConfig) -> Self {
        Self { store, auth, lists: QueryCache::new(cache), items: QueryCache::new(cache) }
    }

    fn scope(token: &AccessToken) -> String {
        token.fingerprint()
    }

    // -------------------------------------------------------------------------
    // Reads
    // -------------------------------------------------------------------------

    /// Tasks visible to the session, filtered and sorted.
    ///
    /// # Errors
    ///
    /// Returns `Backend` if the fetch fails. A failed refetch does not evict
    /// the previous result.
    pub async fn list_tasks(&self, token: &AccessToken, filters: &TaskFilters, sort: TaskSort) -> Result<Vec<Task>, TaskError> {
        let key = QueryKey::List { scope: Self::scope(token), filters: filters.clone(), sort };
        self.lists
            .fetch(key, || async { self.store.list(token, filters, sort).await })
            .await
            .map_err(|e| {
                tracing::warn!(error = %e, "task list fetch failed");
                TaskError::from_store(e, None)
            })
    }

    /// One task by id.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no visible task has `id`.
    pub async fn get_task(&self, token: &AccessToken, id: Uuid) -> Result<Task, TaskError> {
        let key = QueryKey::Task { scope: Self::scope(token), id };
        self.items
            .fetch(key, || async { self.store.get(token, id).await })
            .await
            .map_err(|e| TaskError::from_store(e, Some(id)))
    }

    // -------------------------------------------------------------------------
    // Mutations
    // -------------------------------------------------------------------------

    /// Validate and insert a task owned by the session's user.
    ///
    /// # Errors
    ///
    /// Returns `Unauthenticated` if the token resolves to no user,
    /// `Validation` for bad input, `Backend` if the insert fails.
    pub async fn create_task(&self, token: &AccessToken, input: CreateTaskInput) -> Result<Task, TaskError> {
        let new_task = validate_create(input)?;
        let user = self
            .auth
            .get_user(token)
            .await
            .map_err(|e| TaskError::from_store(e, None))?
            .ok_or(TaskError::Unauthenticated)?;

        let row = TaskInsert {
            title: new_task.title,
            description: new_task.description,
            priority: new_task.priority,
            due_date: new_task.due_date,
            user_id: user.id,
            account_id: user.id,
        };

        let task = self.store.insert(token, &row).await.map_err(|e| {
            tracing::error!(user_id = %user.id, error = %e, "task create failed");
            TaskError::from_store(e, None)
        })?;

        self.invalidate_tasks(token);
        tracing::info!(task_id = %task.id, user_id = %user.id, "task created");
        Ok(task)
    }

    /// Validate and apply a partial update.
    ///
    /// # Errors
    ///
    /// Returns `Validation` for bad input, `NotFound` if no visible task has
    /// `id`, `Backend` if the update fails.
    pub async fn update_task(&self, token: &AccessToken, id: Uuid, input: UpdateTaskInput) -> Result<Task, TaskError> {
        let changes = validate_update(input)?;
        self.apply_update(token, id, &changes).await
    }

    /// Flip completion: completed reopens as pending, anything else completes.
    ///
    /// # Errors
    ///
    /// Same as [`TaskService::update_task`].
    pub async fn toggle_status(&self, token: &AccessToken, id: Uuid, current: TaskStatus) -> Result<Task, TaskError> {
        self.apply_update(token, id, &TaskUpdate::status(current.toggled())).await
    }

    async fn apply_update(&self, token: &AccessToken, id: Uuid, changes: &TaskUpdate) -> Result<Task, TaskError> {
        if changes.is_empty() {
            return self.get_task(token, id).await;
        }

        let task = self.store.update(token, id, changes).await.map_err(|e| {
            tracing::error!(task_id = %id, error = %e, "task update failed");
            TaskError::from_store(e, Some(id))
        })?;

        let scope = Self::scope(token);
        self.lists.invalidate_tasks(&scope);
        self.items.invalidate_task(&scope, id);
        tracing::info!(task_id = %id, user_id = %task.user_id, status = task.status.as_str(), "task updated");
        Ok(task)
    }

    /// Delete a task. Deleting a task that is already gone succeeds.
    ///
    /// # Errors
    ///
    /// Returns `Backend` if the delete fails.
    pub async fn delete_task(&self, token: &AccessToken, id: Uuid) -> Result<(), TaskError> {
        self.store.delete(token, id).await.map_err(|e| {
            tracing::error!(task_id = %id, error = %e, "task delete failed");
            TaskError::from_store(e, Some(id))
        })?;

        self.invalidate_tasks(token);
        tracing::info!(task_id = %id, "task deleted");
        Ok(())
    }

    /// Drop every cached task query of the session.
    pub fn invalidate_tasks(&self, token: &AccessToken) {
        let scope = Self::scope(token);
        self.lists.invalidate_tasks(&scope);
        self.items.invalidate_tasks(&scope);
    }
}

#[cfg(test)]
#[path = "service_test.rs"]
mod tests;
