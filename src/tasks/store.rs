//! Persistence seam for task rows.
//!
//! `TaskStore` is what the service talks to. The production implementation is
//! the Supabase table API; tests use an in-memory store. Every call runs as the
//! caller's session, so row-level security decides which rows are visible.

use async_trait::async_trait;
use uuid::Uuid;

use super::query::{TASKS_TABLE, by_id, id_filter, list_query};
use super::types::{Task, TaskFilters, TaskInsert, TaskSort, TaskUpdate};
use crate::supabase::SupabaseClient;
use crate::supabase::types::{AccessToken, SupabaseError};

#[async_trait]
pub trait TaskStore: Send + Sync {
    async fn list(&self, token: &AccessToken, filters: &TaskFilters, sort: TaskSort) -> Result<Vec<Task>, SupabaseError>;

    /// `SupabaseError::NotFound` when no visible row has `id`.
    async fn get(&self, token: &AccessToken, id: Uuid) -> Result<Task, SupabaseError>;

    async fn insert(&self, token: &AccessToken, row: &TaskInsert) -> Result<Task, SupabaseError>;

    /// `SupabaseError::NotFound` when no visible row has `id`.
    async fn update(&self, token: &AccessToken, id: Uuid, changes: &TaskUpdate) -> Result<Task, SupabaseError>;

    async fn delete(&self, token: &AccessToken, id: Uuid) -> Result<(), SupabaseError>;
}

#[async_trait]
impl TaskStore for SupabaseClient {
    async fn list(&self, token: &AccessToken, filters: &TaskFilters, sort: TaskSort) -> Result<Vec<Task>, SupabaseError> {
        self.select(TASKS_TABLE, Some(token), &list_query(filters, sort)).await
    }

    async fn get(&self, token: &AccessToken, id: Uuid) -> Result<Task, SupabaseError> {
        self.select_single(TASKS_TABLE, Some(token), &by_id(id)).await
    }

    async fn insert(&self, token: &AccessToken, row: &TaskInsert) -> Result<Task, SupabaseError> {
        self.insert_single(TASKS_TABLE, Some(token), row).await
    }

    async fn update(&self, token: &AccessToken, id: Uuid, changes: &TaskUpdate) -> Result<Task, SupabaseError> {
        self.update_single(TASKS_TABLE, Some(token), &id_filter(id), changes).await
    }

    async fn delete(&self, token: &AccessToken, id: Uuid) -> Result<(), SupabaseError> {
        SupabaseClient::delete(self, TASKS_TABLE, Some(token), &id_filter(id)).await
    }
}

#[cfg(test)]
#[path = "store_test.rs"]
mod tests;
