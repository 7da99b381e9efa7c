//! Conditional query building for the `tasks` table.

use uuid::Uuid;

use super::types::{SortDirection, TaskFilters, TaskSort};
use crate::supabase::filter::{Filter, TableQuery, contains_pattern};

pub const TASKS_TABLE: &str = "tasks";

/// List query: every column, sorted, with each filter applied only when set.
#[must_use]
pub fn list_query(filters: &TaskFilters, sort: TaskSort) -> TableQuery {
    let mut query = TableQuery::new()
        .select("*")
        .order(sort.field.column(), sort.direction == SortDirection::Asc);

    if let Some(status) = filters.status.value() {
        query = query.eq("status", status.as_str());
    }

    if let Some(priority) = filters.priority.value() {
        query = query.eq("priority", priority.as_str());
    }

    let search = filters.search.trim();
    if !search.is_empty() {
        let pattern = contains_pattern(search);
        query = query.or(&[Filter::ilike("title", pattern.clone()), Filter::ilike("description", pattern)]);
    }

    query
}

/// Single-row lookup by primary key.
#[must_use]
pub fn by_id(id: Uuid) -> TableQuery {
    TableQuery::new().select("*").eq("id", id.to_string())
}

/// Row filter for update/delete by primary key.
#[must_use]
pub fn id_filter(id: Uuid) -> TableQuery {
    TableQuery::new().eq("id", id.to_string())
}

#[cfg(test)]
#[path = "query_test.rs"]
mod tests;
