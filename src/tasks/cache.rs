//! Query cache — read-through cache for task queries with invalidation.
//!
//! DESIGN
//! ======
//! Entries are keyed by query (list filters + sort, or a single task id) and
//! scoped by session, since row-level security makes every result
//! user-specific. A read serves an entry only while it is younger than the
//! stale time and has not been invalidated; otherwise it refetches.
//!
//! Mutations never write into the cache. They invalidate, and the next read
//! refetches from the backend.
//!
//! CONCURRENCY
//! ===========
//! Each entry owns an async fetch lock so concurrent reads of one key share a
//! single backend round trip: a waiter that acquires the lock after another
//! caller stored a result newer than the waiter's own request reuses it.
//! Invalidation bumps a generation counter; a fetch that was in flight across
//! an invalidation stores its result already marked stale.

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use uuid::Uuid;

use super::types::{TaskFilters, TaskSort};
use crate::config::CacheConfig;

// =============================================================================
// KEYS
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum QueryKey {
    List { scope: String, filters: TaskFilters, sort: TaskSort },
    Task { scope: String, id: Uuid },
}

impl QueryKey {
    fn scope(&self) -> &str {
        match self {
            Self::List { scope, .. } | Self::Task { scope, .. } => scope,
        }
    }
}

struct Entry<V> {
    data: Option<V>,
    fetched_at: Option<Instant>,
    invalidated: bool,
    generation: u64,
    last_used: Instant,
    fetch_lock: Arc<tokio::sync::Mutex<()>>,
}

impl<V: Clone> Entry<V> {
    fn new(now: Instant) -> Self {
        Self {
            data: None,
            fetched_at: None,
            invalidated: false,
            generation: 0,
            last_used: now,
            fetch_lock: Arc::new(tokio::sync::Mutex::new(())),
        }
    }

    fn valid_data_if(&self, pred: impl FnOnce(Instant) -> bool) -> Option<V> {
        if self.invalidated {
            return None;
        }
        let fetched_at = self.fetched_at?;
        if pred(fetched_at) { self.data.clone() } else { None }
    }

    fn invalidate(&mut self) {
        self.invalidated = true;
        self.generation += 1;
    }
}

// =============================================================================
// CACHE
// =============================================================================

/// One cache per value type; the service keeps one for lists and one for
/// single tasks.
pub struct QueryCache<V> {
    entries: Mutex<HashMap<QueryKey, Entry<V>>>,
    stale_time: Duration,
    gc_time: Duration,
}

impl<V: Clone> QueryCache<V> {
    #[must_use]
    pub fn new(config: CacheConfig) -> Self {
        Self { entries: Mutex::new(HashMap::new()), stale_time: config.stale_time, gc_time: config.gc_time }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<QueryKey, Entry<V>>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Serve `key` from cache while fresh, otherwise run `fetcher` and store
    /// its result. Errors are returned to the caller and never cached.
    ///
    /// # Errors
    ///
    /// Returns whatever `fetcher` fails with.
    pub async fn fetch<F, Fut, E>(&self, key: QueryKey, fetcher: F) -> Result<V, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        let requested_at = Instant::now();
        let fetch_lock = {
            let mut entries = self.lock();
            let entry = entries.entry(key.clone()).or_insert_with(|| Entry::new(requested_at));
            entry.last_used = requested_at;
            let stale_time = self.stale_time;
            if let Some(data) = entry.valid_data_if(|fetched| requested_at.duration_since(fetched) < stale_time) {
                return Ok(data);
            }
            Arc::clone(&entry.fetch_lock)
        };

        let _guard = fetch_lock.lock().await;

        let generation = {
            let mut entries = self.lock();
            let entry = entries.entry(key.clone()).or_insert_with(|| Entry::new(requested_at));
            // Someone else fetched while we waited.
            if let Some(data) = entry.valid_data_if(|fetched| fetched >= requested_at) {
                return Ok(data);
            }
            entry.generation
        };

        let data = fetcher().await?;

        let now = Instant::now();
        let mut entries = self.lock();
        let entry = entries.entry(key).or_insert_with(|| Entry::new(now));
        entry.data = Some(data.clone());
        entry.fetched_at = Some(now);
        entry.invalidated = entry.generation != generation;
        entry.last_used = now;
        collect_garbage(&mut entries, now, self.gc_time);

        Ok(data)
    }

    /// Mark every query in `scope` stale.
    pub fn invalidate_tasks(&self, scope: &str) {
        let mut entries = self.lock();
        for (key, entry) in entries.iter_mut() {
            if key.scope() == scope {
                entry.invalidate();
            }
        }
    }

    /// Mark one single-task query stale.
    pub fn invalidate_task(&self, scope: &str, id: Uuid) {
        let key = QueryKey::Task { scope: scope.to_owned(), id };
        if let Some(entry) = self.lock().get_mut(&key) {
            entry.invalidate();
        }
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.lock().len()
    }
}

/// Drop entries unused for longer than `gc_time` that nobody is fetching.
fn collect_garbage<V>(entries: &mut HashMap<QueryKey, Entry<V>>, now: Instant, gc_time: Duration) {
    entries.retain(|_, entry| {
        now.duration_since(entry.last_used) <= gc_time || Arc::strong_count(&entry.fetch_lock) > 1
    });
}

#[cfg(test)]
#[path = "cache_test.rs"]
mod tests;
