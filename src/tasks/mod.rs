//! Tasks — the one CRUD feature of the app.
//!
//! Data flows one way: a form or API call reaches `service`, which validates
//! with `schema`, writes through `store`, and invalidates `cache`. Reads build
//! their PostgREST query in `query` and are served through `cache`.

pub mod cache;
pub mod query;
pub mod schema;
pub mod service;
pub mod store;
pub mod types;
