//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the whole-collection persistence contract for tasks.
//! - Isolate key-value and SQLite details from the store.
//!
//! # Invariants
//! - Every write is a complete replacement of the stored collection.
//! - Read failures degrade to an empty collection instead of surfacing.

pub mod kv_store;
pub mod sqlite_store;
pub mod task_repo;
