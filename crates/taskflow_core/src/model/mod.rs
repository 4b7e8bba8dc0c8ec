//! Task domain model.
//!
//! # Responsibility
//! - Define canonical data structures used by store, derivations and calendar.
//! - Keep one task shape for every view projection.
//!
//! # Invariants
//! - Every task is identified by a stable `TaskId`.
//! - Deletion is a hard remove from the collection.

pub mod task;
