//! Use-case services.
//!
//! # Responsibility
//! - Own the mutable task collection and its persistence contract.
//! - Keep views decoupled from storage details.

pub mod task_store;
