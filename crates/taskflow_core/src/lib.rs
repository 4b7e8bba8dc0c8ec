//! Core domain logic for TaskFlow.
//! This crate is the single source of truth for task invariants, derived
//! views and calendar bucketing; UI layers only render its outputs.

pub mod calendar;
pub mod clock;
pub mod config;
pub mod derivation;
pub mod error;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use calendar::{reschedule, tasks_by_day, tasks_for_date, CalendarMonth};
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::CoreConfig;
pub use derivation::{
    due_label, filter, productivity_trend, query, recent_activity, search, sort, stats,
    ActivityEntry, ActivityKind, DueLabel, PriorityBreakdown, SortKey, TaskFilter, TaskQuery,
    TaskStats, TrendPoint, RECENT_ACTIVITY_LIMIT,
};
pub use error::{TaskError, TaskResult};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::task::{
    Category, Priority, Task, TaskDraft, TaskId, TaskPatch, TaskStatus, TaskValidationError,
};
pub use repo::kv_store::{KeyValueStore, MemoryKvStore, StorageError, StorageResult};
pub use repo::sqlite_store::{SqliteKvStore, SCHEMA_VERSION};
pub use repo::task_repo::{
    KvTaskRepository, TaskRepository, LEGACY_TASKS_STORAGE_KEY, TASKS_STORAGE_KEY,
};
pub use service::task_store::{SqliteTaskStore, TaskStore};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
