//! Task collection repository.
//!
//! # Responsibility
//! - Serialize the whole task collection under one canonical key.
//! - Recover from missing or malformed stored data without failing.
//!
//! # Invariants
//! - Writes always target [`TASKS_STORAGE_KEY`]; the legacy key is read-only.
//! - `load_tasks` never returns an error; bad data loads as empty.
//! - A loaded collection has unique ids and only valid records.

use crate::model::task::{Task, TaskId};
use crate::repo::kv_store::{KeyValueStore, StorageResult};
use log::{info, warn};
use std::collections::HashSet;

/// Canonical storage key for the task collection.
pub const TASKS_STORAGE_KEY: &str = "taskflow-tasks";
/// Key written by the calendar page of older front-ends.
pub const LEGACY_TASKS_STORAGE_KEY: &str = "taskflow_tasks";

/// Whole-collection persistence contract.
pub trait TaskRepository {
    /// Loads the persisted collection, or an empty one when absent/corrupt.
    fn load_tasks(&self) -> Vec<Task>;
    /// Replaces the persisted collection.
    fn save_tasks(&mut self, tasks: &[Task]) -> StorageResult<()>;
}

/// Task repository over any [`KeyValueStore`].
pub struct KvTaskRepository<S: KeyValueStore> {
    store: S,
}

impl<S: KeyValueStore> KvTaskRepository<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    fn read_raw(&self) -> Option<(&'static str, String)> {
        for key in [TASKS_STORAGE_KEY, LEGACY_TASKS_STORAGE_KEY] {
            match self.store.get(key) {
                Ok(Some(raw)) => return Some((key, raw)),
                Ok(None) => continue,
                Err(err) => {
                    warn!(
                        "event=tasks_load module=repo status=recovered key={key} error_code=read_failed error={err}"
                    );
                    return None;
                }
            }
        }
        None
    }
}

impl<S: KeyValueStore> TaskRepository for KvTaskRepository<S> {
    fn load_tasks(&self) -> Vec<Task> {
        let Some((key, raw)) = self.read_raw() else {
            info!("event=tasks_load module=repo status=ok count=0 source=none");
            return Vec::new();
        };

        let tasks = match serde_json::from_str::<Vec<Task>>(&raw) {
            Ok(tasks) => tasks,
            Err(err) => {
                warn!(
                    "event=tasks_load module=repo status=recovered key={key} error_code=parse_failed line={} column={}",
                    err.line(),
                    err.column()
                );
                return Vec::new();
            }
        };

        if let Err(err) = tasks.iter().try_for_each(Task::validate) {
            warn!(
                "event=tasks_load module=repo status=recovered key={key} error_code=invalid_task error={err}"
            );
            return Vec::new();
        }

        if let Some(id) = first_duplicate_id(&tasks) {
            warn!(
                "event=tasks_load module=repo status=recovered key={key} error_code=duplicate_id task_id={id}"
            );
            return Vec::new();
        }

        info!(
            "event=tasks_load module=repo status=ok count={} key={key}",
            tasks.len()
        );
        tasks
    }

    fn save_tasks(&mut self, tasks: &[Task]) -> StorageResult<()> {
        let encoded = serde_json::to_string(tasks)?;
        self.store.set(TASKS_STORAGE_KEY, &encoded)
    }
}

fn first_duplicate_id(tasks: &[Task]) -> Option<&TaskId> {
    let mut seen = HashSet::with_capacity(tasks.len());
    tasks.iter().map(|task| &task.id).find(|id| !seen.insert(*id))
}

#[cfg(test)]
mod tests {
    use super::{KvTaskRepository, TaskRepository, LEGACY_TASKS_STORAGE_KEY, TASKS_STORAGE_KEY};
    use crate::repo::kv_store::{KeyValueStore, MemoryKvStore};

    #[test]
    fn missing_data_loads_empty() {
        let repo = KvTaskRepository::new(MemoryKvStore::new());
        assert!(repo.load_tasks().is_empty());
    }

    #[test]
    fn corrupt_data_loads_empty() {
        let store = MemoryKvStore::new().with_entry(TASKS_STORAGE_KEY, "{not json");
        let repo = KvTaskRepository::new(store);
        assert!(repo.load_tasks().is_empty());
    }

    #[test]
    fn record_with_blank_title_loads_empty() {
        let raw = r#"[{"id":"1","title":"  ","createdAt":"2024-01-01T00:00:00Z","updatedAt":"2024-01-01T00:00:00Z"}]"#;
        let repo = KvTaskRepository::new(MemoryKvStore::new().with_entry(TASKS_STORAGE_KEY, raw));
        assert!(repo.load_tasks().is_empty());
    }

    #[test]
    fn record_with_blank_or_repeated_tags_loads_empty() {
        for tags in [r#"["  ","x"]"#, r#"["x","x"]"#] {
            let raw = format!(
                r#"[{{"id":"1","title":"a","tags":{tags},"createdAt":"2024-01-01T00:00:00Z","updatedAt":"2024-01-01T00:00:00Z"}}]"#
            );
            let repo =
                KvTaskRepository::new(MemoryKvStore::new().with_entry(TASKS_STORAGE_KEY, raw));
            assert!(repo.load_tasks().is_empty(), "tags {tags} should be rejected");
        }
    }

    #[test]
    fn records_sharing_an_id_load_empty() {
        let raw = r#"[
            {"id":"1","title":"a","createdAt":"2024-01-01T00:00:00Z","updatedAt":"2024-01-01T00:00:00Z"},
            {"id":"2","title":"b","createdAt":"2024-01-01T00:00:00Z","updatedAt":"2024-01-01T00:00:00Z"},
            {"id":"1","title":"c","createdAt":"2024-01-01T00:00:00Z","updatedAt":"2024-01-01T00:00:00Z"}
        ]"#;
        let repo = KvTaskRepository::new(MemoryKvStore::new().with_entry(TASKS_STORAGE_KEY, raw));
        assert!(repo.load_tasks().is_empty());
    }

    #[test]
    fn distinct_ids_with_normalized_tags_load() {
        let raw = r#"[
            {"id":"1","title":"a","tags":["x","y"],"createdAt":"2024-01-01T00:00:00Z","updatedAt":"2024-01-01T00:00:00Z"},
            {"id":"2","title":"b","tags":["x"],"createdAt":"2024-01-01T00:00:00Z","updatedAt":"2024-01-01T00:00:00Z"}
        ]"#;
        let repo = KvTaskRepository::new(MemoryKvStore::new().with_entry(TASKS_STORAGE_KEY, raw));
        assert_eq!(repo.load_tasks().len(), 2);
    }

    #[test]
    fn canonical_key_wins_over_legacy_key() {
        let store = MemoryKvStore::new()
            .with_entry(TASKS_STORAGE_KEY, "[]")
            .with_entry(LEGACY_TASKS_STORAGE_KEY, "garbage");
        let repo = KvTaskRepository::new(store);
        assert!(repo.load_tasks().is_empty());
    }

    #[test]
    fn save_writes_canonical_key_only() {
        let store = MemoryKvStore::new().with_entry(LEGACY_TASKS_STORAGE_KEY, "[]");
        let mut repo = KvTaskRepository::new(store);
        repo.save_tasks(&[]).unwrap();
        let store = repo.into_store();
        assert_eq!(store.get(TASKS_STORAGE_KEY).unwrap().as_deref(), Some("[]"));
        assert_eq!(
            store.get(LEGACY_TASKS_STORAGE_KEY).unwrap().as_deref(),
            Some("[]")
        );
    }
}
