//! Task store: the single mutable owner of the task collection.
//!
//! # Responsibility
//! - Apply create/edit/delete/toggle/reschedule intents.
//! - Flush the full collection to the repository after every mutation.
//! - Hand out read-only snapshots to derivations and views.
//!
//! # Invariants
//! - Mutations are computed on a copy; in-memory state is replaced only after
//!   the flush succeeds.
//! - Logs carry ids and counts only, never titles or descriptions.

use crate::calendar::{self, CalendarMonth};
use crate::clock::{Clock, SystemClock};
use crate::derivation::{self, TaskQuery, TaskStats};
use crate::error::{TaskError, TaskResult};
use crate::model::task::{Task, TaskDraft, TaskId, TaskPatch, TaskValidationError};
use crate::repo::kv_store::StorageResult;
use crate::repo::sqlite_store::SqliteKvStore;
use crate::repo::task_repo::{KvTaskRepository, TaskRepository};
use chrono::{DateTime, NaiveDate, TimeZone};
use log::{error, info};
use std::collections::BTreeMap;
use std::path::Path;

/// Store backed by the durable SQLite key-value table.
pub type SqliteTaskStore = TaskStore<KvTaskRepository<SqliteKvStore>, SystemClock>;

pub struct TaskStore<R: TaskRepository, C: Clock = SystemClock> {
    repo: R,
    clock: C,
    tasks: Vec<Task>,
}

impl SqliteTaskStore {
    /// Opens the SQLite database at `path` and loads its snapshot.
    pub fn open_sqlite(path: impl AsRef<Path>) -> StorageResult<Self> {
        let store = SqliteKvStore::open(path)?;
        Ok(Self::open(KvTaskRepository::new(store), SystemClock))
    }
}

impl<R: TaskRepository, C: Clock> TaskStore<R, C> {
    /// Creates a store and loads the persisted snapshot.
    pub fn open(repo: R, clock: C) -> Self {
        let mut store = Self {
            repo,
            clock,
            tasks: Vec::new(),
        };
        store.load();
        store
    }

    /// Replaces in-memory state with the persisted snapshot.
    ///
    /// Missing or corrupt data yields an empty collection.
    pub fn load(&mut self) -> &[Task] {
        self.tasks = self.repo.load_tasks();
        &self.tasks
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn get(&self, id: &TaskId) -> Option<&Task> {
        self.tasks.iter().find(|task| &task.id == id)
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Creates a task from a draft and appends it.
    ///
    /// # Errors
    /// - [`TaskError::Validation`] for a blank title.
    /// - [`TaskError::Storage`] when the flush fails.
    pub fn create(&mut self, draft: TaskDraft) -> TaskResult<Task> {
        let task = Task::from_draft(self.fresh_id(), draft, self.clock.now())?;
        let mut next = self.tasks.clone();
        next.push(task.clone());
        self.commit(next, "task_create", &task.id)?;
        Ok(task)
    }

    /// Applies a partial edit.
    ///
    /// # Errors
    /// - [`TaskError::NotFound`] when `id` is absent.
    /// - [`TaskError::Validation`] when the patch title is blank.
    pub fn update(&mut self, id: &TaskId, patch: TaskPatch) -> TaskResult<Task> {
        let now = self.clock.now();
        self.mutate(id, "task_update", |task| task.apply_patch(patch, now))
    }

    /// Removes a task. Missing ids are a no-op.
    pub fn remove(&mut self, id: &TaskId) -> TaskResult<()> {
        if self.get(id).is_none() {
            info!("event=task_remove module=store status=noop task_id={id}");
            return Ok(());
        }
        let next = self
            .tasks
            .iter()
            .filter(|task| &task.id != id)
            .cloned()
            .collect();
        self.commit(next, "task_remove", id)
    }

    /// Flips completed back to pending; every other status becomes completed.
    pub fn toggle_status(&mut self, id: &TaskId) -> TaskResult<Task> {
        let now = self.clock.now();
        self.mutate(id, "task_toggle", |task| {
            task.status = task.status.toggled();
            task.touch(now);
            Ok(())
        })
    }

    /// Moves a task to `new_date`; same-day moves succeed without a flush.
    pub fn reschedule(&mut self, id: &TaskId, new_date: NaiveDate) -> TaskResult<Task> {
        let current = self
            .get(id)
            .ok_or_else(|| TaskError::NotFound(id.clone()))?;
        if current.due_date == Some(new_date) {
            return Ok(current.clone());
        }

        let next = calendar::reschedule(&self.tasks, id, new_date, self.clock.now())?;
        self.commit(next, "task_reschedule", id)?;
        self.get(id)
            .cloned()
            .ok_or_else(|| TaskError::NotFound(id.clone()))
    }

    /// List view over the current snapshot.
    pub fn query<Tz: TimeZone>(&self, view: &TaskQuery, reference_now: &DateTime<Tz>) -> Vec<Task> {
        derivation::query(&self.tasks, view, reference_now)
    }

    /// Dashboard counters over the current snapshot.
    pub fn stats<Tz: TimeZone>(&self, reference_now: &DateTime<Tz>) -> TaskStats {
        derivation::stats(&self.tasks, reference_now)
    }

    /// Calendar buckets over the current snapshot.
    pub fn tasks_by_day(&self, month: CalendarMonth) -> BTreeMap<NaiveDate, Vec<Task>> {
        calendar::tasks_by_day(&self.tasks, month)
    }

    pub fn into_repository(self) -> R {
        self.repo
    }

    fn mutate(
        &mut self,
        id: &TaskId,
        event: &'static str,
        apply: impl FnOnce(&mut Task) -> Result<(), TaskValidationError>,
    ) -> TaskResult<Task> {
        let mut next = self.tasks.clone();
        let task = next
            .iter_mut()
            .find(|task| &task.id == id)
            .ok_or_else(|| TaskError::NotFound(id.clone()))?;
        apply(task)?;
        let updated = task.clone();
        self.commit(next, event, id)?;
        Ok(updated)
    }

    fn commit(&mut self, next: Vec<Task>, event: &'static str, id: &TaskId) -> TaskResult<()> {
        if let Err(err) = self.repo.save_tasks(&next) {
            error!(
                "event={event} module=store status=error task_id={id} error_code=flush_failed error={err}"
            );
            return Err(err.into());
        }
        self.tasks = next;
        info!(
            "event={event} module=store status=ok task_id={id} count={}",
            self.tasks.len()
        );
        Ok(())
    }

    fn fresh_id(&self) -> TaskId {
        loop {
            let id = TaskId::generate();
            if self.get(&id).is_none() {
                return id;
            }
        }
    }
}
