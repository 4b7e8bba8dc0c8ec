//! Calendar bucketing and drag-to-reschedule.
//!
//! # Responsibility
//! - Group tasks by due day over a month grid.
//! - Move a task to another day as a single-field mutation.
//!
//! # Invariants
//! - Undated tasks never appear in a bucket.
//! - Every grid day has a bucket, possibly empty.
//! - Rescheduling onto the current due date changes nothing, `updated_at`
//!   included.

pub mod month;

use crate::error::{TaskError, TaskResult};
use crate::model::task::{Task, TaskId};
use chrono::{DateTime, NaiveDate, Utc};
use std::collections::BTreeMap;

pub use month::CalendarMonth;

/// Buckets tasks by due day for every day of `month`'s grid.
///
/// Tasks inside a bucket keep collection order.
pub fn tasks_by_day(tasks: &[Task], month: CalendarMonth) -> BTreeMap<NaiveDate, Vec<Task>> {
    let mut buckets: BTreeMap<NaiveDate, Vec<Task>> = month
        .grid_days()
        .into_iter()
        .map(|day| (day, Vec::new()))
        .collect();

    for task in tasks {
        let Some(due) = task.due_date else {
            continue;
        };
        if let Some(bucket) = buckets.get_mut(&due) {
            bucket.push(task.clone());
        }
    }
    buckets
}

/// Tasks due on `date`, in collection order.
pub fn tasks_for_date(tasks: &[Task], date: NaiveDate) -> Vec<Task> {
    tasks
        .iter()
        .filter(|task| task.due_date == Some(date))
        .cloned()
        .collect()
}

/// Returns a copy of `tasks` with `task_id` moved to `new_date`.
///
/// # Errors
/// - [`TaskError::NotFound`] when no task has `task_id`.
pub fn reschedule(
    tasks: &[Task],
    task_id: &TaskId,
    new_date: NaiveDate,
    now: DateTime<Utc>,
) -> TaskResult<Vec<Task>> {
    let mut next = tasks.to_vec();
    let task = next
        .iter_mut()
        .find(|task| &task.id == task_id)
        .ok_or_else(|| TaskError::NotFound(task_id.clone()))?;

    if task.due_date != Some(new_date) {
        task.due_date = Some(new_date);
        task.touch(now);
    }
    Ok(next)
}
