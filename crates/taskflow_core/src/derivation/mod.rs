//! Derivation engine: pure views over a task snapshot.
//!
//! # Responsibility
//! - Provide the one implementation of filter/search/sort/stats shared by
//!   the list view and the dashboard.
//!
//! # Invariants
//! - Every function is side-effect free and returns a fresh collection.
//! - "Today" is always the calendar day of the injected reference time, in
//!   that reference time's zone.

pub mod filter;
pub mod labels;
pub mod sort;
pub mod stats;

use crate::model::task::Task;
use chrono::{DateTime, TimeZone};

pub use filter::{filter, is_overdue, search, ParseTaskFilterError, TaskFilter};
pub use labels::{due_label, DueLabel};
pub use sort::{sort, ParseSortKeyError, SortKey};
pub use stats::{
    completion_rate, productivity_trend, recent_activity, stats, trend_scale, week_bounds,
    ActivityEntry, ActivityKind, PriorityBreakdown, TaskStats, TrendPoint,
    RECENT_ACTIVITY_LIMIT,
};

/// List view state: which filter, search term and ordering are active.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskQuery {
    pub filter: TaskFilter,
    pub search: String,
    pub sort: SortKey,
}

/// Applies filter, then search, then sort.
pub fn query<Tz: TimeZone>(
    tasks: &[Task],
    view: &TaskQuery,
    reference_now: &DateTime<Tz>,
) -> Vec<Task> {
    let filtered = filter(tasks, view.filter, reference_now);
    let searched = search(&filtered, &view.search);
    sort(&searched, view.sort)
}
