//! Dashboard aggregates: counters, completion trend and recent activity.

use crate::derivation::filter::{is_overdue, TaskFilter};
use crate::model::task::{Priority, Task, TaskId, TaskStatus};
use chrono::{DateTime, Datelike, Days, NaiveDate, TimeZone, Utc};
use serde::Serialize;

/// Number of entries shown in the dashboard activity feed.
pub const RECENT_ACTIVITY_LIMIT: usize = 5;
/// Length of the completion trend window, today included.
pub const TREND_DAYS: usize = 7;

/// Per-priority task counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PriorityBreakdown {
    pub urgent: usize,
    pub high: usize,
    pub medium: usize,
    pub low: usize,
}

impl PriorityBreakdown {
    pub fn count(&self, priority: Priority) -> usize {
        match priority {
            Priority::Urgent => self.urgent,
            Priority::High => self.high,
            Priority::Medium => self.medium,
            Priority::Low => self.low,
        }
    }

    fn record(&mut self, priority: Priority) {
        match priority {
            Priority::Urgent => self.urgent += 1,
            Priority::High => self.high += 1,
            Priority::Medium => self.medium += 1,
            Priority::Low => self.low += 1,
        }
    }
}

/// Aggregate counters for the dashboard and list header.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskStats {
    pub total: usize,
    pub completed: usize,
    pub pending: usize,
    pub in_progress: usize,
    pub cancelled: usize,
    pub overdue: usize,
    pub due_today: usize,
    pub due_tomorrow: usize,
    /// Due within the Sunday-started week containing the reference day.
    pub this_week: usize,
    /// Rounded percentage; 0 for an empty collection.
    pub completion_rate: u32,
    pub priority_breakdown: PriorityBreakdown,
}

/// Computes counters against the day of `reference_now`.
pub fn stats<Tz: TimeZone>(tasks: &[Task], reference_now: &DateTime<Tz>) -> TaskStats {
    let today = reference_now.date_naive();
    let (week_start, week_end) = week_bounds(today);
    let mut stats = TaskStats {
        total: tasks.len(),
        ..TaskStats::default()
    };

    for task in tasks {
        match task.status {
            TaskStatus::Pending => stats.pending += 1,
            TaskStatus::InProgress => stats.in_progress += 1,
            TaskStatus::Completed => stats.completed += 1,
            TaskStatus::Cancelled => stats.cancelled += 1,
        }
        if is_overdue(task, today) {
            stats.overdue += 1;
        }
        if TaskFilter::DueToday.matches(task, today) {
            stats.due_today += 1;
        }
        if TaskFilter::DueTomorrow.matches(task, today) {
            stats.due_tomorrow += 1;
        }
        if task
            .due_date
            .is_some_and(|due| due >= week_start && due <= week_end)
        {
            stats.this_week += 1;
        }
        stats.priority_breakdown.record(task.priority);
    }

    stats.completion_rate = completion_rate(stats.completed, stats.total);
    stats
}

/// `round(100 * completed / total)` with halves rounded up; 0 when `total == 0`.
pub fn completion_rate(completed: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    ((completed * 200 + total) / (total * 2)) as u32
}

/// Sunday..=Saturday week containing `day`.
pub fn week_bounds(day: NaiveDate) -> (NaiveDate, NaiveDate) {
    let offset = u64::from(day.weekday().num_days_from_sunday());
    let start = day.checked_sub_days(Days::new(offset)).unwrap_or(day);
    let end = start.checked_add_days(Days::new(6)).unwrap_or(day);
    (start, end)
}

/// One day of the completion trend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendPoint {
    pub date: NaiveDate,
    pub completed_count: usize,
    pub is_today: bool,
}

impl TrendPoint {
    /// Short axis label, e.g. `Jan 5`.
    pub fn label(&self) -> String {
        self.date.format("%b %-d").to_string()
    }
}

/// Completed tasks per day for the 6 days before `reference_now` and the
/// reference day itself, oldest first.
///
/// A task counts on the day its `updated_at` falls on in the reference zone.
/// Days before `NaiveDate::MIN` clamp to it.
pub fn productivity_trend<Tz: TimeZone>(
    tasks: &[Task],
    reference_now: &DateTime<Tz>,
) -> [TrendPoint; TREND_DAYS] {
    let zone = reference_now.timezone();
    let today = reference_now.date_naive();
    let completed_days: Vec<NaiveDate> = tasks
        .iter()
        .filter(|task| task.is_completed())
        .map(|task| task.updated_at.with_timezone(&zone).date_naive())
        .collect();

    std::array::from_fn(|index| {
        let offset = (TREND_DAYS - 1 - index) as u64;
        let date = today
            .checked_sub_days(Days::new(offset))
            .unwrap_or(NaiveDate::MIN);
        TrendPoint {
            date,
            completed_count: completed_days.iter().filter(|day| **day == date).count(),
            is_today: index == TREND_DAYS - 1,
        }
    })
}

/// Bar-chart scale: the largest daily count, at least 1.
pub fn trend_scale(points: &[TrendPoint]) -> usize {
    points
        .iter()
        .map(|point| point.completed_count)
        .max()
        .unwrap_or(0)
        .max(1)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ActivityKind {
    Completed,
    Updated,
}

/// Dashboard feed entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityEntry {
    pub task_id: TaskId,
    pub title: String,
    pub kind: ActivityKind,
    pub at: DateTime<Utc>,
    pub priority: Priority,
}

/// The `limit` most recently updated tasks, newest first.
pub fn recent_activity(tasks: &[Task], limit: usize) -> Vec<ActivityEntry> {
    let mut recent: Vec<&Task> = tasks.iter().collect();
    recent.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
    recent
        .into_iter()
        .take(limit)
        .map(|task| ActivityEntry {
            task_id: task.id.clone(),
            title: task.title.clone(),
            kind: if task.is_completed() {
                ActivityKind::Completed
            } else {
                ActivityKind::Updated
            },
            at: task.updated_at,
            priority: task.priority,
        })
        .collect()
}
