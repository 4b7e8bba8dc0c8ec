//! Status/due-date filters and free-text search.

use crate::model::task::{Task, TaskStatus};
use chrono::{DateTime, NaiveDate, TimeZone};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Named list filter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum TaskFilter {
    #[default]
    All,
    Pending,
    Completed,
    /// Pending with a due date before the reference day.
    Overdue,
    DueToday,
    DueTomorrow,
}

impl TaskFilter {
    /// Returns whether `task` passes this filter on `today`.
    pub fn matches(self, task: &Task, today: NaiveDate) -> bool {
        match self {
            Self::All => true,
            Self::Pending => task.status == TaskStatus::Pending,
            Self::Completed => task.status == TaskStatus::Completed,
            Self::Overdue => is_overdue(task, today),
            Self::DueToday => task.due_date == Some(today),
            Self::DueTomorrow => task.due_date.is_some() && task.due_date == today.succ_opt(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseTaskFilterError(String);

impl Display for ParseTaskFilterError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "unknown task filter `{}`; expected all|pending|completed|overdue|dueToday|dueTomorrow",
            self.0
        )
    }
}

impl Error for ParseTaskFilterError {}

impl FromStr for TaskFilter {
    type Err = ParseTaskFilterError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "all" => Ok(Self::All),
            "pending" => Ok(Self::Pending),
            "completed" => Ok(Self::Completed),
            "overdue" => Ok(Self::Overdue),
            "dueToday" | "today" => Ok(Self::DueToday),
            "dueTomorrow" | "tomorrow" => Ok(Self::DueTomorrow),
            other => Err(ParseTaskFilterError(other.to_string())),
        }
    }
}

/// Pending, dated, and due strictly before `today`.
pub fn is_overdue(task: &Task, today: NaiveDate) -> bool {
    task.status == TaskStatus::Pending && task.due_date.is_some_and(|due| due < today)
}

/// Keeps tasks passing `which`, evaluated against the day of `reference_now`.
pub fn filter<Tz: TimeZone>(
    tasks: &[Task],
    which: TaskFilter,
    reference_now: &DateTime<Tz>,
) -> Vec<Task> {
    let today = reference_now.date_naive();
    tasks
        .iter()
        .filter(|task| which.matches(task, today))
        .cloned()
        .collect()
}

/// Case-insensitive substring search over title, description and tags.
///
/// A blank term keeps every task.
pub fn search(tasks: &[Task], term: &str) -> Vec<Task> {
    let needle = term.trim().to_lowercase();
    if needle.is_empty() {
        return tasks.to_vec();
    }
    tasks
        .iter()
        .filter(|task| matches_term(task, &needle))
        .cloned()
        .collect()
}

fn matches_term(task: &Task, needle: &str) -> bool {
    task.title.to_lowercase().contains(needle)
        || task.description.to_lowercase().contains(needle)
        || task
            .tags
            .iter()
            .any(|tag| tag.to_lowercase().contains(needle))
}

#[cfg(test)]
mod tests {
    use super::{filter, search, TaskFilter};
    use crate::derivation::test_support::{task, utc};
    use crate::model::task::TaskStatus;
    use chrono::NaiveDate;

    #[test]
    fn overdue_requires_pending_and_past_due() {
        let now = utc(2024, 1, 2, 9);
        let mut done = task("done", Some((2024, 1, 1)));
        done.status = TaskStatus::Completed;
        let mut started = task("started", Some((2024, 1, 1)));
        started.status = TaskStatus::InProgress;
        let late = task("late", Some((2024, 1, 1)));
        let today = task("today", Some((2024, 1, 2)));

        let tasks = vec![done, started, late, today];
        let overdue = filter(&tasks, TaskFilter::Overdue, &now);
        assert_eq!(overdue.len(), 1);
        assert_eq!(overdue[0].title, "late");
    }

    #[test]
    fn due_today_and_tomorrow_compare_calendar_days() {
        let now = utc(2024, 2, 28, 23);
        let tasks = vec![
            task("today", Some((2024, 2, 28))),
            task("tomorrow", Some((2024, 2, 29))),
            task("none", None),
        ];
        let today = filter(&tasks, TaskFilter::DueToday, &now);
        assert_eq!(today.len(), 1);
        assert_eq!(today[0].title, "today");

        let tomorrow = filter(&tasks, TaskFilter::DueTomorrow, &now);
        assert_eq!(tomorrow.len(), 1);
        assert_eq!(
            tomorrow[0].due_date,
            NaiveDate::from_ymd_opt(2024, 2, 29)
        );
    }

    #[test]
    fn all_is_identity() {
        let tasks = vec![task("a", None), task("b", Some((2020, 1, 1)))];
        assert_eq!(filter(&tasks, TaskFilter::All, &utc(2024, 1, 1, 0)), tasks);
    }

    #[test]
    fn search_matches_title_description_and_tags_case_insensitively() {
        let mut described = task("plain", None);
        described.description = "Call the BANK".to_string();
        let mut tagged = task("other", None);
        tagged.tags = vec!["Errands".to_string()];
        let titled = task("Bank statement", None);
        let unrelated = task("gym", None);
        let tasks = vec![described, tagged, titled, unrelated];

        let hits = search(&tasks, "bank");
        assert_eq!(hits.len(), 2);
        assert_eq!(search(&tasks, "errand").len(), 1);
        assert_eq!(search(&tasks, "  ").len(), 4);
    }

    #[test]
    fn parses_canonical_and_short_names() {
        assert_eq!("dueToday".parse::<TaskFilter>().unwrap(), TaskFilter::DueToday);
        assert_eq!("today".parse::<TaskFilter>().unwrap(), TaskFilter::DueToday);
        assert_eq!("tomorrow".parse::<TaskFilter>().unwrap(), TaskFilter::DueTomorrow);
        assert!("someday".parse::<TaskFilter>().is_err());
    }
}
