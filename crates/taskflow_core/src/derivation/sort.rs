//! Stable list orderings.

use crate::model::task::Task;
use icu_collator::options::CollatorOptions;
use icu_collator::{Collator, CollatorBorrowed};
use log::warn;
use std::cmp::Ordering;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// List ordering key.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SortKey {
    /// Most urgent first.
    Priority,
    /// Earliest due first; undated tasks last.
    #[default]
    DueDate,
    /// Newest first.
    Created,
    /// Root-locale collation: accents and case are secondary to letters.
    Title,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseSortKeyError(String);

impl Display for ParseSortKeyError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "unknown sort key `{}`; expected priority|dueDate|created|title",
            self.0
        )
    }
}

impl Error for ParseSortKeyError {}

impl FromStr for SortKey {
    type Err = ParseSortKeyError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "priority" => Ok(Self::Priority),
            "dueDate" => Ok(Self::DueDate),
            "created" => Ok(Self::Created),
            "title" => Ok(Self::Title),
            other => Err(ParseSortKeyError(other.to_string())),
        }
    }
}

/// Returns a sorted copy. Equal elements keep their input order.
pub fn sort(tasks: &[Task], key: SortKey) -> Vec<Task> {
    let titles = TitleCollation::new();
    let mut sorted = tasks.to_vec();
    sorted.sort_by(|a, b| compare_with(&titles, a, b, key));
    sorted
}

/// Comparator used by [`sort`].
pub fn compare(a: &Task, b: &Task, key: SortKey) -> Ordering {
    compare_with(&TitleCollation::new(), a, b, key)
}

fn compare_with(titles: &TitleCollation, a: &Task, b: &Task, key: SortKey) -> Ordering {
    match key {
        SortKey::Priority => b.priority.rank().cmp(&a.priority.rank()),
        SortKey::DueDate => match (a.due_date, b.due_date) {
            (Some(left), Some(right)) => left.cmp(&right),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        },
        SortKey::Created => b.created_at.cmp(&a.created_at),
        SortKey::Title => titles.compare(&a.title, &b.title),
    }
}

/// Title comparator over the compiled root collation data.
struct TitleCollation {
    collator: Option<CollatorBorrowed<'static>>,
}

impl TitleCollation {
    fn new() -> Self {
        match Collator::try_new(Default::default(), CollatorOptions::default()) {
            Ok(collator) => Self {
                collator: Some(collator),
            },
            Err(err) => {
                warn!("event=title_collation module=derivation status=fallback error={err}");
                Self { collator: None }
            }
        }
    }

    // Code-point order breaks collation ties so the order stays total.
    fn compare(&self, left: &str, right: &str) -> Ordering {
        match &self.collator {
            Some(collator) => collator.compare(left, right).then_with(|| left.cmp(right)),
            None => left.cmp(right),
        }
    }
}
