//! Human-readable due-date labels for list rows.

use chrono::{DateTime, NaiveDate, TimeZone};
use std::fmt::{Display, Formatter};

/// Relative classification of a due date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DueLabel {
    Today,
    Tomorrow,
    /// Before the reference day, regardless of status.
    Overdue(NaiveDate),
    Upcoming(NaiveDate),
}

impl Display for DueLabel {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Today => f.write_str("Today"),
            Self::Tomorrow => f.write_str("Tomorrow"),
            Self::Overdue(date) => write!(f, "Overdue ({})", date.format("%b %-d")),
            Self::Upcoming(date) => write!(f, "{}", date.format("%b %-d, %Y")),
        }
    }
}

pub fn due_label<Tz: TimeZone>(due_date: NaiveDate, reference_now: &DateTime<Tz>) -> DueLabel {
    let today = reference_now.date_naive();
    if due_date == today {
        DueLabel::Today
    } else if Some(due_date) == today.succ_opt() {
        DueLabel::Tomorrow
    } else if due_date < today {
        DueLabel::Overdue(due_date)
    } else {
        DueLabel::Upcoming(due_date)
    }
}

#[cfg(test)]
mod tests {
    use super::{due_label, DueLabel};
    use crate::derivation::test_support::utc;
    use chrono::NaiveDate;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn labels_relative_days() {
        let now = utc(2024, 3, 5, 10);
        assert_eq!(due_label(day(2024, 3, 5), &now), DueLabel::Today);
        assert_eq!(due_label(day(2024, 3, 6), &now), DueLabel::Tomorrow);
        assert_eq!(due_label(day(2024, 1, 1), &now).to_string(), "Overdue (Jan 1)");
        assert_eq!(due_label(day(2024, 3, 9), &now).to_string(), "Mar 9, 2024");
    }
}
