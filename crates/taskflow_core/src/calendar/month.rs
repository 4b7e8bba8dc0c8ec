//! Month navigation and grid geometry.

use chrono::{Datelike, Days, Months, NaiveDate};

/// One displayed calendar month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CalendarMonth {
    first_day: NaiveDate,
    last_day: NaiveDate,
}

impl CalendarMonth {
    /// Returns `None` for an invalid month or one outside chrono's range.
    pub fn new(year: i32, month: u32) -> Option<Self> {
        let first_day = NaiveDate::from_ymd_opt(year, month, 1)?;
        let last_day = first_day
            .checked_add_months(Months::new(1))?
            .pred_opt()?;
        Some(Self {
            first_day,
            last_day,
        })
    }

    /// Month containing `date`.
    pub fn containing(date: NaiveDate) -> Option<Self> {
        Self::new(date.year(), date.month())
    }

    pub fn next(self) -> Option<Self> {
        Self::containing(self.first_day.checked_add_months(Months::new(1))?)
    }

    pub fn previous(self) -> Option<Self> {
        Self::containing(self.first_day.checked_sub_months(Months::new(1))?)
    }

    pub fn year(self) -> i32 {
        self.first_day.year()
    }

    pub fn month(self) -> u32 {
        self.first_day.month()
    }

    pub fn first_day(self) -> NaiveDate {
        self.first_day
    }

    pub fn last_day(self) -> NaiveDate {
        self.last_day
    }

    pub fn contains(self, date: NaiveDate) -> bool {
        date >= self.first_day && date <= self.last_day
    }

    /// Header title, e.g. `March 2024`.
    pub fn title(self) -> String {
        self.first_day.format("%B %Y").to_string()
    }

    /// Sunday on or before the first day through the Saturday on or after
    /// the last day.
    pub fn grid_days(self) -> Vec<NaiveDate> {
        let lead = u64::from(self.first_day.weekday().num_days_from_sunday());
        let trail = 6 - u64::from(self.last_day.weekday().num_days_from_sunday());
        let start = self
            .first_day
            .checked_sub_days(Days::new(lead))
            .unwrap_or(self.first_day);
        let end = self
            .last_day
            .checked_add_days(Days::new(trail))
            .unwrap_or(self.last_day);

        start.iter_days().take_while(|day| *day <= end).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::CalendarMonth;
    use chrono::{Datelike, NaiveDate, Weekday};

    #[test]
    fn rejects_invalid_month() {
        assert!(CalendarMonth::new(2024, 13).is_none());
        assert!(CalendarMonth::new(2024, 0).is_none());
    }

    #[test]
    fn grid_pads_to_full_weeks() {
        // March 2024 starts on a Friday and ends on a Sunday.
        let march = CalendarMonth::new(2024, 3).unwrap();
        let days = march.grid_days();
        assert_eq!(days.len() % 7, 0);
        assert_eq!(days.len(), 42);
        assert_eq!(days[0], NaiveDate::from_ymd_opt(2024, 2, 25).unwrap());
        assert_eq!(days[0].weekday(), Weekday::Sun);
        assert_eq!(days[41], NaiveDate::from_ymd_opt(2024, 4, 6).unwrap());
        assert_eq!(days[41].weekday(), Weekday::Sat);
    }

    #[test]
    fn grid_without_padding_when_month_aligns() {
        // February 2015 starts on Sunday and ends on Saturday.
        let feb = CalendarMonth::new(2015, 2).unwrap();
        assert_eq!(feb.grid_days().len(), 28);
    }

    #[test]
    fn navigation_wraps_years() {
        let december = CalendarMonth::new(2023, 12).unwrap();
        let january = december.next().unwrap();
        assert_eq!((january.year(), january.month()), (2024, 1));
        assert_eq!(january.previous(), Some(december));
        assert_eq!(december.last_day(), NaiveDate::from_ymd_opt(2023, 12, 31).unwrap());
        assert_eq!(january.title(), "January 2024");
    }

    #[test]
    fn leap_february_last_day() {
        let feb = CalendarMonth::new(2024, 2).unwrap();
        assert_eq!(feb.last_day(), NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
        assert!(feb.contains(NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()));
        assert!(!feb.contains(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()));
    }
}
