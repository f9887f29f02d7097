//! Monday-start week buckets for the sheet view.

use chrono::{Datelike, Duration, NaiveDate};
use serde::Serialize;

use crate::month::YearMonth;

/// Sheets always show at least this many week rows.
pub const MIN_WEEKS: usize = 5;

/// Seven consecutive days, Monday first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Week {
    /// 1-based position in the grid
    pub number: usize,
    pub days: [NaiveDate; 7],
}

impl Week {
    fn starting(number: usize, monday: NaiveDate) -> Self {
        let days = std::array::from_fn(|i| monday + Duration::days(i as i64));
        Week { number, days }
    }

    pub fn start(&self) -> NaiveDate {
        self.days[0]
    }

    pub fn end(&self) -> NaiveDate {
        self.days[6]
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start() <= date && date <= self.end()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct WeekGrid {
    pub month: YearMonth,
    pub weeks: Vec<Week>,
}

impl WeekGrid {
    pub fn build(month: YearMonth) -> Self {
        let first = month.first_day();
        let last = month.last_day();
        let mut monday = first - Duration::days(first.weekday().num_days_from_monday() as i64);

        let mut weeks = Vec::new();
        while monday <= last || weeks.len() < 4 {
            weeks.push(Week::starting(weeks.len() + 1, monday));
            monday += Duration::days(7);
        }
        while weeks.len() < MIN_WEEKS {
            weeks.push(Week::starting(weeks.len() + 1, monday));
            monday += Duration::days(7);
        }

        log::debug!("Built week grid for {}: {} weeks", month, weeks.len());

        WeekGrid { month, weeks }
    }

    /// The week containing `date`, if it is on the grid.
    pub fn week_of(&self, date: NaiveDate) -> Option<&Week> {
        self.weeks.iter().find(|w| w.contains(date))
    }

    /// Date at a (week, day) coordinate; both 0-based.
    pub fn date_at(&self, week: usize, day: usize) -> Option<NaiveDate> {
        self.weeks.get(week).and_then(|w| w.days.get(day)).copied()
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.weeks.first().map(|w| w.start())
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.weeks.last().map(|w| w.end())
    }
}
