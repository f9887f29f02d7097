//! Six-week month grid.

use chrono::{Datelike, Duration, NaiveDate};
use serde::Serialize;

use crate::month::{WeekStart, YearMonth};

/// Number of cells in a month grid (6 rows of 7 days).
pub const GRID_CELLS: usize = 42;

/// One day of the month grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DayCell {
    pub date: NaiveDate,
    pub is_current_month: bool,
    pub is_today: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct MonthGrid {
    pub month: YearMonth,
    pub week_start: WeekStart,
    /// Number of leading cells taken from the previous month
    pub start_offset: usize,
    pub cells: Vec<DayCell>,
}

impl MonthGrid {
    /// Build the 42-cell grid for `month`.
    ///
    /// `today` is a calendar date already resolved in the viewer's zone; cells
    /// are compared to it by date, never by instant.
    pub fn build(month: YearMonth, today: NaiveDate, week_start: WeekStart) -> Self {
        let first = month.first_day();
        let start_offset = week_start.column_of(first.weekday()) as usize;
        let grid_start = first - Duration::days(start_offset as i64);

        let cells: Vec<DayCell> = grid_start
            .iter_days()
            .take(GRID_CELLS)
            .map(|date| DayCell {
                date,
                is_current_month: month.contains(date),
                is_today: date == today,
            })
            .collect();

        log::debug!(
            "Built month grid for {}: offset {}, {} to {}",
            month,
            start_offset,
            grid_start,
            cells.last().map(|c| c.date).unwrap_or(grid_start)
        );

        MonthGrid {
            month,
            week_start,
            start_offset,
            cells,
        }
    }

    /// Cells grouped into rows of 7.
    pub fn rows(&self) -> impl Iterator<Item = &[DayCell]> {
        self.cells.chunks(7)
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.cells.first().map(|c| c.date)
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.cells.last().map(|c| c.date)
    }
}
