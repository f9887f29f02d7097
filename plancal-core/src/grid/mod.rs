//! Month and week grids for the calendar and sheet views.

mod month_grid;
mod week_grid;

pub use month_grid::{DayCell, MonthGrid, GRID_CELLS};
pub use week_grid::{Week, WeekGrid, MIN_WEEKS};
