//! Scheduling core for plancal.
//!
//! This crate holds everything the calendar screens share:
//! - `local_date` and `month` for timezone-safe day keys and month math
//! - `grid` for the 42-cell month grid and the Monday-start week sheet
//! - `bucket` for grouping posts, meetings and tasks by day
//! - `edit` for the single-cell editor and its commit policy
//! - `store` and `cache` for the datastore seam and the per-id cache
//! - `board` and `agenda`, which tie the above to a store

pub mod agenda;
pub mod board;
pub mod bucket;
pub mod cache;
pub mod config;
pub mod date_range;
pub mod edit;
pub mod error;
pub mod grid;
pub mod local_date;
pub mod model;
pub mod month;
pub mod store;

pub use board::{Board, CommitOutcome, SheetRow};
pub use error::{PlanCalError, PlanCalResult};
pub use month::{WeekStart, YearMonth};
