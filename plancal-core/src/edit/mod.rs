//! In-place editing for the sheet view.
//!
//! [`CellEditor`] owns the single text-cell selection and
//! [`PlatformEditor`] the platform multi-select. Neither touches the store:
//! they emit commit requests, and [`commit`] turns a request plus the backing
//! row into a write plan.

pub mod commit;
mod editor;
mod platforms;

use chrono::NaiveDate;
use serde::Serialize;

use crate::model::PostField;

pub use commit::{CommitPlan, PlatformPlan, PostDefaults, plan_commit, plan_platforms};
pub use editor::{CellEditor, CommitRequest, EditEvent, EditState, Key};
pub use platforms::{PlatformCommit, PlatformEditor, PlatformEvent, PlatformState};

/// One editable (day, row, field) position of the sheet.
///
/// A day shows one row per post; `post_id` is `None` for the placeholder row
/// of a day without posts.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct CellId {
    pub date: NaiveDate,
    pub post_id: Option<String>,
    pub field: PostField,
}

impl CellId {
    pub fn new(date: NaiveDate, post_id: Option<&str>, field: PostField) -> Self {
        CellId {
            date,
            post_id: post_id.map(String::from),
            field,
        }
    }
}

/// The platform tags of one sheet row.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct RowId {
    pub date: NaiveDate,
    pub post_id: Option<String>,
}

impl RowId {
    pub fn new(date: NaiveDate, post_id: Option<&str>) -> Self {
        RowId {
            date,
            post_id: post_id.map(String::from),
        }
    }
}
