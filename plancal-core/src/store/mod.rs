//! The datastore seam.
//!
//! The calendar only needs a few things from a store: "rows dated inside a
//! range", "write this row by id" and "change one part of the stored row".
//! Child rows (platform targets,
//! attendees) are looked up by parent id. Everything else about the backing
//! store stays opaque.

mod dir;
mod memory;

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::date_range::DateRange;
use crate::error::{PlanCalError, PlanCalResult};

pub use dir::DirTable;
pub use memory::MemoryTable;

/// A row that can live in a [`Table`].
pub trait Record: Clone + Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Table name, used for directories and error messages
    const TABLE: &'static str;

    /// Empty until the store assigns one.
    fn id(&self) -> &str;

    fn set_id(&mut self, id: String);

    /// `YYYY-MM-DD` day used for range queries, if the row is dated.
    fn date(&self) -> Option<&str> {
        None
    }

    /// Owning row for child tables.
    fn parent_id(&self) -> Option<&str> {
        None
    }

    /// Short human-readable name.
    fn label(&self) -> &str;
}

/// In-place change applied to the stored copy of a row by [`Table::patch`].
pub type Patch<R> = Box<dyn FnOnce(&mut R) -> PlanCalResult<()> + Send>;

/// Async table access. Implementations are last-write-wins.
#[async_trait]
pub trait Table<R: Record>: Send + Sync {
    /// Rows whose date falls in `range`. Undated rows are never returned.
    async fn list_in_range(&self, range: &DateRange) -> PlanCalResult<Vec<R>>;

    /// Rows whose parent id is `parent_id`.
    async fn list_children(&self, parent_id: &str) -> PlanCalResult<Vec<R>>;

    async fn get(&self, id: &str) -> PlanCalResult<Option<R>>;

    /// Insert or replace by id. A row with an empty id is inserted under a
    /// fresh id. Returns the row as stored.
    async fn upsert(&self, row: R) -> PlanCalResult<R>;

    /// Read the stored row, apply `change` to it and write it back. Parts of
    /// the row `change` does not touch keep their stored values, whatever the
    /// caller has cached. A missing row is `NotFound`; a failing `change`
    /// writes nothing.
    async fn patch(&self, id: &str, change: Patch<R>) -> PlanCalResult<R>;

    /// Delete by id. Deleting a missing row is not an error.
    async fn delete(&self, id: &str) -> PlanCalResult<()>;
}

/// Write child rows one awaited call at a time. Stops at the first failure
/// and reports how many rows made it; nothing is rolled back.
pub async fn write_children<R, T>(table: &T, rows: Vec<R>) -> PlanCalResult<Vec<R>>
where
    R: Record,
    T: Table<R> + ?Sized,
{
    let total = rows.len();
    let mut written = Vec::with_capacity(total);

    for row in rows {
        match table.upsert(row).await {
            Ok(saved) => written.push(saved),
            Err(e) => {
                log::error!(
                    "Wrote {} of {} {} rows before failing: {}",
                    written.len(),
                    total,
                    R::TABLE,
                    e
                );
                return Err(PlanCalError::PartialWrite {
                    table: R::TABLE,
                    written: written.len(),
                    total,
                    source: Box::new(e),
                });
            }
        }
    }

    Ok(written)
}

pub(crate) fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Whether `row` should be returned for `range`.
pub(crate) fn in_range<R: Record>(row: &R, range: &DateRange) -> bool {
    row.date()
        .and_then(crate::local_date::date_key)
        .is_some_and(|d| range.contains(d))
}
