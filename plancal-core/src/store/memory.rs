//! In-memory table, used by tests and as a scratch store.

use async_trait::async_trait;
use tokio::sync::Mutex;

use super::{Patch, Record, Table, in_range, new_id};
use crate::date_range::DateRange;
use crate::error::{PlanCalError, PlanCalResult};

/// Rows kept in insertion order.
///
/// `fail_next(n)` makes the next `n` calls fail with a store error, so
/// callers can exercise their failure paths.
pub struct MemoryTable<R: Record> {
    rows: Mutex<Vec<R>>,
    failures: Mutex<u32>,
}

impl<R: Record> Default for MemoryTable<R> {
    fn default() -> Self {
        MemoryTable {
            rows: Mutex::new(Vec::new()),
            failures: Mutex::new(0),
        }
    }
}

impl<R: Record> MemoryTable<R> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next `n` calls fail.
    pub async fn fail_next(&self, n: u32) {
        *self.failures.lock().await = n;
    }

    pub async fn len(&self) -> usize {
        self.rows.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    async fn check(&self, op: &str) -> PlanCalResult<()> {
        let mut failures = self.failures.lock().await;
        if *failures > 0 {
            *failures -= 1;
            log::debug!("Memory table {}: failing a {}", R::TABLE, op);
            return Err(PlanCalError::Store(format!("{} {} failed", R::TABLE, op)));
        }
        Ok(())
    }
}

#[async_trait]
impl<R: Record> Table<R> for MemoryTable<R> {
    async fn list_in_range(&self, range: &DateRange) -> PlanCalResult<Vec<R>> {
        self.check("list").await?;
        let mut rows: Vec<R> = self
            .rows
            .lock()
            .await
            .iter()
            .filter(|r| in_range(*r, range))
            .cloned()
            .collect();
        rows.sort_by(|a, b| a.date().cmp(&b.date()));
        Ok(rows)
    }

    async fn list_children(&self, parent_id: &str) -> PlanCalResult<Vec<R>> {
        self.check("list").await?;
        Ok(self
            .rows
            .lock()
            .await
            .iter()
            .filter(|r| r.parent_id() == Some(parent_id))
            .cloned()
            .collect())
    }

    async fn get(&self, id: &str) -> PlanCalResult<Option<R>> {
        self.check("get").await?;
        Ok(self.rows.lock().await.iter().find(|r| r.id() == id).cloned())
    }

    async fn upsert(&self, mut row: R) -> PlanCalResult<R> {
        self.check("upsert").await?;
        if row.id().is_empty() {
            row.set_id(new_id());
        }

        let mut rows = self.rows.lock().await;
        match rows.iter_mut().find(|r| r.id() == row.id()) {
            Some(existing) => *existing = row.clone(),
            None => rows.push(row.clone()),
        }
        Ok(row)
    }

    async fn patch(&self, id: &str, change: Patch<R>) -> PlanCalResult<R> {
        self.check("patch").await?;

        let mut rows = self.rows.lock().await;
        let existing = rows
            .iter_mut()
            .find(|r| r.id() == id)
            .ok_or_else(|| PlanCalError::NotFound {
                table: R::TABLE,
                id: id.to_string(),
            })?;

        let mut row = existing.clone();
        change(&mut row)?;
        *existing = row.clone();
        Ok(row)
    }

    async fn delete(&self, id: &str) -> PlanCalResult<()> {
        self.check("delete").await?;
        self.rows.lock().await.retain(|r| r.id() != id);
        Ok(())
    }
}
