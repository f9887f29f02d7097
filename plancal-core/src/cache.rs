//! Rows cached by id.
//!
//! Writes update the cache one id at a time instead of reloading the whole
//! month. A failed write marks its id stale; [`RecordCache::take_stale`] hands
//! those ids back to be fetched again.

use std::collections::{BTreeSet, HashMap};

use crate::store::Record;

pub struct RecordCache<R: Record> {
    rows: HashMap<String, R>,
    stale: BTreeSet<String>,
}

impl<R: Record> Default for RecordCache<R> {
    fn default() -> Self {
        RecordCache {
            rows: HashMap::new(),
            stale: BTreeSet::new(),
        }
    }
}

impl<R: Record> RecordCache<R> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop everything and cache `rows`.
    pub fn replace_all(&mut self, rows: impl IntoIterator<Item = R>) {
        self.rows.clear();
        self.stale.clear();
        for row in rows {
            self.put(row);
        }
    }

    pub fn put(&mut self, row: R) {
        self.stale.remove(row.id());
        self.rows.insert(row.id().to_string(), row);
    }

    pub fn remove(&mut self, id: &str) -> Option<R> {
        self.stale.remove(id);
        self.rows.remove(id)
    }

    /// Mark `id` as possibly out of date with the store.
    pub fn invalidate(&mut self, id: &str) {
        if !id.is_empty() {
            self.stale.insert(id.to_string());
        }
    }

    pub fn is_stale(&self, id: &str) -> bool {
        self.stale.contains(id)
    }

    /// Stale ids, clearing the stale set.
    pub fn take_stale(&mut self) -> Vec<String> {
        std::mem::take(&mut self.stale).into_iter().collect()
    }

    pub fn get(&self, id: &str) -> Option<&R> {
        self.rows.get(id)
    }

    pub fn values(&self) -> impl Iterator<Item = &R> {
        self.rows.values()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
