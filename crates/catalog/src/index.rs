//! In-memory keyed collection of content records.
//!
//! The index is filled once during loading and is read-only afterwards;
//! records are shared out as `Arc`s so query results never copy them.

use rand::Rng;
use shared::ContentRecord;
use std::collections::HashMap;
use std::sync::Arc;

/// Number of leading records the hero pick is drawn from
pub const HERO_POOL_SIZE: usize = 50;

/// Records in load order plus an id → position map
#[derive(Debug, Clone, Default)]
pub struct ContentIndex {
    records: Vec<Arc<ContentRecord>>,
    positions: HashMap<String, usize>,
}

impl ContentIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an index from records in load order
    pub fn from_records(records: impl IntoIterator<Item = ContentRecord>) -> Self {
        let mut index = Self::new();
        for record in records {
            index.insert(record);
        }
        index
    }

    /// Insert a record; an existing id is replaced wholesale (no field merge)
    /// and keeps its original enumeration position
    ///
    /// Returns true when the id was already present.
    pub fn insert(&mut self, record: ContentRecord) -> bool {
        match self.positions.get(&record.id) {
            Some(&pos) => {
                self.records[pos] = Arc::new(record);
                true
            }
            None => {
                self.positions.insert(record.id.clone(), self.records.len());
                self.records.push(Arc::new(record));
                false
            }
        }
    }

    pub fn get_by_id(&self, id: &str) -> Option<Arc<ContentRecord>> {
        self.positions
            .get(id)
            .map(|&pos| Arc::clone(&self.records[pos]))
    }

    /// Look up several ids, keeping input order and skipping unknown ids
    pub fn get_by_ids<S: AsRef<str>>(&self, ids: &[S]) -> Vec<Arc<ContentRecord>> {
        ids.iter()
            .filter_map(|id| self.get_by_id(id.as_ref()))
            .collect()
    }

    /// Snapshot of every record in enumeration order
    pub fn get_all(&self) -> Vec<Arc<ContentRecord>> {
        self.records.clone()
    }

    /// Uniform pick from the first `min(pool_size, len)` records
    pub fn get_random(&self, pool_size: usize) -> Option<Arc<ContentRecord>> {
        let pool = pool_size.max(1).min(self.records.len());
        if pool == 0 {
            return None;
        }
        let pick = rand::rng().random_range(0..pool);
        Some(Arc::clone(&self.records[pick]))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<ContentRecord>> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Owned copies of all records, for persisting
    pub fn to_records(&self) -> Vec<ContentRecord> {
        self.records.iter().map(|r| (**r).clone()).collect()
    }
}
