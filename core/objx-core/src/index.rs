//! Navigable Index for attribute lookups
//!
//! Ordered index supporting equality and strict range lookups in
//! O(log N + K).

use crate::value::Value;
use smallvec::SmallVec;
use std::collections::BTreeMap;
use std::ops::Bound;

/// Stable row identifier inside an indexed collection.
pub type RowId = usize;

type Postings = SmallVec<[RowId; 4]>;

/// Navigable Index structure
///
/// Structure: value → row ids holding that value
#[derive(Debug, Default)]
pub struct NavigableIndex {
    entries: BTreeMap<Value, Postings>,
}

impl NavigableIndex {
    /// Create a new empty index
    pub fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// Update index on insert
    pub fn insert(&mut self, value: Value, row_id: RowId) {
        self.entries.entry(value).or_default().push(row_id);
    }

    /// Update index on delete
    pub fn remove(&mut self, value: &Value, row_id: RowId) {
        if let Some(row_ids) = self.entries.get_mut(value) {
            row_ids.retain(|id| *id != row_id);
            if row_ids.is_empty() {
                self.entries.remove(value);
            }
        }
    }

    /// Row ids whose value equals `value`
    pub fn equal(&self, value: &Value) -> Vec<RowId> {
        self.entries
            .get(value)
            .map(|ids| ids.to_vec())
            .unwrap_or_default()
    }

    /// Row ids whose value is strictly greater than `value`
    ///
    /// Null entries never match a range.
    pub fn greater_than(&self, value: &Value) -> Vec<RowId> {
        self.collect_range((Bound::Excluded(value), Bound::Unbounded))
    }

    /// Row ids whose value is strictly less than `value`
    pub fn less_than(&self, value: &Value) -> Vec<RowId> {
        self.collect_range((Bound::Unbounded, Bound::Excluded(value)))
    }

    fn collect_range(&self, range: (Bound<&Value>, Bound<&Value>)) -> Vec<RowId> {
        self.entries
            .range::<Value, _>(range)
            .filter(|(value, _)| !value.is_null())
            .flat_map(|(_, ids)| ids.iter().copied())
            .collect()
    }

    /// Number of distinct values
    pub fn distinct_values(&self) -> usize {
        self.entries.len()
    }
}
