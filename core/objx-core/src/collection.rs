//! Indexed Collection: records plus one navigable index per attribute
//!
//! All mutations take the write lock, so a reader sees either the record
//! before an update or after it, never both and never neither.

use crate::error::{ObjxError, ObjxResult};
use crate::index::{NavigableIndex, RowId};
use crate::plan::ExecutableQuery;
use crate::record::Record;
use crate::registry::AttributeRegistry;
use parking_lot::RwLock;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use tracing::debug;

struct CollectionState<R> {
    /// Row id → record; iteration order is insertion order
    rows: BTreeMap<RowId, R>,
    /// Parallel to the registry's attributes
    indexes: Vec<NavigableIndex>,
    next_row_id: RowId,
}

/// Thread-safe collection answering [`ExecutableQuery`] through its indexes.
pub struct IndexedCollection<R: Record> {
    registry: Arc<AttributeRegistry<R>>,
    state: RwLock<CollectionState<R>>,
}

impl<R: Record> IndexedCollection<R> {
    pub fn new(registry: Arc<AttributeRegistry<R>>) -> Self {
        let indexes = (0..registry.len()).map(|_| NavigableIndex::new()).collect();
        Self {
            registry,
            state: RwLock::new(CollectionState {
                rows: BTreeMap::new(),
                indexes,
                next_row_id: 0,
            }),
        }
    }

    pub fn registry(&self) -> &Arc<AttributeRegistry<R>> {
        &self.registry
    }

    /// Adds a record without any identity check.
    pub fn insert(&self, record: R) -> RowId {
        let mut state = self.state.write();
        let row_id = state.next_row_id;
        state.next_row_id += 1;

        for (attribute, index) in self.registry.iter().zip(state.indexes.iter_mut()) {
            index.insert(attribute.value_of(&record), row_id);
        }
        state.rows.insert(row_id, record);
        row_id
    }

    /// Replaces the record at `row_id`, returning the previous one.
    ///
    /// Record and index entries are swapped under one write lock.
    pub fn update(&self, row_id: RowId, record: R) -> ObjxResult<R> {
        let mut guard = self.state.write();
        let state = &mut *guard;

        let Some(slot) = state.rows.get_mut(&row_id) else {
            return Err(ObjxError::engine(
                format!("row {row_id} does not exist"),
                "indexed collection update",
            ));
        };

        for (attribute, index) in self.registry.iter().zip(state.indexes.iter_mut()) {
            let before = attribute.value_of(slot);
            let after = attribute.value_of(&record);
            if before != after {
                index.remove(&before, row_id);
                index.insert(after, row_id);
            }
        }
        debug!(row_id, "record replaced");
        Ok(std::mem::replace(slot, record))
    }

    /// Records matching `query`, in insertion order.
    pub fn retrieve(&self, query: &ExecutableQuery) -> Vec<(RowId, R)> {
        let state = self.state.read();
        Self::matching(&state, query)
            .into_iter()
            .filter_map(|row_id| state.rows.get(&row_id).map(|r| (row_id, r.clone())))
            .collect()
    }

    /// Every record, in insertion order.
    pub fn all(&self) -> Vec<R> {
        self.state.read().rows.values().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.state.read().rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn matching(state: &CollectionState<R>, query: &ExecutableQuery) -> BTreeSet<RowId> {
        match query {
            ExecutableQuery::Equal { attr, value } => state
                .indexes
                .get(*attr)
                .map(|index| index.equal(value).into_iter().collect())
                .unwrap_or_default(),
            ExecutableQuery::GreaterThan { attr, value } => state
                .indexes
                .get(*attr)
                .map(|index| index.greater_than(value).into_iter().collect())
                .unwrap_or_default(),
            ExecutableQuery::LessThan { attr, value } => state
                .indexes
                .get(*attr)
                .map(|index| index.less_than(value).into_iter().collect())
                .unwrap_or_default(),
            ExecutableQuery::And(children) => {
                let mut sets = children.iter().map(|child| Self::matching(state, child));
                let Some(mut acc) = sets.next() else {
                    return BTreeSet::new();
                };
                for set in sets {
                    if acc.is_empty() {
                        break;
                    }
                    acc.retain(|row_id| set.contains(row_id));
                }
                acc
            }
            ExecutableQuery::Or(children) => children
                .iter()
                .flat_map(|child| Self::matching(state, child))
                .collect(),
            ExecutableQuery::Not(inner) => {
                let excluded = Self::matching(state, inner);
                state
                    .rows
                    .keys()
                    .copied()
                    .filter(|row_id| !excluded.contains(row_id))
                    .collect()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::parser::parse;
    use crate::test_support::Item;

    fn collection() -> IndexedCollection<Item> {
        let collection = IndexedCollection::new(Arc::new(AttributeRegistry::build()));
        collection.insert(Item::new(1, "apple", 1.5, 10));
        collection.insert(Item::new(2, "pear", 2.0, 0));
        collection.insert(Item::new(3, "plum", 0.5, 7));
        collection
    }

    fn ids(collection: &IndexedCollection<Item>, query: &str) -> Vec<i64> {
        let plan = ExecutableQuery::from_expr(&parse(query).unwrap(), collection.registry()).unwrap();
        collection.retrieve(&plan).into_iter().map(|(_, r)| r.id).collect()
    }

    #[test]
    fn comparisons_use_indexes() {
        let c = collection();
        assert_eq!(ids(&c, "equal(name,'pear')"), vec![2]);
        assert_eq!(ids(&c, "greater_than(price,1)"), vec![1, 2]);
        assert_eq!(ids(&c, "less_than(stock,8)"), vec![2, 3]);
    }

    #[test]
    fn logical_operators() {
        let c = collection();
        assert_eq!(ids(&c, "and(greater_than(price,1),greater_than(stock,1))"), vec![1]);
        assert_eq!(ids(&c, "or(equal(id,3),equal(id,1))"), vec![1, 3]);
        assert_eq!(ids(&c, "not(equal(id,2))"), vec![1, 3]);
        assert_eq!(
            ids(&c, "not(or(equal(id,1),and(equal(id,2),less_than(stock,1))))"),
            vec![3]
        );
    }

    #[test]
    fn null_is_only_matched_by_equality() {
        let c = collection();
        let mut noted = Item::new(4, "fig", 3.0, 1);
        noted.note = Some("ripe".to_string());
        c.insert(noted);

        assert_eq!(ids(&c, "equal(note,null)"), vec![1, 2, 3]);
        assert_eq!(ids(&c, "greater_than(note,'a')"), vec![4]);
        assert_eq!(ids(&c, "less_than(note,'z')"), vec![4]);
    }

    #[test]
    fn insert_does_not_check_identity() {
        let c = collection();
        c.insert(Item::new(1, "apple again", 1.0, 1));
        assert_eq!(c.len(), 4);
        assert_eq!(ids(&c, "equal(id,1)"), vec![1, 1]);
    }

    #[test]
    fn update_swaps_index_entries() {
        let c = collection();
        let previous = c.update(1, Item::new(2, "quince", 9.0, 0)).unwrap();
        assert_eq!(previous.name, "pear");

        assert_eq!(ids(&c, "equal(name,'pear')"), Vec::<i64>::new());
        assert_eq!(ids(&c, "equal(name,'quince')"), vec![2]);
        assert_eq!(ids(&c, "greater_than(price,5)"), vec![2]);
        assert_eq!(c.len(), 3);
    }

    #[test]
    fn update_keeps_row_position() {
        let c = collection();
        c.update(0, Item::new(1, "apple", 1.5, 99)).unwrap();
        let names: Vec<String> = c.all().into_iter().map(|r| r.name).collect();
        assert_eq!(names, vec!["apple", "pear", "plum"]);
    }

    #[test]
    fn update_unknown_row() {
        let c = collection();
        assert!(matches!(
            c.update(42, Item::new(9, "x", 0.0, 0)),
            Err(ObjxError::EngineFailure { .. })
        ));
    }

    #[test]
    fn empty_collection() {
        let c: IndexedCollection<Item> = IndexedCollection::new(Arc::new(AttributeRegistry::build()));
        assert!(c.is_empty());
        assert!(c.all().is_empty());
        assert_eq!(ids(&c, "not(equal(id,1))"), Vec::<i64>::new());
    }
}
