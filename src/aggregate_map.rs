//! Keyed collection of aggregates with upsert and merge.
//!
//! Entries live in an append-only vector so the traversal order is the
//! first-insertion order, while a hash index over the composite key keeps
//! lookups constant time. Each key appears at most once.

use std::collections::HashMap;

use crate::entry::{Aggregate, Key};

#[derive(Debug, Clone, Default)]
pub struct KeyedAggregateMap {
    entries: Vec<(Key, Aggregate)>,
    index: HashMap<Key, usize>,
}

impl KeyedAggregateMap {
    pub fn new() -> KeyedAggregateMap {
        KeyedAggregateMap::default()
    }

    /// Fold one reading into the aggregate of `key`, creating it when absent.
    pub fn upsert(&mut self, key: Key, value: f64) {
        match self.index.get(&key) {
            Some(&slot) => self.entries[slot].1.push(value),
            None => self.insert(key, Aggregate::new(value)),
        }
    }

    /// Combine every entry of `other` into this map.
    ///
    /// Absent keys are copied over, present keys are merged pairwise. The
    /// operation is commutative and associative up to floating point
    /// rounding of `sum`.
    pub fn merge(&mut self, other: &KeyedAggregateMap) {
        for (key, aggregate) in other.iter() {
            match self.index.get(key) {
                Some(&slot) => {
                    let merged = self.entries[slot].1.merge(aggregate);
                    self.entries[slot].1 = merged;
                }
                None => self.insert(key.clone(), *aggregate),
            }
        }
    }

    pub fn get(&self, key: &Key) -> Option<&Aggregate> {
        self.index.get(key).map(|&slot| &self.entries[slot].1)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in first-insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&Key, &Aggregate)> {
        self.entries.iter().map(|(key, aggregate)| (key, aggregate))
    }

    /// Entries ordered by device, year, month and sensor.
    pub fn sorted(&self) -> Vec<(&Key, &Aggregate)> {
        let mut rows: Vec<_> = self.iter().collect();
        rows.sort_by(|(left, _), (right, _)| left.cmp(right));
        rows
    }

    fn insert(&mut self, key: Key, aggregate: Aggregate) {
        self.index.insert(key.clone(), self.entries.len());
        self.entries.push((key, aggregate));
    }
}
