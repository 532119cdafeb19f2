//! Keyed enter/update/exit reconciliation.
//!
//! A `KeyedJoin` owns the persistent elements of one visual layer. Each pass
//! receives the new ordered key sequence: keys already present keep their
//! element (update), new keys get a freshly created element (enter) and
//! elements whose key disappeared are dropped on the spot (exit). Stored
//! order always follows the latest sequence.

use std::hash::Hash;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct JoinSummary {
    pub entered: usize,
    pub updated: usize,
    pub exited: usize,
}

impl JoinSummary {
    #[must_use]
    pub fn is_structural(self) -> bool {
        self.entered > 0 || self.exited > 0
    }

    pub fn accumulate(&mut self, other: Self) {
        self.entered += other.entered;
        self.updated += other.updated;
        self.exited += other.exited;
    }
}

#[derive(Debug, Clone)]
pub struct KeyedJoin<K, E> {
    elements: IndexMap<K, E>,
}

impl<K, E> Default for KeyedJoin<K, E> {
    fn default() -> Self {
        Self {
            elements: IndexMap::new(),
        }
    }
}

impl<K: Hash + Eq + Copy, E> KeyedJoin<K, E> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Joins `keys` against the stored elements.
    ///
    /// `enter` receives the position in the new sequence and the key. Keys
    /// must be unique within one sequence.
    pub fn reconcile<I, F>(&mut self, keys: I, mut enter: F) -> JoinSummary
    where
        I: IntoIterator<Item = K>,
        F: FnMut(usize, K) -> E,
    {
        let mut previous = std::mem::take(&mut self.elements);
        let mut summary = JoinSummary::default();

        for (index, key) in keys.into_iter().enumerate() {
            let element = match previous.swap_remove(&key) {
                Some(kept) => {
                    summary.updated += 1;
                    kept
                }
                None => {
                    summary.entered += 1;
                    enter(index, key)
                }
            };
            self.elements.insert(key, element);
        }

        summary.exited = previous.len();
        summary
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    #[must_use]
    pub fn get(&self, key: &K) -> Option<&E> {
        self.elements.get(key)
    }

    #[must_use]
    pub fn get_index(&self, index: usize) -> Option<(&K, &E)> {
        self.elements.get_index(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, &E)> {
        self.elements.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&K, &mut E)> {
        self.elements.iter_mut()
    }

    pub fn values(&self) -> impl Iterator<Item = &E> {
        self.elements.values()
    }

    pub fn values_mut(&mut self) -> impl Iterator<Item = &mut E> {
        self.elements.values_mut()
    }

    pub fn clear(&mut self) -> usize {
        let removed = self.elements.len();
        self.elements.clear();
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::{JoinSummary, KeyedJoin};

    #[test]
    fn first_pass_enters_everything() {
        let mut join: KeyedJoin<u32, String> = KeyedJoin::new();
        let summary = join.reconcile([1, 2, 3], |index, key| format!("{index}:{key}"));
        assert_eq!(
            summary,
            JoinSummary {
                entered: 3,
                updated: 0,
                exited: 0
            }
        );
        assert_eq!(join.get(&2).map(String::as_str), Some("1:2"));
    }

    #[test]
    fn removal_exits_only_the_missing_key_and_keeps_survivor_state() {
        let mut join: KeyedJoin<u32, String> = KeyedJoin::new();
        join.reconcile([10, 20, 30, 40], |index, _| format!("created-at-{index}"));

        let summary = join.reconcile([10, 30, 40], |_, _| "fresh".to_owned());
        assert_eq!(summary.entered, 0);
        assert_eq!(summary.updated, 3);
        assert_eq!(summary.exited, 1);
        assert!(summary.is_structural());

        // Survivors keep the element created in the first pass.
        assert_eq!(join.get(&30).map(String::as_str), Some("created-at-2"));
        let order: Vec<u32> = join.iter().map(|(key, _)| *key).collect();
        assert_eq!(order, vec![10, 30, 40]);
    }

    #[test]
    fn stored_order_follows_new_sequence() {
        let mut join: KeyedJoin<u32, u32> = KeyedJoin::new();
        join.reconcile([1, 2, 3], |_, key| key * 10);
        let summary = join.reconcile([3, 4, 1], |_, key| key * 100);
        assert_eq!(summary.entered, 1);
        assert_eq!(summary.exited, 1);
        let values: Vec<u32> = join.values().copied().collect();
        assert_eq!(values, vec![30, 400, 10]);
    }

    #[test]
    fn empty_sequence_exits_all() {
        let mut join: KeyedJoin<u32, u32> = KeyedJoin::new();
        join.reconcile([1, 2], |_, key| key);
        let summary = join.reconcile(std::iter::empty(), |_, key| key);
        assert_eq!(summary.exited, 2);
        assert!(join.is_empty());
    }
}
