//! Keyed merging shared by both transforms.
//!
//! Seasonal deduplication keeps the first row seen for a key, and the
//! consolidator keeps the first non-blank value seen for a field. Both are
//! "first one wins" merges over an insertion-ordered map, expressed here once.

use std::collections::HashMap;

use crate::model::Cell;

/// Composite key identifying a student's subject.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RowKey {
    pub identifier: String,
    pub subject: String,
}

impl RowKey {
    /// Builds the key from the displayed text of the two cells, so that a
    /// numeric identifier and its textual spelling collide.
    pub fn new(identifier: &Cell, subject: &Cell) -> Self {
        Self {
            identifier: identifier.to_text(),
            subject: subject.to_text(),
        }
    }
}

/// Insertion-ordered map from [`RowKey`] to merged values.
#[derive(Debug, Clone)]
pub struct KeyedMerge<T> {
    index: HashMap<RowKey, usize>,
    entries: Vec<T>,
}

impl<T> Default for KeyedMerge<T> {
    fn default() -> Self {
        Self {
            index: HashMap::new(),
            entries: Vec::new(),
        }
    }
}

impl<T> KeyedMerge<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `value` unless `key` is already present. Returns whether the
    /// value was stored.
    pub fn insert_if_absent(&mut self, key: RowKey, value: T) -> bool {
        if self.index.contains_key(&key) {
            return false;
        }
        self.index.insert(key, self.entries.len());
        self.entries.push(value);
        true
    }

    /// Returns the value for `key`, creating it with `create` on first sight.
    pub fn get_or_insert_with(&mut self, key: RowKey, create: impl FnOnce() -> T) -> &mut T {
        let position = match self.index.get(&key) {
            Some(position) => *position,
            None => {
                let position = self.entries.len();
                self.entries.push(create());
                self.index.insert(key, position);
                position
            }
        };
        &mut self.entries[position]
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Consumes the merge, yielding values in first-insertion order.
    pub fn into_values(self) -> Vec<T> {
        self.entries
    }
}

/// Copies `value` into `slot` only when the slot is blank. Returns whether the
/// slot changed.
pub fn fill_if_blank(slot: &mut Cell, value: &Cell) -> bool {
    if slot.is_blank() && !value.is_blank() {
        *slot = value.clone();
        true
    } else {
        false
    }
}
