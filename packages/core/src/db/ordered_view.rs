//! Ordered projection of a shelf's positions
//!
//! Sorting is by `(PositionKey, item_id)`, so the result is a total order even
//! if two items ever share a key.

use crate::models::PositionKey;
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderedEntry {
    pub item_id: String,
    pub key: PositionKey,
}

/// Immutable, re-iterable item sequence derived from `item_id -> PositionKey`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderedView {
    entries: Vec<OrderedEntry>,
}

/// Neighbors an item would sit between after a move
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slot<'a> {
    pub lower: Option<&'a OrderedEntry>,
    pub upper: Option<&'a OrderedEntry>,
}

impl Slot<'_> {
    pub fn lower_key(&self) -> Option<PositionKey> {
        self.lower.map(|e| e.key)
    }

    pub fn upper_key(&self) -> Option<PositionKey> {
        self.upper.map(|e| e.key)
    }
}

impl OrderedView {
    /// Order an unordered position map
    pub fn order(item_positions: &HashMap<String, PositionKey>) -> Self {
        Self::from_entries(item_positions.iter().map(|(id, key)| OrderedEntry {
            item_id: id.clone(),
            key: *key,
        }))
    }

    pub fn from_entries(entries: impl IntoIterator<Item = OrderedEntry>) -> Self {
        let mut entries: Vec<OrderedEntry> = entries.into_iter().collect();
        entries.sort_by(|a, b| a.key.cmp(&b.key).then_with(|| a.item_id.cmp(&b.item_id)));
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, OrderedEntry> {
        self.entries.iter()
    }

    pub fn item_ids(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.iter().map(|e| e.item_id.as_str())
    }

    pub fn keys(&self) -> Vec<PositionKey> {
        self.entries.iter().map(|e| e.key).collect()
    }

    pub fn get(&self, index: usize) -> Option<&OrderedEntry> {
        self.entries.get(index)
    }

    pub fn index_of(&self, item_id: &str) -> Option<usize> {
        self.entries.iter().position(|e| e.item_id == item_id)
    }

    /// Copy of this view with one item taken out
    pub fn without(&self, item_id: &str) -> OrderedView {
        Self {
            entries: self
                .entries
                .iter()
                .filter(|e| e.item_id != item_id)
                .cloned()
                .collect(),
        }
    }

    /// Current neighbors of the entry at `index`
    pub fn neighbors_of(&self, index: usize) -> Slot<'_> {
        Slot {
            lower: index.checked_sub(1).and_then(|i| self.entries.get(i)),
            upper: self.entries.get(index + 1),
        }
    }

    /// Neighbors for a relative placement
    ///
    /// Returns `None` if `reference_item_id` is not in the view. Call this on a
    /// view that no longer contains the item being moved.
    pub fn slot_for(&self, reference_item_id: Option<&str>, before: bool) -> Option<Slot<'_>> {
        match reference_item_id {
            None if before => Some(Slot {
                lower: None,
                upper: self.entries.first(),
            }),
            None => Some(Slot {
                lower: self.entries.last(),
                upper: None,
            }),
            Some(reference) => {
                let index = self.index_of(reference)?;
                if before {
                    Some(Slot {
                        lower: index.checked_sub(1).and_then(|i| self.entries.get(i)),
                        upper: self.entries.get(index),
                    })
                } else {
                    Some(Slot {
                        lower: self.entries.get(index),
                        upper: self.entries.get(index + 1),
                    })
                }
            }
        }
    }
}

impl<'a> IntoIterator for &'a OrderedView {
    type Item = &'a OrderedEntry;
    type IntoIter = std::slice::Iter<'a, OrderedEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Ordered item IDs of a position map
pub fn order(item_positions: &HashMap<String, PositionKey>) -> Vec<String> {
    OrderedView::order(item_positions)
        .item_ids()
        .map(str::to_string)
        .collect()
}
