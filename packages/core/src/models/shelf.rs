//! Shelf and Item Data Structures
//!
//! A `Shelf` is a user-curated, ordered collection of `Item`s. Ordering is kept
//! as an edge attribute: the shelf maps each `item_id` to a `PositionKey`, and
//! items themselves never see their key.
//!
//! # Invariants
//!
//! - `items` and `item_positions` always have the same key set
//! - all position keys within a shelf are pairwise distinct
//!
//! Both are checked by [`Shelf::validate`]; the store refuses to publish a
//! snapshot that fails validation.
//!
//! # Examples
//!
//! ```rust
//! use shelfspace_core::models::{Item, Shelf};
//! use serde_json::json;
//!
//! let shelf = Shelf::new("Reading list".to_string());
//! let item = Item::new_with_id("book-1".to_string(), "Dune".to_string(), json!({}));
//!
//! assert!(shelf.is_empty());
//! assert!(!shelf.contains(&item.id));
//! assert!(shelf.validate().is_ok());
//! ```

use crate::db::OrderedView;
use crate::models::PositionKey;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use uuid::Uuid;

/// An entry on a shelf
///
/// The payload (`content`, `properties`) is irrelevant to ordering; only `id`
/// takes part in it, and it never changes once assigned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    /// Stable unique identifier
    pub id: String,

    /// Primary display content
    pub content: String,

    /// Arbitrary item payload
    pub properties: serde_json::Value,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

impl Item {
    /// Create an item with an auto-generated UUID
    pub fn new(content: String, properties: serde_json::Value) -> Self {
        Self::new_with_id(Uuid::new_v4().to_string(), content, properties)
    }

    /// Create an item with a caller-provided ID
    pub fn new_with_id(id: String, content: String, properties: serde_json::Value) -> Self {
        Self {
            id,
            content,
            properties,
            created_at: Utc::now(),
        }
    }
}

/// Ordered collection aggregate
///
/// Shelves are treated as immutable snapshots by the store: every committed
/// mutation produces a new `Shelf` with `version` incremented, and readers keep
/// whichever snapshot they fetched. The mutators below are therefore
/// crate-private and only called on a fresh copy by the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shelf {
    /// Unique shelf identifier
    pub id: String,

    /// Display name
    pub name: String,

    items: HashMap<String, Item>,

    item_positions: HashMap<String, PositionKey>,

    /// Number of full rebalances applied to this shelf
    pub rebalance_count: u64,

    /// Snapshot version, incremented on every committed mutation
    pub version: u64,

    /// Timestamp of the last committed mutation
    pub modified_at: DateTime<Utc>,
}

impl Shelf {
    /// Create an empty shelf with an auto-generated UUID
    pub fn new(name: String) -> Self {
        Self::new_with_id(Uuid::new_v4().to_string(), name)
    }

    /// Create an empty shelf with a caller-provided ID
    pub fn new_with_id(id: String, name: String) -> Self {
        Self {
            id,
            name,
            items: HashMap::new(),
            item_positions: HashMap::new(),
            rebalance_count: 0,
            version: 0,
            modified_at: Utc::now(),
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn contains(&self, item_id: &str) -> bool {
        self.items.contains_key(item_id)
    }

    pub fn item(&self, item_id: &str) -> Option<&Item> {
        self.items.get(item_id)
    }

    pub fn position(&self, item_id: &str) -> Option<PositionKey> {
        self.item_positions.get(item_id).copied()
    }

    /// Unordered `item_id -> PositionKey` mapping
    pub fn item_positions(&self) -> &HashMap<String, PositionKey> {
        &self.item_positions
    }

    /// Items in shelf order
    pub fn ordered_view(&self) -> OrderedView {
        OrderedView::order(&self.item_positions)
    }

    /// Items resolved in shelf order
    ///
    /// Positions without a matching item are skipped; a validated shelf never
    /// has any.
    pub fn ordered_items(&self) -> Vec<&Item> {
        self.ordered_view()
            .item_ids()
            .filter_map(|id| self.items.get(id))
            .collect()
    }

    /// Check the domain and uniqueness invariants
    pub fn validate(&self) -> Result<(), String> {
        if self.items.len() != self.item_positions.len() {
            return Err(format!(
                "{} items but {} positions",
                self.items.len(),
                self.item_positions.len()
            ));
        }

        if let Some(orphan) = self
            .item_positions
            .keys()
            .find(|id| !self.items.contains_key(*id))
        {
            return Err(format!("position recorded for unknown item '{}'", orphan));
        }

        let mut seen = HashSet::with_capacity(self.item_positions.len());
        for (item_id, key) in &self.item_positions {
            if !seen.insert(key.value().to_bits()) {
                return Err(format!(
                    "duplicate position key {} (item '{}')",
                    key, item_id
                ));
            }
        }

        Ok(())
    }

    /// Add an item at a pre-allocated key
    pub(crate) fn insert_item(&mut self, item: Item, key: PositionKey) -> Result<(), String> {
        if self.items.contains_key(&item.id) {
            return Err(format!("item '{}' already on shelf", item.id));
        }
        self.item_positions.insert(item.id.clone(), key);
        self.items.insert(item.id.clone(), item);
        Ok(())
    }

    /// Remove an item together with its position
    pub(crate) fn remove_item(&mut self, item_id: &str) -> Option<Item> {
        self.item_positions.remove(item_id);
        self.items.remove(item_id)
    }

    /// Replace one item's key
    pub(crate) fn set_position(&mut self, item_id: &str, key: PositionKey) -> Result<(), String> {
        match self.item_positions.get_mut(item_id) {
            Some(slot) => {
                *slot = key;
                Ok(())
            }
            None => Err(format!("item '{}' has no position", item_id)),
        }
    }

    /// Replace every key at once (rebalance)
    pub(crate) fn replace_positions(
        &mut self,
        positions: HashMap<String, PositionKey>,
    ) -> Result<(), String> {
        if positions.len() != self.items.len()
            || positions.keys().any(|id| !self.items.contains_key(id))
        {
            return Err("rebalanced key set does not cover the shelf's items".to_string());
        }
        self.item_positions = positions;
        Ok(())
    }

    /// Stamp a committed mutation
    pub(crate) fn bump_version(&mut self) {
        self.version += 1;
        self.modified_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn item(id: &str) -> Item {
        Item::new_with_id(id.to_string(), format!("Item {}", id), json!({}))
    }

    fn key(value: f64) -> PositionKey {
        PositionKey::new(value).unwrap()
    }

    #[test]
    fn test_new_shelf_is_empty_and_valid() {
        let shelf = Shelf::new("Favorites".to_string());
        assert!(shelf.is_empty());
        assert_eq!(shelf.version, 0);
        assert_eq!(shelf.rebalance_count, 0);
        assert!(shelf.validate().is_ok());
    }

    #[test]
    fn test_ordered_items_follow_keys() {
        let mut shelf = Shelf::new_with_id("s1".to_string(), "Shelf".to_string());
        shelf.insert_item(item("b"), key(10.0)).unwrap();
        shelf.insert_item(item("a"), key(5.0)).unwrap();
        shelf.insert_item(item("c"), key(15.0)).unwrap();

        let ids: Vec<&str> = shelf.ordered_items().iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_insert_rejects_duplicate_item() {
        let mut shelf = Shelf::new("Shelf".to_string());
        shelf.insert_item(item("a"), key(0.0)).unwrap();
        assert!(shelf.insert_item(item("a"), key(1.0)).is_err());
        assert_eq!(shelf.position("a"), Some(key(0.0)));
    }

    #[test]
    fn test_validate_detects_duplicate_keys() {
        let mut shelf = Shelf::new("Shelf".to_string());
        shelf.insert_item(item("a"), key(1.0)).unwrap();
        shelf.insert_item(item("b"), key(1.0)).unwrap();

        let err = shelf.validate().unwrap_err();
        assert!(err.contains("duplicate position key"));
    }

    #[test]
    fn test_replace_positions_requires_full_domain() {
        let mut shelf = Shelf::new("Shelf".to_string());
        shelf.insert_item(item("a"), key(0.0)).unwrap();
        shelf.insert_item(item("b"), key(1.0)).unwrap();

        let partial = HashMap::from([("a".to_string(), key(3.0))]);
        assert!(shelf.replace_positions(partial).is_err());
        assert_eq!(shelf.position("a"), Some(key(0.0)));
    }

    #[test]
    fn test_remove_item_drops_position() {
        let mut shelf = Shelf::new("Shelf".to_string());
        shelf.insert_item(item("a"), key(0.0)).unwrap();
        assert!(shelf.remove_item("a").is_some());
        assert!(shelf.position("a").is_none());
        assert!(shelf.validate().is_ok());
    }
}
