//! Reorder Requests and Results
//!
//! Moves are expressed relative to another item rather than as absolute
//! indices, so a request stays meaningful while other items shift around it.

use crate::models::PositionKey;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Relative move request: place `item_id` directly before or after
/// `reference_item_id`
///
/// Without a reference, `before = true` moves the item to the head of the
/// shelf and `before = false` moves it to the tail.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReorderIntent {
    pub item_id: String,
    #[serde(default)]
    pub reference_item_id: Option<String>,
    pub before: bool,
}

impl ReorderIntent {
    pub fn before(item_id: impl Into<String>, reference_item_id: impl Into<String>) -> Self {
        Self {
            item_id: item_id.into(),
            reference_item_id: Some(reference_item_id.into()),
            before: true,
        }
    }

    pub fn after(item_id: impl Into<String>, reference_item_id: impl Into<String>) -> Self {
        Self {
            item_id: item_id.into(),
            reference_item_id: Some(reference_item_id.into()),
            before: false,
        }
    }

    pub fn to_head(item_id: impl Into<String>) -> Self {
        Self {
            item_id: item_id.into(),
            reference_item_id: None,
            before: true,
        }
    }

    pub fn to_tail(item_id: impl Into<String>) -> Self {
        Self {
            item_id: item_id.into(),
            reference_item_id: None,
            before: false,
        }
    }

    /// True when the item is asked to be placed relative to itself
    pub fn is_self_referencing(&self) -> bool {
        self.reference_item_id.as_deref() == Some(self.item_id.as_str())
    }
}

/// Authoritative result of a committed reorder
///
/// `updated_keys` holds only the moved item on the normal path, every item on
/// the shelf when `rebalanced` is set, and nothing for a no-op.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReorderOutcome {
    pub shelf_id: String,
    pub updated_keys: HashMap<String, PositionKey>,
    pub rebalanced: bool,
    /// Shelf version after the commit
    pub version: u64,
}

impl ReorderOutcome {
    pub fn is_noop(&self) -> bool {
        self.updated_keys.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intent_constructors() {
        let intent = ReorderIntent::after("c", "a");
        assert_eq!(intent.reference_item_id.as_deref(), Some("a"));
        assert!(!intent.before);

        let head = ReorderIntent::to_head("c");
        assert!(head.reference_item_id.is_none());
        assert!(head.before);

        assert!(ReorderIntent::before("a", "a").is_self_referencing());
        assert!(!ReorderIntent::to_tail("a").is_self_referencing());
    }

    #[test]
    fn test_intent_wire_format() {
        let intent = ReorderIntent::to_head("item-1");
        let json = serde_json::to_value(&intent).unwrap();
        assert_eq!(json["itemId"], "item-1");
        assert!(json["referenceItemId"].is_null());
        assert_eq!(json["before"], true);

        let parsed: ReorderIntent =
            serde_json::from_str(r#"{"itemId":"x","before":false}"#).unwrap();
        assert_eq!(parsed, ReorderIntent::to_tail("x"));
    }
}
