//! Domain Events for the Shelf Store
//!
//! This module defines the domain events emitted by the store when a mutation
//! is committed. Events follow the observer pattern, allowing UI collaborators
//! to react to ordering changes without coupling to the store implementation.
//!
//! # Event Flow
//!
//! 1. The store publishes a new shelf snapshot
//! 2. A domain event is sent on a tokio broadcast channel
//! 3. Every subscriber receives it asynchronously
//!
//! Events are only emitted after the snapshot swap, so a subscriber that
//! fetches the shelf in response always sees the new version or a later one.

use crate::models::{Item, PositionKey};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Key changes committed in one mutation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionUpdate {
    pub shelf_id: String,
    pub version: u64,
    pub updated_keys: HashMap<String, PositionKey>,
    pub rebalanced: bool,
}

/// Domain events emitted by the store
#[derive(Debug, Clone)]
pub enum DomainEvent {
    /// A new, empty shelf was created
    ShelfCreated { shelf_id: String },

    /// An item was placed on a shelf
    ItemAdded {
        shelf_id: String,
        item: Item,
        key: PositionKey,
        version: u64,
    },

    /// An item and its position were removed
    ItemRemoved {
        shelf_id: String,
        item_id: String,
        version: u64,
    },

    /// One key (normal move) or all keys (move with rebalance) changed
    PositionsUpdated(PositionUpdate),

    /// Every key on the shelf was respaced
    ShelfRebalanced {
        shelf_id: String,
        version: u64,
        rebalance_count: u64,
    },
}

impl DomainEvent {
    /// Get a string representation of the event type
    pub fn event_type(&self) -> &str {
        match self {
            DomainEvent::ShelfCreated { .. } => "shelf:created",
            DomainEvent::ItemAdded { .. } => "item:added",
            DomainEvent::ItemRemoved { .. } => "item:removed",
            DomainEvent::PositionsUpdated(_) => "positions:updated",
            DomainEvent::ShelfRebalanced { .. } => "shelf:rebalanced",
        }
    }

    /// Shelf the event belongs to
    pub fn shelf_id(&self) -> &str {
        match self {
            DomainEvent::ShelfCreated { shelf_id }
            | DomainEvent::ItemAdded { shelf_id, .. }
            | DomainEvent::ItemRemoved { shelf_id, .. }
            | DomainEvent::ShelfRebalanced { shelf_id, .. } => shelf_id,
            DomainEvent::PositionsUpdated(update) => &update.shelf_id,
        }
    }
}
