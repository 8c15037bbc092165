//! ShelfStore Trait - Store-of-Record Abstraction
//!
//! This module defines the `ShelfStore` trait: the contract a client relies on
//! when it commits reorders to the authoritative copy of a shelf. The bundled
//! [`InMemoryShelfStore`](crate::db::InMemoryShelfStore) implements it; a
//! remote service would implement the same trait over its transport.
//!
//! # Consistency
//!
//! - All key mutations for one shelf are linearizable
//! - Readers observe whole snapshots, never a partially rebalanced key set
//! - Every committed mutation increments the shelf's `version`
//!
//! # Examples
//!
//! ```rust
//! use shelfspace_core::db::{InMemoryShelfStore, ShelfStore};
//! use shelfspace_core::models::{Item, ReorderIntent};
//! use serde_json::json;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let store = InMemoryShelfStore::with_default_config();
//! let shelf = store.create_shelf(None, "Reading list".to_string()).await?;
//!
//! let a = Item::new_with_id("a".into(), "Dune".into(), json!({}));
//! let b = Item::new_with_id("b".into(), "Emma".into(), json!({}));
//! store.insert_item(&shelf.id, a, None, false).await?;
//! store.insert_item(&shelf.id, b, None, false).await?;
//!
//! let outcome = store
//!     .submit_reorder(&shelf.id, &ReorderIntent::to_head("b"))
//!     .await?;
//! assert!(!outcome.rebalanced);
//! # Ok(())
//! # }
//! ```

use crate::db::{DomainEvent, GapStats, StoreError};
use crate::models::{Item, ReorderIntent, ReorderOutcome, Shelf};
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::broadcast;

/// Authoritative store for shelf contents and positions
///
/// Implementations must be `Send + Sync`; clients share one store across
/// tasks.
#[async_trait]
pub trait ShelfStore: Send + Sync {
    /// Create an empty shelf
    ///
    /// Generates a UUID when `shelf_id` is `None`.
    async fn create_shelf(
        &self,
        shelf_id: Option<String>,
        name: String,
    ) -> Result<Arc<Shelf>, StoreError>;

    /// Current snapshot of a shelf
    async fn get_shelf(&self, shelf_id: &str) -> Result<Arc<Shelf>, StoreError>;

    /// Place a new item relative to `reference_item_id`
    ///
    /// Same placement semantics as [`ReorderIntent`]: no reference with
    /// `before = true` inserts at the head, `before = false` at the tail.
    async fn insert_item(
        &self,
        shelf_id: &str,
        item: Item,
        reference_item_id: Option<&str>,
        before: bool,
    ) -> Result<ReorderOutcome, StoreError>;

    /// Remove an item and its position
    async fn remove_item(&self, shelf_id: &str, item_id: &str) -> Result<Item, StoreError>;

    /// Apply a relative move
    ///
    /// # Errors
    ///
    /// - `ItemNotFound` / `ShelfNotFound` - terminal
    /// - `Conflict` - the reference item is no longer on the shelf
    async fn submit_reorder(
        &self,
        shelf_id: &str,
        intent: &ReorderIntent,
    ) -> Result<ReorderOutcome, StoreError>;

    /// Apply a relative move only if the shelf is still at `expected_version`
    async fn submit_reorder_with_occ(
        &self,
        shelf_id: &str,
        intent: &ReorderIntent,
        expected_version: u64,
    ) -> Result<ReorderOutcome, StoreError>;

    /// Respace every key on the shelf, preserving order
    async fn rebalance_shelf(&self, shelf_id: &str) -> Result<ReorderOutcome, StoreError>;

    /// Gap statistics for the current snapshot
    async fn get_position_metrics(&self, shelf_id: &str) -> Result<GapStats, StoreError>;

    /// Subscribe to committed mutations
    fn subscribe_to_events(&self) -> broadcast::Receiver<DomainEvent>;
}
