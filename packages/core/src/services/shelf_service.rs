//! Shelf Service - Read Projections and Maintenance
//!
//! Entry point for UI collaborators:
//!
//! - Ordered item projection (`get_ordered_items`)
//! - Gap metrics and proactive rebalancing
//! - Reorder commits with retry, and drag-and-drop sessions
//! - Domain event subscription

use crate::config::ShelfConfig;
use crate::db::{DomainEvent, GapStats, InMemoryShelfStore, ShelfStore, StoreError};
use crate::models::{Item, ReorderIntent, ReorderOutcome};
use crate::operations::{ReorderError, ReorderQueue};
use crate::services::ReorderSession;
use std::sync::Arc;
use tokio::sync::broadcast;

#[derive(Clone)]
pub struct ShelfService {
    store: Arc<dyn ShelfStore>,
    queue: Arc<ReorderQueue>,
}

impl ShelfService {
    /// Create a service over an existing store
    pub fn new(store: Arc<dyn ShelfStore>, config: &ShelfConfig) -> Self {
        let queue = Arc::new(ReorderQueue::new(store.clone(), config.retry.clone()));
        Self { store, queue }
    }

    /// Create a service backed by a fresh in-memory store
    pub fn in_memory(config: &ShelfConfig) -> Result<Self, StoreError> {
        let store = Arc::new(InMemoryShelfStore::new(&config.ordering)?);
        Ok(Self::new(store, config))
    }

    pub fn store(&self) -> &Arc<dyn ShelfStore> {
        &self.store
    }

    /// Items of a shelf in position order
    pub async fn get_ordered_items(&self, shelf_id: &str) -> Result<Vec<Item>, StoreError> {
        let shelf = self.store.get_shelf(shelf_id).await?;
        Ok(shelf.ordered_items().into_iter().cloned().collect())
    }

    pub async fn get_position_metrics(&self, shelf_id: &str) -> Result<GapStats, StoreError> {
        self.store.get_position_metrics(shelf_id).await
    }

    /// Rebalance the shelf if its gaps have fallen below the threshold
    ///
    /// Returns `None` when no rebalance was needed.
    pub async fn rebalance_if_needed(
        &self,
        shelf_id: &str,
    ) -> Result<Option<ReorderOutcome>, StoreError> {
        let stats = self.store.get_position_metrics(shelf_id).await?;
        if !stats.needs_rebalance {
            return Ok(None);
        }

        tracing::info!(
            "Proactively rebalancing shelf '{}' (min gap {:e})",
            shelf_id,
            stats.min_gap
        );
        self.store.rebalance_shelf(shelf_id).await.map(Some)
    }

    /// Commit a relative move with conflict retry
    pub async fn reorder(
        &self,
        shelf_id: &str,
        intent: &ReorderIntent,
    ) -> Result<ReorderOutcome, ReorderError> {
        self.queue.commit_with_retry(shelf_id, intent).await
    }

    /// Start a drag-and-drop session on the shelf's current snapshot
    pub async fn open_session(&self, shelf_id: &str) -> Result<ReorderSession, StoreError> {
        ReorderSession::open(self.queue.clone(), shelf_id).await
    }

    pub fn subscribe_to_events(&self) -> broadcast::Receiver<DomainEvent> {
        self.store.subscribe_to_events()
    }
}
