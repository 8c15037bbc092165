//! In-memory store-of-record
//!
//! Each shelf lives in its own slot holding the published snapshot and a write
//! gate. Writers hold the gate for the whole read-plan-commit cycle, which
//! serializes every key mutation for that shelf; readers only touch the
//! snapshot lock for the instant it takes to clone an `Arc`, so they never wait
//! on a writer's planning and never see a half-applied rebalance.
//!
//! # Placement policy
//!
//! 1. If the monitor reports `needs_rebalance`, respace the shelf first
//! 2. Otherwise allocate between the target neighbors
//! 3. If allocation is `Exhausted`, respace and retry the placement once

use crate::config::OrderingConfig;
use crate::db::{
    DomainEvent, GapStats, KeyAllocator, OrderedEntry, OrderedView, OrderingError,
    PositionUpdate, RebalanceMonitor, Rebalancer, ShelfStore, StoreError,
};
use crate::models::{Item, PositionKey, ReorderIntent, ReorderOutcome, Shelf};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{broadcast, Mutex, RwLock};

/// Broadcast channel capacity for domain events
const DOMAIN_EVENT_CHANNEL_CAPACITY: usize = 128;

struct ShelfSlot {
    write_gate: Mutex<()>,
    snapshot: RwLock<Arc<Shelf>>,
}

impl ShelfSlot {
    fn new(shelf: Shelf) -> Self {
        Self {
            write_gate: Mutex::new(()),
            snapshot: RwLock::new(Arc::new(shelf)),
        }
    }

    async fn current(&self) -> Arc<Shelf> {
        self.snapshot.read().await.clone()
    }
}

/// Where a placed item ends up
#[derive(Debug, Clone, PartialEq)]
enum Placement {
    /// The item already sits in the requested slot
    Unchanged,
    /// Only the placed item gets a key
    Single(PositionKey),
    /// Every key was reassigned; includes the placed item
    Rebalanced(HashMap<String, PositionKey>),
}

/// Shelf store holding all state in process memory
pub struct InMemoryShelfStore {
    shelves: RwLock<HashMap<String, Arc<ShelfSlot>>>,
    allocator: KeyAllocator,
    rebalancer: Rebalancer,
    monitor: RebalanceMonitor,
    event_tx: broadcast::Sender<DomainEvent>,
}

impl InMemoryShelfStore {
    /// Create a store with the given ordering policy
    pub fn new(config: &OrderingConfig) -> Result<Self, StoreError> {
        config.validate().map_err(StoreError::InvalidConfig)?;
        Ok(Self::from_validated(config))
    }

    /// Create a store with [`OrderingConfig::default`]
    pub fn with_default_config() -> Self {
        Self::from_validated(&OrderingConfig::default())
    }

    fn from_validated(config: &OrderingConfig) -> Self {
        // Initialize broadcast channel for domain events
        let (event_tx, _) = broadcast::channel(DOMAIN_EVENT_CHANNEL_CAPACITY);

        Self {
            shelves: RwLock::new(HashMap::new()),
            allocator: KeyAllocator::new(config),
            rebalancer: Rebalancer::new(config),
            monitor: RebalanceMonitor::new(config),
            event_tx,
        }
    }

    /// Adopt a previously persisted shelf
    ///
    /// The shelf is validated first; a shelf with duplicate keys or a
    /// mismatched item/position domain is refused, not repaired.
    pub async fn load_shelf(&self, shelf: Shelf) -> Result<Arc<Shelf>, StoreError> {
        shelf
            .validate()
            .map_err(|reason| StoreError::invariant_violation(&shelf.id, reason))?;

        let mut shelves = self.shelves.write().await;
        if shelves.contains_key(&shelf.id) {
            return Err(StoreError::shelf_already_exists(&shelf.id));
        }

        let slot = Arc::new(ShelfSlot::new(shelf));
        let snapshot = slot.current().await;
        shelves.insert(snapshot.id.clone(), slot);
        Ok(snapshot)
    }

    async fn slot(&self, shelf_id: &str) -> Result<Arc<ShelfSlot>, StoreError> {
        self.shelves
            .read()
            .await
            .get(shelf_id)
            .cloned()
            .ok_or_else(|| StoreError::shelf_not_found(shelf_id))
    }

    /// Emit a domain event to all subscribers
    ///
    /// Ignores errors if no subscribers (expected in some tests).
    fn emit_event(&self, event: DomainEvent) {
        let _ = self.event_tx.send(event);
    }

    /// Validate and publish the next snapshot
    ///
    /// Must be called with the slot's write gate held.
    async fn publish(&self, slot: &ShelfSlot, mut next: Shelf) -> Result<Arc<Shelf>, StoreError> {
        next.validate().map_err(|reason| {
            tracing::warn!("Refusing to commit shelf '{}': {}", next.id, reason);
            StoreError::invariant_violation(&next.id, reason)
        })?;

        next.bump_version();
        let published = Arc::new(next);
        *slot.snapshot.write().await = published.clone();
        Ok(published)
    }

    /// Decide where `item_id` goes on `shelf`
    ///
    /// `item_id` may or may not already be on the shelf.
    fn plan_placement(
        &self,
        shelf: &Shelf,
        item_id: &str,
        reference_item_id: Option<&str>,
        before: bool,
    ) -> Result<Placement, StoreError> {
        let full = shelf.ordered_view();

        if let Some(index) = full.index_of(item_id) {
            let current = full.neighbors_of(index);
            let rest = full.without(item_id);
            let target = rest
                .slot_for(reference_item_id, before)
                .ok_or_else(|| missing_reference(shelf, reference_item_id))?;

            if same_entry_ids(current.lower, target.lower)
                && same_entry_ids(current.upper, target.upper)
            {
                return Ok(Placement::Unchanged);
            }
        }

        if self.monitor.needs_rebalance(&full.keys()) {
            tracing::debug!(
                "Shelf '{}' below gap threshold; rebalancing before placing '{}'",
                shelf.id,
                item_id
            );
            return self.place_after_rebalance(shelf, &full, item_id, reference_item_id, before);
        }

        let rest = full.without(item_id);
        let target = rest
            .slot_for(reference_item_id, before)
            .ok_or_else(|| missing_reference(shelf, reference_item_id))?;

        match self.allocator.allocate(target.lower_key(), target.upper_key()) {
            Ok(key) => Ok(Placement::Single(key)),
            Err(OrderingError::Exhausted { .. }) => {
                tracing::debug!(
                    "Key space exhausted on shelf '{}'; rebalancing and retrying '{}'",
                    shelf.id,
                    item_id
                );
                self.place_after_rebalance(shelf, &full, item_id, reference_item_id, before)
            }
            Err(OrderingError::InvertedBounds { lower, upper }) => {
                Err(StoreError::invariant_violation(
                    &shelf.id,
                    format!("neighbors out of order ({} >= {})", lower, upper),
                ))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Respace the current order, then place the item once against the new keys
    fn place_after_rebalance(
        &self,
        shelf: &Shelf,
        full: &OrderedView,
        item_id: &str,
        reference_item_id: Option<&str>,
        before: bool,
    ) -> Result<Placement, StoreError> {
        let mut positions = self.rebalancer.rebalance(full.item_ids())?;
        let rebalanced = OrderedView::order(&positions).without(item_id);

        let target = rebalanced
            .slot_for(reference_item_id, before)
            .ok_or_else(|| missing_reference(shelf, reference_item_id))?;
        let key = self
            .allocator
            .allocate(target.lower_key(), target.upper_key())?;

        positions.insert(item_id.to_string(), key);
        Ok(Placement::Rebalanced(positions))
    }

    async fn apply_reorder(
        &self,
        shelf_id: &str,
        intent: &ReorderIntent,
        expected_version: Option<u64>,
    ) -> Result<ReorderOutcome, StoreError> {
        let slot = self.slot(shelf_id).await?;
        let _writer = slot.write_gate.lock().await;
        let current = slot.current().await;

        if let Some(expected) = expected_version {
            if current.version != expected {
                return Err(StoreError::version_conflict(
                    shelf_id,
                    expected,
                    current.version,
                ));
            }
        }

        if !current.contains(&intent.item_id) {
            return Err(StoreError::item_not_found(shelf_id, &intent.item_id));
        }

        let placement = if intent.is_self_referencing() {
            Placement::Unchanged
        } else {
            self.plan_placement(
                &current,
                &intent.item_id,
                intent.reference_item_id.as_deref(),
                intent.before,
            )?
        };

        let mut next = (*current).clone();
        let (updated_keys, rebalanced) = match placement {
            Placement::Unchanged => {
                tracing::debug!(
                    "Reorder of '{}' on shelf '{}' does not change order",
                    intent.item_id,
                    shelf_id
                );
                return Ok(ReorderOutcome {
                    shelf_id: shelf_id.to_string(),
                    updated_keys: HashMap::new(),
                    rebalanced: false,
                    version: current.version,
                });
            }
            Placement::Single(key) => {
                next.set_position(&intent.item_id, key)
                    .map_err(|reason| StoreError::invariant_violation(shelf_id, reason))?;
                (HashMap::from([(intent.item_id.clone(), key)]), false)
            }
            Placement::Rebalanced(positions) => {
                next.replace_positions(positions.clone())
                    .map_err(|reason| StoreError::invariant_violation(shelf_id, reason))?;
                next.rebalance_count += 1;
                (positions, true)
            }
        };

        let published = self.publish(&slot, next).await?;
        tracing::debug!(
            "Moved '{}' on shelf '{}' (v{}, rebalanced: {})",
            intent.item_id,
            shelf_id,
            published.version,
            rebalanced
        );

        Ok(self.announce_positions(&published, updated_keys, rebalanced))
    }

    /// Emit events for a key change and build the client-facing outcome
    fn announce_positions(
        &self,
        shelf: &Shelf,
        updated_keys: HashMap<String, PositionKey>,
        rebalanced: bool,
    ) -> ReorderOutcome {
        if rebalanced {
            tracing::info!(
                "Rebalanced shelf '{}' ({} items, rebalance #{})",
                shelf.id,
                shelf.len(),
                shelf.rebalance_count
            );
            self.emit_event(DomainEvent::ShelfRebalanced {
                shelf_id: shelf.id.clone(),
                version: shelf.version,
                rebalance_count: shelf.rebalance_count,
            });
        }

        self.emit_event(DomainEvent::PositionsUpdated(PositionUpdate {
            shelf_id: shelf.id.clone(),
            version: shelf.version,
            updated_keys: updated_keys.clone(),
            rebalanced,
        }));

        ReorderOutcome {
            shelf_id: shelf.id.clone(),
            updated_keys,
            rebalanced,
            version: shelf.version,
        }
    }
}

fn same_entry_ids(a: Option<&OrderedEntry>, b: Option<&OrderedEntry>) -> bool {
    a.map(|e| e.item_id.as_str()) == b.map(|e| e.item_id.as_str())
}

fn missing_reference(shelf: &Shelf, reference_item_id: Option<&str>) -> StoreError {
    StoreError::conflict(
        &shelf.id,
        format!(
            "reference item '{}' is no longer on the shelf",
            reference_item_id.unwrap_or_default()
        ),
    )
}

#[async_trait]
impl ShelfStore for InMemoryShelfStore {
    async fn create_shelf(
        &self,
        shelf_id: Option<String>,
        name: String,
    ) -> Result<Arc<Shelf>, StoreError> {
        let shelf = match shelf_id {
            Some(id) => Shelf::new_with_id(id, name),
            None => Shelf::new(name),
        };

        let mut shelves = self.shelves.write().await;
        if shelves.contains_key(&shelf.id) {
            return Err(StoreError::shelf_already_exists(&shelf.id));
        }

        let slot = Arc::new(ShelfSlot::new(shelf));
        let snapshot = slot.current().await;
        shelves.insert(snapshot.id.clone(), slot);
        drop(shelves);

        tracing::debug!("Created shelf '{}'", snapshot.id);
        self.emit_event(DomainEvent::ShelfCreated {
            shelf_id: snapshot.id.clone(),
        });
        Ok(snapshot)
    }

    async fn get_shelf(&self, shelf_id: &str) -> Result<Arc<Shelf>, StoreError> {
        Ok(self.slot(shelf_id).await?.current().await)
    }

    async fn insert_item(
        &self,
        shelf_id: &str,
        item: Item,
        reference_item_id: Option<&str>,
        before: bool,
    ) -> Result<ReorderOutcome, StoreError> {
        let slot = self.slot(shelf_id).await?;
        let _writer = slot.write_gate.lock().await;
        let current = slot.current().await;

        if current.contains(&item.id) {
            return Err(StoreError::duplicate_item(shelf_id, &item.id));
        }

        let placement = self.plan_placement(&current, &item.id, reference_item_id, before)?;

        let mut next = (*current).clone();
        let item_id = item.id.clone();
        let (key, updated_keys, rebalanced) = match placement {
            Placement::Single(key) => (key, HashMap::from([(item_id.clone(), key)]), false),
            Placement::Rebalanced(positions) => {
                let key = positions.get(&item_id).copied().ok_or_else(|| {
                    StoreError::invariant_violation(shelf_id, "rebalance lost the new item")
                })?;
                (key, positions, true)
            }
            Placement::Unchanged => {
                return Err(StoreError::invariant_violation(
                    shelf_id,
                    "new item reported as already placed",
                ))
            }
        };

        next.insert_item(item.clone(), key)
            .map_err(|reason| StoreError::invariant_violation(shelf_id, reason))?;
        if rebalanced {
            next.replace_positions(updated_keys.clone())
                .map_err(|reason| StoreError::invariant_violation(shelf_id, reason))?;
            next.rebalance_count += 1;
        }

        let published = self.publish(&slot, next).await?;
        tracing::debug!(
            "Added '{}' to shelf '{}' at {} (v{})",
            item_id,
            shelf_id,
            key,
            published.version
        );

        self.emit_event(DomainEvent::ItemAdded {
            shelf_id: shelf_id.to_string(),
            item,
            key,
            version: published.version,
        });
        if rebalanced {
            return Ok(self.announce_positions(&published, updated_keys, true));
        }

        Ok(ReorderOutcome {
            shelf_id: shelf_id.to_string(),
            updated_keys,
            rebalanced,
            version: published.version,
        })
    }

    async fn remove_item(&self, shelf_id: &str, item_id: &str) -> Result<Item, StoreError> {
        let slot = self.slot(shelf_id).await?;
        let _writer = slot.write_gate.lock().await;
        let current = slot.current().await;

        let mut next = (*current).clone();
        let item = next
            .remove_item(item_id)
            .ok_or_else(|| StoreError::item_not_found(shelf_id, item_id))?;

        let published = self.publish(&slot, next).await?;
        tracing::debug!(
            "Removed '{}' from shelf '{}' (v{})",
            item_id,
            shelf_id,
            published.version
        );

        self.emit_event(DomainEvent::ItemRemoved {
            shelf_id: shelf_id.to_string(),
            item_id: item_id.to_string(),
            version: published.version,
        });
        Ok(item)
    }

    async fn submit_reorder(
        &self,
        shelf_id: &str,
        intent: &ReorderIntent,
    ) -> Result<ReorderOutcome, StoreError> {
        self.apply_reorder(shelf_id, intent, None).await
    }

    async fn submit_reorder_with_occ(
        &self,
        shelf_id: &str,
        intent: &ReorderIntent,
        expected_version: u64,
    ) -> Result<ReorderOutcome, StoreError> {
        self.apply_reorder(shelf_id, intent, Some(expected_version))
            .await
    }

    async fn rebalance_shelf(&self, shelf_id: &str) -> Result<ReorderOutcome, StoreError> {
        let slot = self.slot(shelf_id).await?;
        let _writer = slot.write_gate.lock().await;
        let current = slot.current().await;

        let positions = self.rebalancer.rebalance(current.ordered_view().item_ids())?;

        let mut next = (*current).clone();
        next.replace_positions(positions.clone())
            .map_err(|reason| StoreError::invariant_violation(shelf_id, reason))?;
        next.rebalance_count += 1;

        let published = self.publish(&slot, next).await?;
        Ok(self.announce_positions(&published, positions, true))
    }

    async fn get_position_metrics(&self, shelf_id: &str) -> Result<GapStats, StoreError> {
        let shelf = self.get_shelf(shelf_id).await?;
        Ok(self
            .monitor
            .stats(&shelf.ordered_view().keys(), shelf.rebalance_count))
    }

    fn subscribe_to_events(&self) -> broadcast::Receiver<DomainEvent> {
        self.event_tx.subscribe()
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

    async fn store_with(ids: &[&str]) -> (InMemoryShelfStore, String) {
        let store = InMemoryShelfStore::with_default_config();
        let shelf = store
            .create_shelf(Some("shelf".to_string()), "Shelf".to_string())
            .await
            .unwrap();
        for id in ids {
            store
                .insert_item(&shelf.id, item(id), None, false)
                .await
                .unwrap();
        }
        (store, shelf.id.clone())
    }

    async fn order_of(store: &InMemoryShelfStore, shelf_id: &str) -> Vec<String> {
        let shelf = store.get_shelf(shelf_id).await.unwrap();
        shelf.ordered_view().item_ids().map(str::to_string).collect()
    }

    #[tokio::test]
    async fn test_insert_appends_with_default_step() {
        let (store, shelf_id) = store_with(&["a", "b", "c"]).await;
        let shelf = store.get_shelf(&shelf_id).await.unwrap();

        assert_eq!(shelf.position("a"), Some(key(0.0)));
        assert_eq!(shelf.position("b"), Some(key(1.0)));
        assert_eq!(shelf.position("c"), Some(key(2.0)));
        assert_eq!(shelf.version, 3);
    }

    #[tokio::test]
    async fn test_insert_duplicate_item_rejected() {
        let (store, shelf_id) = store_with(&["a"]).await;
        let result = store.insert_item(&shelf_id, item("a"), None, false).await;
        assert!(matches!(result, Err(StoreError::DuplicateItem { .. })));
    }

    #[tokio::test]
    async fn test_reorder_unknown_shelf_and_item() {
        let (store, shelf_id) = store_with(&["a"]).await;

        let result = store
            .submit_reorder("nope", &ReorderIntent::to_head("a"))
            .await;
        assert!(matches!(result, Err(StoreError::ShelfNotFound { .. })));

        let result = store
            .submit_reorder(&shelf_id, &ReorderIntent::to_head("ghost"))
            .await;
        assert!(result.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_reorder_missing_reference_is_conflict() {
        let (store, shelf_id) = store_with(&["a", "b"]).await;
        let result = store
            .submit_reorder(&shelf_id, &ReorderIntent::after("a", "removed"))
            .await;
        assert!(result.unwrap_err().is_conflict());
    }

    #[tokio::test]
    async fn test_noop_reorder_keeps_version_and_keys() {
        let (store, shelf_id) = store_with(&["a", "b", "c"]).await;
        let before = store.get_shelf(&shelf_id).await.unwrap();

        // Already directly before its successor
        let outcome = store
            .submit_reorder(&shelf_id, &ReorderIntent::before("a", "b"))
            .await
            .unwrap();
        assert!(outcome.is_noop());
        assert_eq!(outcome.version, before.version);

        let outcome = store
            .submit_reorder(&shelf_id, &ReorderIntent::after("b", "b"))
            .await
            .unwrap();
        assert!(outcome.is_noop());

        let after = store.get_shelf(&shelf_id).await.unwrap();
        assert_eq!(after.item_positions(), before.item_positions());
        assert_eq!(after.version, before.version);
    }

    #[tokio::test]
    async fn test_reorder_with_occ_detects_stale_version() {
        let (store, shelf_id) = store_with(&["a", "b"]).await;
        let version = store.get_shelf(&shelf_id).await.unwrap().version;

        store
            .submit_reorder(&shelf_id, &ReorderIntent::to_head("b"))
            .await
            .unwrap();

        let result = store
            .submit_reorder_with_occ(&shelf_id, &ReorderIntent::to_tail("b"), version)
            .await;
        assert!(matches!(
            result,
            Err(StoreError::VersionConflict {
                expected_version,
                actual_version,
                ..
            }) if expected_version == version && actual_version == version + 1
        ));

        let outcome = store
            .submit_reorder_with_occ(&shelf_id, &ReorderIntent::to_tail("b"), version + 1)
            .await
            .unwrap();
        assert_eq!(outcome.version, version + 2);
        assert_eq!(order_of(&store, &shelf_id).await, vec!["a", "b"]);
    }

    #[tokio::test]
    async fn test_proactive_rebalance_when_gaps_are_tight() {
        let store = InMemoryShelfStore::with_default_config();
        let mut shelf = Shelf::new_with_id("tight".to_string(), "Tight".to_string());
        shelf.insert_item(item("a"), key(0.0)).unwrap();
        shelf.insert_item(item("b"), key(1.0e-9)).unwrap();
        shelf.insert_item(item("c"), key(5.0)).unwrap();
        store.load_shelf(shelf).await.unwrap();

        let outcome = store
            .submit_reorder("tight", &ReorderIntent::to_head("c"))
            .await
            .unwrap();

        assert!(outcome.rebalanced);
        assert_eq!(outcome.updated_keys.len(), 3);
        assert_eq!(order_of(&store, "tight").await, vec!["c", "a", "b"]);

        let stats = store.get_position_metrics("tight").await.unwrap();
        assert_eq!(stats.rebalance_count, 1);
        assert!(!stats.needs_rebalance);
    }

    #[tokio::test]
    async fn test_reactive_rebalance_on_exhaustion() {
        // Gap is wide, but 2^53 + 1.0 is not representable, so the tail
        // allocation itself fails
        let store = InMemoryShelfStore::with_default_config();
        let mut shelf = Shelf::new_with_id("wide".to_string(), "Wide".to_string());
        shelf.insert_item(item("a"), key(0.0)).unwrap();
        shelf.insert_item(item("b"), key(9_007_199_254_740_992.0)).unwrap();
        shelf.insert_item(item("c"), key(-1.0e6)).unwrap();
        store.load_shelf(shelf).await.unwrap();
        assert!(!store.get_position_metrics("wide").await.unwrap().needs_rebalance);

        let outcome = store
            .submit_reorder("wide", &ReorderIntent::to_tail("c"))
            .await
            .unwrap();

        assert!(outcome.rebalanced);
        assert_eq!(order_of(&store, "wide").await, vec!["a", "b", "c"]);

        let shelf = store.get_shelf("wide").await.unwrap();
        assert_eq!(shelf.rebalance_count, 1);
        // Respaced as [c, a, b] = [0, 1, 2], then c appended after b
        assert_eq!(shelf.position("c"), Some(key(3.0)));
    }

    #[tokio::test]
    async fn test_load_shelf_refuses_duplicate_keys() {
        let store = InMemoryShelfStore::with_default_config();
        let mut shelf = Shelf::new_with_id("broken".to_string(), "Broken".to_string());
        shelf.insert_item(item("a"), key(1.0)).unwrap();
        shelf.insert_item(item("b"), key(1.0)).unwrap();

        let result = store.load_shelf(shelf).await;
        assert!(matches!(result, Err(StoreError::InvariantViolation { .. })));
        assert!(store.get_shelf("broken").await.is_err());
    }

    #[tokio::test]
    async fn test_remove_item() {
        let (store, shelf_id) = store_with(&["a", "b"]).await;
        let removed = store.remove_item(&shelf_id, "a").await.unwrap();
        assert_eq!(removed.id, "a");
        assert_eq!(order_of(&store, &shelf_id).await, vec!["b"]);

        let result = store.remove_item(&shelf_id, "a").await;
        assert!(result.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_explicit_rebalance() {
        let (store, shelf_id) = store_with(&["a", "b", "c"]).await;
        store
            .submit_reorder(&shelf_id, &ReorderIntent::after("c", "a"))
            .await
            .unwrap();

        let outcome = store.rebalance_shelf(&shelf_id).await.unwrap();
        assert!(outcome.rebalanced);
        assert_eq!(outcome.updated_keys["a"], key(0.0));
        assert_eq!(outcome.updated_keys["c"], key(1.0));
        assert_eq!(outcome.updated_keys["b"], key(2.0));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = OrderingConfig {
            default_step: -1.0,
            ..OrderingConfig::default()
        };
        assert!(matches!(
            InMemoryShelfStore::new(&config),
            Err(StoreError::InvalidConfig(_))
        ));
    }
}
