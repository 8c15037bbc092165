//! Reorder commit queue with retry logic for optimistic concurrency control
//!
//! Reorders are submitted against the shelf version the queue just read. When
//! another writer commits first, the store answers with a conflict and the
//! queue refetches the shelf, checks that the intent still makes sense, backs
//! off and tries again.
//!
//! # Example
//!
//! ```rust
//! use shelfspace_core::config::RetryConfig;
//! use shelfspace_core::db::{InMemoryShelfStore, ShelfStore};
//! use shelfspace_core::models::{Item, ReorderIntent};
//! use shelfspace_core::operations::ReorderQueue;
//! use serde_json::json;
//! use std::sync::Arc;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let store = Arc::new(InMemoryShelfStore::with_default_config());
//! let shelf = store.create_shelf(Some("s".into()), "Shelf".into()).await?;
//! for id in ["a", "b"] {
//!     let item = Item::new_with_id(id.into(), id.into(), json!({}));
//!     store.insert_item(&shelf.id, item, None, false).await?;
//! }
//!
//! // Retry up to 3 times with exponential backoff (10ms, 20ms, 40ms)
//! let queue = ReorderQueue::new(store.clone(), RetryConfig::default());
//! let outcome = queue
//!     .commit_with_retry("s", &ReorderIntent::to_head("b"))
//!     .await?;
//! assert_eq!(outcome.updated_keys.len(), 1);
//! # Ok(())
//! # }
//! ```

use crate::config::RetryConfig;
use crate::db::{ShelfStore, StoreError};
use crate::models::{ReorderIntent, ReorderOutcome};
use crate::operations::ReorderError;
use std::sync::Arc;
use tokio::time::Duration;

/// Commits reorders with automatic retry on conflicts
pub struct ReorderQueue {
    store: Arc<dyn ShelfStore>,
    retry: RetryConfig,
}

impl ReorderQueue {
    pub fn new(store: Arc<dyn ShelfStore>, retry: RetryConfig) -> Self {
        Self { store, retry }
    }

    pub fn store(&self) -> &Arc<dyn ShelfStore> {
        &self.store
    }

    /// Commit a reorder, retrying on conflicts
    ///
    /// # Retry Behavior
    ///
    /// - **Retry on**: `Conflict` and `VersionConflict` only
    /// - **Backoff**: `RetryConfig::backoff_ms` (10ms, 20ms, 40ms, ... by default)
    /// - **Fresh data**: each attempt refetches the shelf and submits against
    ///   its current version
    /// - **Other errors**: fail immediately
    ///
    /// # Errors
    ///
    /// - `Store(ShelfNotFound | ItemNotFound)` - the moved item is gone
    /// - `ReferenceVanished` - the reference item is gone
    /// - `MaxRetriesExceeded` - still conflicting after the last retry
    pub async fn commit_with_retry(
        &self,
        shelf_id: &str,
        intent: &ReorderIntent,
    ) -> Result<ReorderOutcome, ReorderError> {
        let mut attempt = 0;

        loop {
            // Fetch fresh version for this attempt
            let shelf = self.store.get_shelf(shelf_id).await?;
            if !shelf.contains(&intent.item_id) {
                return Err(StoreError::item_not_found(shelf_id, &intent.item_id).into());
            }
            if let Some(reference) = intent.reference_item_id.as_deref() {
                if !shelf.contains(reference) {
                    tracing::debug!(
                        "Reference '{}' for moving '{}' left shelf '{}'",
                        reference,
                        intent.item_id,
                        shelf_id
                    );
                    return Err(ReorderError::reference_vanished(shelf_id, reference));
                }
            }

            match self
                .store
                .submit_reorder_with_occ(shelf_id, intent, shelf.version)
                .await
            {
                Ok(outcome) => {
                    if attempt > 0 {
                        tracing::debug!(
                            "Reorder succeeded after {} retry(ies) for '{}' on shelf '{}'",
                            attempt,
                            intent.item_id,
                            shelf_id
                        );
                    }
                    return Ok(outcome);
                }

                Err(e) if e.is_conflict() && attempt < self.retry.max_retries => {
                    tracing::debug!(
                        "Conflict on attempt {}/{} for '{}': {}. Retrying...",
                        attempt + 1,
                        self.retry.max_retries + 1,
                        intent.item_id,
                        e
                    );

                    let backoff_ms = self.retry.backoff_ms(attempt);
                    tokio::time::sleep(Duration::from_millis(backoff_ms)).await;

                    attempt += 1;
                    continue;
                }

                Err(e) if e.is_conflict() => {
                    tracing::warn!(
                        "Max retries ({}) exceeded for '{}' reorder on shelf '{}'",
                        self.retry.max_retries,
                        intent.item_id,
                        shelf_id
                    );
                    return Err(ReorderError::max_retries_exceeded(
                        shelf_id,
                        &intent.item_id,
                        attempt + 1,
                    ));
                }

                Err(e) => return Err(e.into()),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{DomainEvent, GapStats, InMemoryShelfStore};
    use crate::models::{Item, Shelf};
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::sync::broadcast;

    fn item(id: &str) -> Item {
        Item::new_with_id(id.to_string(), id.to_uppercase(), json!({}))
    }

    fn fast_retry(max_retries: usize) -> RetryConfig {
        RetryConfig {
            max_retries,
            base_backoff_ms: 1,
        }
    }

    /// Store that lets a competing writer slip in before the first
    /// `interruptions` OCC submits
    struct ContendedStore {
        inner: InMemoryShelfStore,
        interruptions: usize,
        submits: AtomicUsize,
    }

    impl ContendedStore {
        async fn new(ids: &[&str], interruptions: usize) -> Self {
            let inner = InMemoryShelfStore::with_default_config();
            inner
                .create_shelf(Some("s".to_string()), "Shelf".to_string())
                .await
                .unwrap();
            for id in ids {
                inner.insert_item("s", item(id), None, false).await.unwrap();
            }
            Self {
                inner,
                interruptions,
                submits: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl ShelfStore for ContendedStore {
        async fn create_shelf(
            &self,
            shelf_id: Option<String>,
            name: String,
        ) -> Result<Arc<Shelf>, StoreError> {
            self.inner.create_shelf(shelf_id, name).await
        }

        async fn get_shelf(&self, shelf_id: &str) -> Result<Arc<Shelf>, StoreError> {
            self.inner.get_shelf(shelf_id).await
        }

        async fn insert_item(
            &self,
            shelf_id: &str,
            item: Item,
            reference_item_id: Option<&str>,
            before: bool,
        ) -> Result<ReorderOutcome, StoreError> {
            self.inner
                .insert_item(shelf_id, item, reference_item_id, before)
                .await
        }

        async fn remove_item(&self, shelf_id: &str, item_id: &str) -> Result<Item, StoreError> {
            self.inner.remove_item(shelf_id, item_id).await
        }

        async fn submit_reorder(
            &self,
            shelf_id: &str,
            intent: &ReorderIntent,
        ) -> Result<ReorderOutcome, StoreError> {
            self.inner.submit_reorder(shelf_id, intent).await
        }

        async fn submit_reorder_with_occ(
            &self,
            shelf_id: &str,
            intent: &ReorderIntent,
            expected_version: u64,
        ) -> Result<ReorderOutcome, StoreError> {
            let n = self.submits.fetch_add(1, Ordering::SeqCst);
            if n < self.interruptions {
                let competitor = item(&format!("competitor-{}", n));
                self.inner
                    .insert_item(shelf_id, competitor, None, false)
                    .await?;
            }
            self.inner
                .submit_reorder_with_occ(shelf_id, intent, expected_version)
                .await
        }

        async fn rebalance_shelf(&self, shelf_id: &str) -> Result<ReorderOutcome, StoreError> {
            self.inner.rebalance_shelf(shelf_id).await
        }

        async fn get_position_metrics(&self, shelf_id: &str) -> Result<GapStats, StoreError> {
            self.inner.get_position_metrics(shelf_id).await
        }

        fn subscribe_to_events(&self) -> broadcast::Receiver<DomainEvent> {
            self.inner.subscribe_to_events()
        }
    }

    async fn order_of(store: &dyn ShelfStore) -> Vec<String> {
        let shelf = store.get_shelf("s").await.unwrap();
        shelf.ordered_view().item_ids().map(str::to_string).collect()
    }

    #[tokio::test]
    async fn test_commit_succeeds_on_first_attempt() {
        let store = Arc::new(ContendedStore::new(&["a", "b", "c"], 0).await);
        let queue = ReorderQueue::new(store.clone(), fast_retry(3));

        let outcome = queue
            .commit_with_retry("s", &ReorderIntent::to_head("c"))
            .await
            .unwrap();

        assert!(!outcome.rebalanced);
        assert_eq!(order_of(store.as_ref()).await, vec!["c", "a", "b"]);
        assert_eq!(store.submits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_commit_retries_after_version_conflict() {
        let store = Arc::new(ContendedStore::new(&["a", "b", "c"], 2).await);
        let queue = ReorderQueue::new(store.clone(), fast_retry(3));

        queue
            .commit_with_retry("s", &ReorderIntent::before("c", "a"))
            .await
            .unwrap();

        assert_eq!(store.submits.load(Ordering::SeqCst), 3);
        assert_eq!(
            order_of(store.as_ref()).await,
            vec!["c", "a", "b", "competitor-0", "competitor-1"]
        );
    }

    #[tokio::test]
    async fn test_commit_gives_up_after_max_retries() {
        let store = Arc::new(ContendedStore::new(&["a", "b"], usize::MAX).await);
        let queue = ReorderQueue::new(store.clone(), fast_retry(2));

        let err = queue
            .commit_with_retry("s", &ReorderIntent::to_head("b"))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            ReorderError::MaxRetriesExceeded { attempts: 3, .. }
        ));
        assert_eq!(store.submits.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_zero_retries_is_single_attempt() {
        let store = Arc::new(ContendedStore::new(&["a", "b"], 1).await);
        let queue = ReorderQueue::new(store.clone(), fast_retry(0));

        let err = queue
            .commit_with_retry("s", &ReorderIntent::to_head("b"))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            ReorderError::MaxRetriesExceeded { attempts: 1, .. }
        ));
    }

    #[tokio::test]
    async fn test_missing_reference_is_not_retried() {
        let store = Arc::new(ContendedStore::new(&["a", "b", "c"], 0).await);
        store.remove_item("s", "a").await.unwrap();
        let queue = ReorderQueue::new(store.clone(), fast_retry(3));

        let err = queue
            .commit_with_retry("s", &ReorderIntent::after("c", "a"))
            .await
            .unwrap_err();

        assert!(matches!(err, ReorderError::ReferenceVanished { .. }));
        assert_eq!(store.submits.load(Ordering::SeqCst), 0);
        assert_eq!(order_of(store.as_ref()).await, vec!["b", "c"]);
    }

    #[tokio::test]
    async fn test_missing_item_is_terminal() {
        let store = Arc::new(ContendedStore::new(&["a"], 0).await);
        let queue = ReorderQueue::new(store.clone(), fast_retry(3));

        let err = queue
            .commit_with_retry("s", &ReorderIntent::to_head("ghost"))
            .await
            .unwrap_err();
        assert!(err.is_not_found());

        let err = queue
            .commit_with_retry("nope", &ReorderIntent::to_head("a"))
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }
}
