//! Ordering Engine and Store Layer
//!
//! This module holds everything that touches position keys:
//!
//! - Key allocation and rebalancing (`fractional_ordering`)
//! - Derived ordered views over a shelf's keys (`ordered_view`)
//! - Gap metrics and the rebalance trigger (`metrics`)
//! - The store-of-record contract and its in-memory implementation
//! - Domain events broadcast after each committed mutation
//!
//! # Architecture
//!
//! Keys are plain `f64` values allocated by midpoint between neighbors. The
//! store is the only writer: it serializes mutations per shelf, rebalances
//! when the key space runs short and publishes whole snapshots, so clients
//! always read a consistent order.

mod error;
pub mod events;
pub mod fractional_ordering;
mod memory_store;
pub mod metrics;
pub mod ordered_view;
mod shelf_store;

pub use error::{OrderingError, StoreError};
pub use events::{DomainEvent, PositionUpdate};
pub use fractional_ordering::{KeyAllocator, Rebalancer};
pub use memory_store::InMemoryShelfStore;
pub use metrics::{GapStats, RebalanceMonitor};
pub use ordered_view::{order, OrderedEntry, OrderedView, Slot};
pub use shelf_store::ShelfStore;
