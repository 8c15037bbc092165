//! ShelfSpace Core Ordering Engine
//!
//! This crate keeps the items of a user-curated collection ("shelf") in a
//! stable order without rewriting the collection on every edit.
//!
//! # Architecture
//!
//! - **Fractional keys**: every item carries an `f64` position key; inserts
//!   take the midpoint between neighbors
//! - **Rebalancing**: when gaps approach the precision floor, all keys are
//!   respaced to `0, step, 2*step, ...` in one atomic swap
//! - **Relative moves**: clients send "place X before/after Y", never indices
//! - **Snapshots**: the store publishes whole, versioned shelf snapshots
//!
//! # Modules
//!
//! - [`models`] - Data structures (PositionKey, Item, Shelf, ReorderIntent)
//! - [`config`] - Ordering and retry policy
//! - [`db`] - Key allocation, ordered views, metrics and the store-of-record
//! - [`operations`] - Retrying commit queue
//! - [`services`] - Drag-and-drop controller, sessions and the shelf service

pub mod config;
pub mod db;
pub mod models;
pub mod operations;
pub mod services;

// Re-export commonly used types
pub use config::{OrderingConfig, RetryConfig, ShelfConfig};
pub use models::*;
pub use services::*;
