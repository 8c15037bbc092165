//! Data Models
//!
//! This module contains the core data structures of the ordering engine:
//!
//! - `PositionKey` - Finite, totally ordered scalar placing an item on a shelf
//! - `Shelf` / `Item` - The ordered collection aggregate and its entries
//! - `ReorderIntent` / `ReorderOutcome` - Relative move requests and their results

mod position_key;
mod reorder;
mod shelf;

pub use position_key::PositionKey;
pub use reorder::{ReorderIntent, ReorderOutcome};
pub use shelf::{Item, Shelf};
