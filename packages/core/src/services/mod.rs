//! Client Services
//!
//! This module contains the client-facing layer on top of the store:
//!
//! - `ReorderController` - drag-and-drop state machine (pure, synchronous)
//! - `ReorderSession` - drives a controller against the commit queue
//! - `ShelfService` - ordered projections, metrics and proactive rebalancing
//!
//! Services coordinate between the store layer and UI collaborators; they own
//! no ordering state beyond what they fetched.

pub mod reorder_controller;
pub mod reorder_session;
pub mod shelf_service;

pub use reorder_controller::{
    CommitFailure, CommitToken, ControllerEvent, ControllerState, Effect, ReorderController,
};
pub use reorder_session::ReorderSession;
pub use shelf_service::ShelfService;
