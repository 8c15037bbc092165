//! Reorder Operations
//!
//! Commit-side plumbing between a client and the store: the retrying commit
//! queue and the errors it reports.

mod error;
pub mod reorder_queue;

pub use error::ReorderError;
pub use reorder_queue::ReorderQueue;
