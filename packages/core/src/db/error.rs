//! Ordering and Store Error Types
//!
//! This module defines error types for key allocation and for the shelf
//! store-of-record, providing clear error handling for precision exhaustion,
//! stale client state and data-integrity violations.

use thiserror::Error;

/// Key allocation errors
///
/// `Exhausted` is a normal runtime condition that the store recovers from by
/// rebalancing. `InvertedBounds` and `NonFiniteKey` indicate a caller bug.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum OrderingError {
    /// No representable key lies strictly between the neighbors
    #[error("No position key available between {lower:?} and {upper:?}")]
    Exhausted {
        lower: Option<f64>,
        upper: Option<f64>,
    },

    /// Neighbors passed out of order
    #[error("Lower bound {lower} is not below upper bound {upper}")]
    InvertedBounds { lower: f64, upper: f64 },

    /// NaN or infinite key value
    #[error("Position key must be finite, got {value}")]
    NonFiniteKey { value: f64 },
}

impl OrderingError {
    /// Create an exhausted error
    pub fn exhausted(lower: Option<f64>, upper: Option<f64>) -> Self {
        Self::Exhausted { lower, upper }
    }

    /// Create an inverted bounds error
    pub fn inverted_bounds(lower: f64, upper: f64) -> Self {
        Self::InvertedBounds { lower, upper }
    }

    /// Create a non-finite key error
    pub fn non_finite_key(value: f64) -> Self {
        Self::NonFiniteKey { value }
    }

    pub fn is_exhausted(&self) -> bool {
        matches!(self, Self::Exhausted { .. })
    }
}

/// Store-of-record errors
///
/// Variants fall into three groups: not-found (terminal for the current
/// operation), conflict (the client's view is stale and must be refetched) and
/// integrity failures (refused outright).
#[derive(Error, Debug)]
pub enum StoreError {
    /// Shelf does not exist
    #[error("Shelf not found: {shelf_id}")]
    ShelfNotFound { shelf_id: String },

    /// Item is not on the shelf
    #[error("Item '{item_id}' not found on shelf {shelf_id}")]
    ItemNotFound { shelf_id: String, item_id: String },

    /// Shelf ID already taken
    #[error("Shelf already exists: {shelf_id}")]
    ShelfAlreadyExists { shelf_id: String },

    /// Item ID already present on the shelf
    #[error("Item '{item_id}' is already on shelf {shelf_id}")]
    DuplicateItem { shelf_id: String, item_id: String },

    /// Shelf changed since the client's last view (e.g. reference item removed)
    #[error("Conflict on shelf {shelf_id}: {reason}")]
    Conflict { shelf_id: String, reason: String },

    /// Optimistic concurrency check failed
    #[error("Version conflict for shelf {shelf_id}: expected version {expected_version}, found {actual_version}")]
    VersionConflict {
        shelf_id: String,
        expected_version: u64,
        actual_version: u64,
    },

    /// Mutation would break the domain or key-uniqueness invariant
    #[error("Invariant violation on shelf {shelf_id}: {reason}")]
    InvariantViolation { shelf_id: String, reason: String },

    /// Key allocation failed even after rebalancing
    #[error("Ordering failed: {0}")]
    Ordering(#[from] OrderingError),

    /// Store constructed with an invalid ordering policy
    #[error("Invalid ordering configuration: {0}")]
    InvalidConfig(String),
}

impl StoreError {
    /// Create a shelf not found error
    pub fn shelf_not_found(shelf_id: impl Into<String>) -> Self {
        Self::ShelfNotFound {
            shelf_id: shelf_id.into(),
        }
    }

    /// Create an item not found error
    pub fn item_not_found(shelf_id: impl Into<String>, item_id: impl Into<String>) -> Self {
        Self::ItemNotFound {
            shelf_id: shelf_id.into(),
            item_id: item_id.into(),
        }
    }

    /// Create a shelf already exists error
    pub fn shelf_already_exists(shelf_id: impl Into<String>) -> Self {
        Self::ShelfAlreadyExists {
            shelf_id: shelf_id.into(),
        }
    }

    /// Create a duplicate item error
    pub fn duplicate_item(shelf_id: impl Into<String>, item_id: impl Into<String>) -> Self {
        Self::DuplicateItem {
            shelf_id: shelf_id.into(),
            item_id: item_id.into(),
        }
    }

    /// Create a conflict error
    pub fn conflict(shelf_id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Conflict {
            shelf_id: shelf_id.into(),
            reason: reason.into(),
        }
    }

    /// Create a version conflict error
    pub fn version_conflict(
        shelf_id: impl Into<String>,
        expected_version: u64,
        actual_version: u64,
    ) -> Self {
        Self::VersionConflict {
            shelf_id: shelf_id.into(),
            expected_version,
            actual_version,
        }
    }

    /// Create an invariant violation error
    pub fn invariant_violation(shelf_id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvariantViolation {
            shelf_id: shelf_id.into(),
            reason: reason.into(),
        }
    }

    /// Stale client state; recover by refetching
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict { .. } | Self::VersionConflict { .. })
    }

    /// Shelf or item is gone; terminal for the operation
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::ShelfNotFound { .. } | Self::ItemNotFound { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_classification() {
        assert!(StoreError::conflict("s", "gone").is_conflict());
        assert!(StoreError::version_conflict("s", 1, 2).is_conflict());
        assert!(StoreError::item_not_found("s", "i").is_not_found());
        assert!(StoreError::shelf_not_found("s").is_not_found());

        let integrity = StoreError::invariant_violation("s", "duplicate key");
        assert!(!integrity.is_conflict());
        assert!(!integrity.is_not_found());
    }

    #[test]
    fn test_ordering_error_converts_into_store_error() {
        let err: StoreError = OrderingError::exhausted(Some(1.0), Some(1.0)).into();
        assert!(matches!(err, StoreError::Ordering(ref e) if e.is_exhausted()));
        assert!(err.to_string().contains("Ordering failed"));
    }
}
