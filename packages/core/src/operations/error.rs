//! Reorder Operation Error Types
//!
//! Errors surfaced by the retrying commit path. Store errors pass through
//! unchanged; the two extra variants describe how a retry loop gave up.

use crate::db::StoreError;
use thiserror::Error;

/// Errors from committing a reorder through the retry queue
#[derive(Error, Debug)]
pub enum ReorderError {
    /// Error returned by the store that is not retried
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// The reference item disappeared while retrying
    ///
    /// The intent can no longer be expressed against the current shelf; the
    /// caller should refetch and let the user decide again.
    #[error("Reference item '{reference_item_id}' vanished from shelf {shelf_id}")]
    ReferenceVanished {
        shelf_id: String,
        reference_item_id: String,
    },

    /// Every attempt hit a conflict
    #[error("Reorder of '{item_id}' on shelf {shelf_id} still conflicting after {attempts} attempts")]
    MaxRetriesExceeded {
        shelf_id: String,
        item_id: String,
        attempts: usize,
    },
}

impl ReorderError {
    /// Create a reference vanished error
    pub fn reference_vanished(
        shelf_id: impl Into<String>,
        reference_item_id: impl Into<String>,
    ) -> Self {
        Self::ReferenceVanished {
            shelf_id: shelf_id.into(),
            reference_item_id: reference_item_id.into(),
        }
    }

    /// Create a max retries exceeded error
    pub fn max_retries_exceeded(
        shelf_id: impl Into<String>,
        item_id: impl Into<String>,
        attempts: usize,
    ) -> Self {
        Self::MaxRetriesExceeded {
            shelf_id: shelf_id.into(),
            item_id: item_id.into(),
            attempts,
        }
    }

    /// Shelf or moved item no longer exists
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Store(e) if e.is_not_found())
    }

    /// Client view is stale; refetching is the right recovery
    pub fn is_conflict(&self) -> bool {
        match self {
            Self::Store(e) => e.is_conflict(),
            Self::ReferenceVanished { .. } | Self::MaxRetriesExceeded { .. } => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification() {
        let not_found: ReorderError = StoreError::item_not_found("s", "a").into();
        assert!(not_found.is_not_found());
        assert!(!not_found.is_conflict());

        assert!(ReorderError::reference_vanished("s", "b").is_conflict());
        assert!(ReorderError::max_retries_exceeded("s", "a", 4).is_conflict());

        let integrity: ReorderError = StoreError::invariant_violation("s", "dup").into();
        assert!(!integrity.is_conflict());
        assert!(!integrity.is_not_found());
    }

    #[test]
    fn test_display() {
        let err = ReorderError::max_retries_exceeded("shelf-1", "item-1", 4);
        assert_eq!(
            err.to_string(),
            "Reorder of 'item-1' on shelf shelf-1 still conflicting after 4 attempts"
        );
    }
}
