//! Fractional ordering: key allocation and rebalancing
//!
//! New keys are placed between their neighbors so a move touches exactly one
//! item. When repeated midpoint insertion runs out of representable doubles,
//! the whole shelf is respaced by [`Rebalancer`].

use crate::config::OrderingConfig;
use crate::db::OrderingError;
use crate::models::PositionKey;
use std::collections::HashMap;

/// Allocates a key for inserting between two neighbors
#[derive(Debug, Clone)]
pub struct KeyAllocator {
    default_key: f64,
    step: f64,
}

impl KeyAllocator {
    pub fn new(config: &OrderingConfig) -> Self {
        Self {
            default_key: config.default_key,
            step: config.default_step,
        }
    }

    /// Calculate a key strictly between `lower` and `upper`
    ///
    /// # Examples
    /// ```
    /// # use shelfspace_core::config::OrderingConfig;
    /// # use shelfspace_core::db::KeyAllocator;
    /// # use shelfspace_core::models::PositionKey;
    /// let allocator = KeyAllocator::new(&OrderingConfig::default());
    /// let k = |v: f64| PositionKey::new(v).unwrap();
    ///
    /// // Empty shelf
    /// assert_eq!(allocator.allocate(None, None).unwrap(), k(0.0));
    /// // Before the first item
    /// assert_eq!(allocator.allocate(None, Some(k(5.0))).unwrap(), k(4.0));
    /// // After the last item
    /// assert_eq!(allocator.allocate(Some(k(3.0)), None).unwrap(), k(4.0));
    /// // Between two items
    /// assert_eq!(allocator.allocate(Some(k(0.0)), Some(k(1.0))).unwrap(), k(0.5));
    /// ```
    ///
    /// # Errors
    ///
    /// - `Exhausted` if no representable key exists in the requested range
    /// - `InvertedBounds` if `lower >= upper` (caller bug)
    pub fn allocate(
        &self,
        lower: Option<PositionKey>,
        upper: Option<PositionKey>,
    ) -> Result<PositionKey, OrderingError> {
        match (lower, upper) {
            (None, None) => PositionKey::new(self.default_key),
            (None, Some(upper)) => upper
                .step_down(self.step)
                .ok_or_else(|| OrderingError::exhausted(None, Some(upper.value()))),
            (Some(lower), None) => lower
                .step_up(self.step)
                .ok_or_else(|| OrderingError::exhausted(Some(lower.value()), None)),
            (Some(lower), Some(upper)) => {
                if lower >= upper {
                    return Err(OrderingError::inverted_bounds(lower.value(), upper.value()));
                }
                lower.midpoint(upper).ok_or_else(|| {
                    OrderingError::exhausted(Some(lower.value()), Some(upper.value()))
                })
            }
        }
    }
}

/// Reassigns evenly spaced keys to an already ordered sequence
#[derive(Debug, Clone)]
pub struct Rebalancer {
    step: f64,
}

impl Rebalancer {
    pub fn new(config: &OrderingConfig) -> Self {
        Self {
            step: config.default_step,
        }
    }

    /// Rebalance orders to have even spacing
    ///
    /// # Example
    /// Input:  `[a, b, c, d]` (any keys)
    /// Output: `{a: 0.0, b: 1.0, c: 2.0, d: 3.0}`
    pub fn rebalance<I, S>(
        &self,
        ordered_item_ids: I,
    ) -> Result<HashMap<String, PositionKey>, OrderingError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ordered_item_ids
            .into_iter()
            .enumerate()
            .map(|(index, id)| {
                let id: String = id.into();
                PositionKey::new(index as f64 * self.step).map(|key| (id, key))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(value: f64) -> PositionKey {
        PositionKey::new(value).unwrap()
    }

    fn allocator() -> KeyAllocator {
        KeyAllocator::new(&OrderingConfig::default())
    }

    #[test]
    fn test_allocate_first_child() {
        assert_eq!(allocator().allocate(None, None).unwrap(), key(0.0));
    }

    #[test]
    fn test_allocate_before_first() {
        assert_eq!(allocator().allocate(None, Some(key(2.0))).unwrap(), key(1.0));
    }

    #[test]
    fn test_allocate_after_last() {
        assert_eq!(allocator().allocate(Some(key(3.0)), None).unwrap(), key(4.0));
    }

    #[test]
    fn test_allocate_between() {
        assert_eq!(
            allocator().allocate(Some(key(1.0)), Some(key(3.0))).unwrap(),
            key(2.0)
        );
    }

    #[test]
    fn test_allocate_between_adjacent_doubles_is_exhausted() {
        let lower = 1.0_f64;
        let upper = f64::from_bits(lower.to_bits() + 1);

        let err = allocator()
            .allocate(Some(key(lower)), Some(key(upper)))
            .unwrap_err();
        assert!(err.is_exhausted());
    }

    #[test]
    fn test_allocate_tail_exhausted_at_large_magnitude() {
        let err = allocator()
            .allocate(Some(key(f64::MAX)), None)
            .unwrap_err();
        assert!(err.is_exhausted());

        // 2^53 + 1.0 is not representable
        let err = allocator()
            .allocate(Some(key(9_007_199_254_740_992.0)), None)
            .unwrap_err();
        assert!(err.is_exhausted());
    }

    #[test]
    fn test_allocate_inverted_bounds() {
        let err = allocator()
            .allocate(Some(key(2.0)), Some(key(1.0)))
            .unwrap_err();
        assert_eq!(err, OrderingError::inverted_bounds(2.0, 1.0));
    }

    #[test]
    fn test_allocate_respects_custom_step() {
        let config = OrderingConfig {
            default_step: 1024.0,
            default_key: 100.0,
            ..OrderingConfig::default()
        };
        let allocator = KeyAllocator::new(&config);
        assert_eq!(allocator.allocate(None, None).unwrap(), key(100.0));
        assert_eq!(allocator.allocate(Some(key(0.0)), None).unwrap(), key(1024.0));
    }

    #[test]
    fn test_sequential_tail_appends_stay_exact() {
        let allocator = allocator();
        let mut last = allocator.allocate(None, None).unwrap();
        for expected in 1..=10_000 {
            last = allocator.allocate(Some(last), None).unwrap();
            assert_eq!(last.value(), expected as f64);
        }
    }

    #[test]
    fn test_rebalance_assigns_even_spacing() {
        let positions = Rebalancer::new(&OrderingConfig::default())
            .rebalance(["a", "b", "c", "d"])
            .unwrap();

        assert_eq!(positions.len(), 4);
        assert_eq!(positions["a"], key(0.0));
        assert_eq!(positions["b"], key(1.0));
        assert_eq!(positions["c"], key(2.0));
        assert_eq!(positions["d"], key(3.0));
    }

    #[test]
    fn test_rebalance_empty_sequence() {
        let positions = Rebalancer::new(&OrderingConfig::default())
            .rebalance(Vec::<String>::new())
            .unwrap();
        assert!(positions.is_empty());
    }
}
