//! Gap Metrics for Rebalance Decisions
//!
//! This module computes spacing statistics over a shelf's ordered keys and
//! decides when the key space is running out of precision.
//!
//! # Threshold
//!
//! A rebalance is due when the smallest gap drops below the larger of:
//!
//! - the configured absolute `rebalance_threshold` (default `1e-6 * step`)
//! - `max|key| * f64::EPSILON * precision_headroom`, the precision floor at the
//!   magnitude of the keys in play, scaled up by the headroom factor
//!
//! Both sit far above the gap at which `KeyAllocator` reports `Exhausted`, so a
//! store that consults the monitor before allocating rarely reaches the
//! reactive fallback.
//!
//! # Usage
//!
//! ```rust
//! use shelfspace_core::config::OrderingConfig;
//! use shelfspace_core::db::RebalanceMonitor;
//! use shelfspace_core::models::PositionKey;
//!
//! let monitor = RebalanceMonitor::new(&OrderingConfig::default());
//! let keys: Vec<PositionKey> = [0.0, 0.5, 1.0]
//!     .into_iter()
//!     .map(|v| PositionKey::new(v).unwrap())
//!     .collect();
//!
//! let stats = monitor.stats(&keys, 0);
//! assert_eq!(stats.min_gap, 0.5);
//! assert!(!stats.needs_rebalance);
//! ```

use crate::config::OrderingConfig;
use crate::models::PositionKey;
use serde::{Deserialize, Serialize};

/// Spacing statistics for one shelf
///
/// Derived on demand and never persisted, except `rebalance_count` which is
/// carried over from the shelf. With fewer than two items every gap is
/// `f64::INFINITY`, which goes over the wire as `null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GapStats {
    pub item_count: usize,
    #[serde(with = "unbounded_gap")]
    pub min_gap: f64,
    #[serde(with = "unbounded_gap")]
    pub max_gap: f64,
    #[serde(with = "unbounded_gap")]
    pub avg_gap: f64,
    pub rebalance_count: u64,
    pub needs_rebalance: bool,
}

/// JSON has no infinity; an unbounded gap is written as `null`
mod unbounded_gap {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(gap: &f64, serializer: S) -> Result<S::Ok, S::Error> {
        if gap.is_finite() {
            serializer.serialize_f64(*gap)
        } else {
            serializer.serialize_none()
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(f64::INFINITY))
    }
}

/// Decides whether a shelf's keys need respacing
#[derive(Debug, Clone)]
pub struct RebalanceMonitor {
    threshold: f64,
    headroom: f64,
}

impl RebalanceMonitor {
    pub fn new(config: &OrderingConfig) -> Self {
        Self {
            threshold: config.rebalance_threshold,
            headroom: config.precision_headroom,
        }
    }

    /// Compute gap statistics over keys in ascending order
    pub fn stats(&self, ordered_keys: &[PositionKey], rebalance_count: u64) -> GapStats {
        if ordered_keys.len() < 2 {
            return GapStats {
                item_count: ordered_keys.len(),
                min_gap: f64::INFINITY,
                max_gap: f64::INFINITY,
                avg_gap: f64::INFINITY,
                rebalance_count,
                needs_rebalance: false,
            };
        }

        let mut min_gap = f64::INFINITY;
        let mut max_gap = 0.0_f64;
        let mut total = 0.0_f64;
        for pair in ordered_keys.windows(2) {
            let gap = pair[0].gap_to(pair[1]);
            min_gap = min_gap.min(gap);
            max_gap = max_gap.max(gap);
            total += gap;
        }

        let gap_count = (ordered_keys.len() - 1) as f64;
        let needs_rebalance = min_gap < self.effective_threshold(ordered_keys);

        GapStats {
            item_count: ordered_keys.len(),
            min_gap,
            max_gap,
            avg_gap: total / gap_count,
            rebalance_count,
            needs_rebalance,
        }
    }

    /// Gap below which a rebalance is due for this set of keys
    pub fn effective_threshold(&self, keys: &[PositionKey]) -> f64 {
        let magnitude = keys
            .iter()
            .map(|k| k.value().abs())
            .fold(0.0_f64, f64::max);
        self.threshold
            .max(magnitude * f64::EPSILON * self.headroom)
    }

    /// Shortcut for `stats(..).needs_rebalance`
    pub fn needs_rebalance(&self, ordered_keys: &[PositionKey]) -> bool {
        self.stats(ordered_keys, 0).needs_rebalance
    }
}
