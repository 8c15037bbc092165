//! Position Keys
//!
//! A `PositionKey` is the scalar that orders an item inside its shelf. Keys are
//! finite IEEE-754 doubles, so the key space is dense enough for thousands of
//! midpoint insertions but not infinitely so: between two adjacent representable
//! doubles there is no room left and a rebalance is required.
//!
//! # Precision budget
//!
//! With a step of `1.0`, tail appends stay exactly representable up to 2^53
//! items. Midpoint insertion halves the local gap each time; between keys of
//! magnitude `m` the smallest distinguishable gap is `m * f64::EPSILON`.
//! `RebalanceMonitor` triggers well above that floor.

use crate::db::OrderingError;
use serde::{Deserialize, Deserializer, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Finite, totally ordered position of an item within a shelf
///
/// `-0.0` is normalized to `0.0` on construction so that equality and
/// ordering agree.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(transparent)]
pub struct PositionKey(f64);

impl PositionKey {
    /// The key handed out for the first item of an empty shelf
    pub const ZERO: PositionKey = PositionKey(0.0);

    /// Create a key, rejecting NaN and infinities
    pub fn new(value: f64) -> Result<Self, OrderingError> {
        if !value.is_finite() {
            return Err(OrderingError::non_finite_key(value));
        }
        // Collapse -0.0 into 0.0
        Ok(Self(value + 0.0))
    }

    /// Raw numeric value
    pub fn value(self) -> f64 {
        self.0
    }

    /// Strict midpoint between `self` and `upper`
    ///
    /// Returns `None` when no representable double lies strictly between the
    /// two keys, or when `self >= upper`.
    pub fn midpoint(self, upper: PositionKey) -> Option<PositionKey> {
        if self >= upper {
            return None;
        }

        let sum = self.0 + upper.0;
        let mid = if sum.is_finite() {
            sum / 2.0
        } else {
            // Both bounds near f64::MAX with the same sign
            self.0 / 2.0 + upper.0 / 2.0
        };

        (mid > self.0 && mid < upper.0).then_some(PositionKey(mid + 0.0))
    }

    /// Key `step` below this one, if it is representable and strictly lower
    pub fn step_down(self, step: f64) -> Option<PositionKey> {
        let next = self.0 - step;
        (next.is_finite() && next < self.0).then_some(PositionKey(next + 0.0))
    }

    /// Key `step` above this one, if it is representable and strictly higher
    pub fn step_up(self, step: f64) -> Option<PositionKey> {
        let next = self.0 + step;
        (next.is_finite() && next > self.0).then_some(PositionKey(next + 0.0))
    }

    /// Distance to a higher key
    pub fn gap_to(self, upper: PositionKey) -> f64 {
        upper.0 - self.0
    }
}

impl PartialEq for PositionKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for PositionKey {}

impl PartialOrd for PositionKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for PositionKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl fmt::Display for PositionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<f64> for PositionKey {
    type Error = OrderingError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<PositionKey> for f64 {
    fn from(key: PositionKey) -> Self {
        key.0
    }
}

impl<'de> Deserialize<'de> for PositionKey {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = f64::deserialize(deserializer)?;
        PositionKey::new(value).map_err(serde::de::Error::custom)
    }
}
