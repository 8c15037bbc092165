//! Configuration for key allocation, rebalancing and commit retries

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Spacing between consecutive keys after a rebalance and for head/tail inserts
pub const DEFAULT_STEP: f64 = 1.0;

/// Key given to the first item on an empty shelf
pub const DEFAULT_KEY: f64 = 0.0;

/// Smallest gap tolerated before a rebalance is due, as a fraction of the step
pub const DEFAULT_REBALANCE_FRACTION: f64 = 1.0e-6;

/// Minimum distance from the precision floor, in multiples of
/// `|key| * f64::EPSILON`, below which a gap always needs a rebalance
pub const DEFAULT_PRECISION_HEADROOM: f64 = 1024.0;

/// Key-space policy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrderingConfig {
    /// Key for the first item of an empty shelf
    pub default_key: f64,

    /// Step used for head/tail inserts and for rebalanced spacing
    pub default_step: f64,

    /// Absolute gap below which the monitor asks for a rebalance
    pub rebalance_threshold: f64,

    /// Magnitude-relative headroom over `f64::EPSILON`
    pub precision_headroom: f64,
}

impl Default for OrderingConfig {
    fn default() -> Self {
        Self {
            default_key: DEFAULT_KEY,
            default_step: DEFAULT_STEP,
            rebalance_threshold: DEFAULT_STEP * DEFAULT_REBALANCE_FRACTION,
            precision_headroom: DEFAULT_PRECISION_HEADROOM,
        }
    }
}

impl OrderingConfig {
    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if !self.default_key.is_finite() {
            return Err("default_key must be finite".to_string());
        }

        if !self.default_step.is_finite() || self.default_step <= 0.0 {
            return Err("default_step must be a positive finite number".to_string());
        }

        if !self.rebalance_threshold.is_finite() || self.rebalance_threshold <= 0.0 {
            return Err("rebalance_threshold must be a positive finite number".to_string());
        }

        if self.rebalance_threshold >= self.default_step {
            return Err(format!(
                "rebalance_threshold ({}) must be smaller than default_step ({})",
                self.rebalance_threshold, self.default_step
            ));
        }

        if !self.precision_headroom.is_finite() || self.precision_headroom < 1.0 {
            return Err("precision_headroom must be at least 1".to_string());
        }

        Ok(())
    }
}

/// Retry policy for conflicting reorder commits
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Retries after the first attempt (0 = single attempt)
    pub max_retries: usize,

    /// First backoff delay; doubles on every retry
    pub base_backoff_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_backoff_ms: 10,
        }
    }
}

impl RetryConfig {
    /// Backoff before retry number `attempt` (0-based): 10ms, 20ms, 40ms, ...
    pub fn backoff_ms(&self, attempt: usize) -> u64 {
        let shift = attempt.min(16) as u32;
        self.base_backoff_ms.saturating_mul(1u64 << shift)
    }
}

/// Top-level configuration
///
/// Every section uses `#[serde(default)]`, so partial files deserialize.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ShelfConfig {
    #[serde(default)]
    pub ordering: OrderingConfig,

    #[serde(default)]
    pub retry: RetryConfig,
}

impl ShelfConfig {
    /// Parse and validate a JSON document
    pub fn from_json_str(contents: &str) -> anyhow::Result<Self> {
        let config: ShelfConfig =
            serde_json::from_str(contents).context("Failed to parse shelf config")?;
        config.validate().map_err(anyhow::Error::msg)?;
        Ok(config)
    }

    /// Load configuration from a JSON file, or defaults if it doesn't exist
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_json_str(&contents)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        self.ordering.validate()
    }
}
