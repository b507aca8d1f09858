//! Sharer-side settings: sample filtering and the positioning source.

use serde::{Deserialize, Serialize};

/// Accuracy gate and send throttle applied to outgoing samples.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    /// Readings less accurate than this many meters are dropped.
    pub rejection_threshold: f64,
    /// Minimum milliseconds between two transmitted samples.
    pub min_interval_ms: u64,
    /// Let one over-threshold reading through before anything has been sent.
    pub first_sample_bypass: bool,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            rejection_threshold: 100.0,
            min_interval_ms: 2000,
            first_sample_bypass: true,
        }
    }
}

/// Options handed to the positioning source.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PositioningConfig {
    pub high_accuracy: bool,
    /// Maximum age of a cached reading, 0 means always fresh.
    pub maximum_age_ms: u64,
    /// How long to wait for a reading before reporting a timeout.
    pub timeout_ms: u64,
}

impl Default for PositioningConfig {
    fn default() -> Self {
        Self {
            high_accuracy: true,
            maximum_age_ms: 0,
            timeout_ms: 30_000,
        }
    }
}
