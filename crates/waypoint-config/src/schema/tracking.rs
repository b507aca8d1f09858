use serde::{Deserialize, Serialize};

/// Tracker display settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackingConfig {
    /// Zoom level applied when the first sample arrives (valid range: 1-20).
    pub acquire_zoom: u32,
    /// Accuracy circle radius in meters when a sample reports none.
    pub fallback_accuracy_radius: f64,
}

impl Default for TrackingConfig {
    fn default() -> Self {
        Self {
            acquire_zoom: 16,
            fallback_accuracy_radius: 50.0,
        }
    }
}
