use serde::{Deserialize, Serialize};

/// Session identifiers remembered between runs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Id this device shares under, written by `waypoint setup`.
    pub device_id: Option<String>,
    /// Id of the device this machine tracks.
    pub track_target_id: Option<String>,
}
