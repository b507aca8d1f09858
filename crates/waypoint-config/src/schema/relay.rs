use serde::{Deserialize, Serialize};

/// How clients reach the relay server.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RelayConfig {
    /// WebSocket URL of the relay server.
    pub url: String,
    /// Initial reconnect delay in seconds.
    pub reconnect_delay_secs: u64,
    /// Upper bound for the exponential reconnect backoff, in seconds.
    pub max_reconnect_delay_secs: u64,
    /// Seconds to wait for the WebSocket handshake.
    pub connect_timeout_secs: u64,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            url: "ws://localhost:3000".into(),
            reconnect_delay_secs: 1,
            max_reconnect_delay_secs: 30,
            connect_timeout_secs: 15,
        }
    }
}
