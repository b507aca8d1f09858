//! Configuration, events, and commands for the relay connection.

use waypoint_common::{ClientEvent, ServerEvent};

/// How to reach the relay and how hard to retry.
#[derive(Debug, Clone)]
pub struct RelayClientConfig {
    /// WebSocket URL, e.g. `ws://localhost:3000`.
    pub url: String,
    /// Reconnect base delay in seconds.
    pub reconnect_delay_secs: u64,
    /// Maximum reconnect delay in seconds.
    pub max_reconnect_delay_secs: u64,
    /// Handshake timeout in seconds.
    pub connect_timeout_secs: u64,
}

impl Default for RelayClientConfig {
    fn default() -> Self {
        Self {
            url: "ws://localhost:3000".into(),
            reconnect_delay_secs: 1,
            max_reconnect_delay_secs: 30,
            connect_timeout_secs: 15,
        }
    }
}

/// Events emitted by the relay client.
#[derive(Debug, Clone, PartialEq)]
pub enum RelayEvent {
    /// WebSocket connection established (again).
    Connected,
    /// WebSocket connection lost; a reconnect is scheduled.
    Disconnected,
    /// A frame from the relay.
    Server(ServerEvent),
}

/// Commands sent to the background connection task.
#[derive(Debug)]
pub(crate) enum RelayCommand {
    Send(ClientEvent),
    Shutdown,
}
