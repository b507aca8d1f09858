//! Relay client: one WebSocket to the relay, driven by a background task.

mod client;
mod connection;
mod types;

pub use client::{RelayClient, RelaySender};
pub use types::{RelayClientConfig, RelayEvent};
