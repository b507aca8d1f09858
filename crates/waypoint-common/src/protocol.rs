//! Relay wire protocol.
//!
//! Every frame is a JSON text message of the form
//! `{"event": "<name>", "data": <payload>}`. Location payloads stay as raw
//! JSON so the relay can forward them without touching anything but `room`.

use serde::{Deserialize, Serialize};

use crate::id::SessionId;
use crate::sample::LocationSample;

/// Event names as they appear on the wire.
pub mod events {
    pub const JOIN: &str = "join";
    pub const UPDATE_LOCATION: &str = "update_location";
    pub const STOP_SHARING: &str = "stop_sharing";
    pub const RECEIVE_LOCATION: &str = "receive_location";
    pub const DEVICE_STOPPED: &str = "device_stopped";
}

/// Messages a client sends to the relay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data")]
pub enum ClientEvent {
    #[serde(rename = "join")]
    Join(String),

    #[serde(rename = "update_location")]
    UpdateLocation(serde_json::Value),

    #[serde(rename = "stop_sharing")]
    StopSharing(String),
}

impl ClientEvent {
    pub fn join(session_id: &SessionId) -> Self {
        ClientEvent::Join(session_id.as_str().to_string())
    }

    pub fn stop_sharing(session_id: &SessionId) -> Self {
        ClientEvent::StopSharing(session_id.as_str().to_string())
    }

    pub fn update_location(sample: &LocationSample) -> Result<Self, serde_json::Error> {
        Ok(ClientEvent::UpdateLocation(serde_json::to_value(sample)?))
    }

    /// Room an `update_location` payload is addressed to, if it names one.
    pub fn target_room(payload: &serde_json::Value) -> Option<&str> {
        payload.get("room").and_then(|v| v.as_str())
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Messages the relay sends to room members.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data")]
pub enum ServerEvent {
    #[serde(rename = "receive_location")]
    ReceiveLocation(serde_json::Value),

    #[serde(rename = "device_stopped")]
    DeviceStopped,
}

impl ServerEvent {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Decode a forwarded location payload into a typed sample.
    pub fn location(&self) -> Option<Result<LocationSample, serde_json::Error>> {
        match self {
            ServerEvent::ReceiveLocation(payload) => {
                Some(serde_json::from_value(payload.clone()))
            }
            ServerEvent::DeviceStopped => None,
        }
    }
}
