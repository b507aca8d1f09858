use serde::{Deserialize, Serialize};

/// Relay server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: String,
    /// Valid range: 1-65535.
    pub port: u32,
    /// Postgres connection string. Session logging is disabled when unset.
    pub database_url: Option<String>,
    /// Outbound frames buffered per connection before new ones are dropped.
    pub outbound_queue: u32,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0".into(),
            port: 3000,
            database_url: None,
            outbound_queue: 256,
        }
    }
}
