//! Configuration schema types for Waypoint.
//!
//! All structs use `serde(default)` so partial configs work correctly.

mod relay;
mod server;
mod session;
mod sharing;
mod system;
mod tracking;

pub use relay::*;
pub use server::*;
pub use session::*;
pub use sharing::*;
pub use system::*;
pub use tracking::*;

use serde::{Deserialize, Serialize};

/// Root configuration shared by the relay server and the CLI.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WaypointConfig {
    pub relay: RelayConfig,
    pub server: ServerConfig,
    pub filter: FilterConfig,
    pub positioning: PositioningConfig,
    pub tracking: TrackingConfig,
    pub session: SessionConfig,
    pub logging: LoggingConfig,
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_filter_matches_reference_policy() {
        let config = WaypointConfig::default();
        assert!((config.filter.rejection_threshold - 100.0).abs() < f64::EPSILON);
        assert_eq!(config.filter.min_interval_ms, 2000);
        assert!(config.filter.first_sample_bypass);
    }

    #[test]
    fn default_positioning_always_fresh() {
        let config = WaypointConfig::default();
        assert!(config.positioning.high_accuracy);
        assert_eq!(config.positioning.maximum_age_ms, 0);
        assert_eq!(config.positioning.timeout_ms, 30_000);
    }

    #[test]
    fn default_server_has_no_database() {
        let config = WaypointConfig::default();
        assert_eq!(config.server.port, 3000);
        assert!(config.server.database_url.is_none());
        assert_eq!(config.server.outbound_queue, 256);
    }

    #[test]
    fn default_session_ids_are_unset() {
        let config = WaypointConfig::default();
        assert!(config.session.device_id.is_none());
        assert!(config.session.track_target_id.is_none());
    }

    #[test]
    fn default_tracking() {
        let config = WaypointConfig::default();
        assert_eq!(config.tracking.acquire_zoom, 16);
        assert!((config.tracking.fallback_accuracy_radius - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn logging_directive_uses_level() {
        let mut config = WaypointConfig::default();
        assert_eq!(config.logging.directive("waypoint"), "waypoint=info");
        config.logging.level = LogLevel::Debug;
        assert_eq!(config.logging.directive("waypoint_relay"), "waypoint_relay=debug");
    }

    #[test]
    fn partial_toml_keeps_other_defaults() {
        let toml_str = r#"
[filter]
rejection_threshold = 150.0
"#;
        let config: WaypointConfig = toml::from_str(toml_str).unwrap();
        assert!((config.filter.rejection_threshold - 150.0).abs() < f64::EPSILON);
        assert_eq!(config.filter.min_interval_ms, 2000);
        assert_eq!(config.relay.url, "ws://localhost:3000");
    }
}
