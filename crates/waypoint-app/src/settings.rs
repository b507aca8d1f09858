//! Mapping from config sections to client types.

use std::time::Duration;

use waypoint_client::{FilterPolicy, RelayClientConfig, SourceOptions, ViewOptions};
use waypoint_common::{Role, SessionId, WaypointError};
use waypoint_config::schema::{FilterConfig, PositioningConfig, RelayConfig, TrackingConfig};

pub fn relay_config(relay: &RelayConfig, url_override: Option<&str>) -> RelayClientConfig {
    RelayClientConfig {
        url: url_override.unwrap_or(&relay.url).to_string(),
        reconnect_delay_secs: relay.reconnect_delay_secs,
        max_reconnect_delay_secs: relay.max_reconnect_delay_secs,
        connect_timeout_secs: relay.connect_timeout_secs,
    }
}

pub fn filter_policy(filter: &FilterConfig) -> FilterPolicy {
    FilterPolicy {
        rejection_threshold: Some(filter.rejection_threshold),
        min_interval: Duration::from_millis(filter.min_interval_ms),
        first_sample_bypass: filter.first_sample_bypass,
    }
}

pub fn source_options(positioning: &PositioningConfig) -> SourceOptions {
    SourceOptions {
        high_accuracy: positioning.high_accuracy,
        maximum_age: Duration::from_millis(positioning.maximum_age_ms),
        timeout: Duration::from_millis(positioning.timeout_ms),
    }
}

pub fn view_options(tracking: &TrackingConfig) -> ViewOptions {
    ViewOptions {
        acquire_zoom: tracking.acquire_zoom,
        fallback_radius: tracking.fallback_accuracy_radius,
    }
}

/// Pick the session id: explicit flag first, then the one stored in config.
pub fn resolve_session(
    explicit: Option<&str>,
    stored: Option<&str>,
    role: Role,
) -> Result<SessionId, WaypointError> {
    explicit
        .and_then(SessionId::parse)
        .or_else(|| stored.and_then(SessionId::parse))
        .ok_or(WaypointError::MissingSessionId(role))
}
