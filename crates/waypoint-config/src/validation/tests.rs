//! Tests for the full validation pipeline.

use super::*;

#[test]
fn default_config_validates() {
    let config = WaypointConfig::default();
    assert!(validate(&config).is_ok());
}

#[test]
fn catches_non_websocket_relay_url() {
    let mut config = WaypointConfig::default();
    config.relay.url = "http://localhost:3000".into();
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("relay.url"));
}

#[test]
fn catches_backoff_ceiling_below_base() {
    let mut config = WaypointConfig::default();
    config.relay.reconnect_delay_secs = 10;
    config.relay.max_reconnect_delay_secs = 5;
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("relay.max_reconnect_delay_secs"));
}

#[test]
fn catches_port_zero() {
    let mut config = WaypointConfig::default();
    config.server.port = 0;
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("server.port"));
}

#[test]
fn catches_negative_rejection_threshold() {
    let mut config = WaypointConfig::default();
    config.filter.rejection_threshold = -1.0;
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("filter.rejection_threshold"));
}

#[test]
fn catches_nan_rejection_threshold() {
    let mut config = WaypointConfig::default();
    config.filter.rejection_threshold = f64::NAN;
    assert!(validate(&config).is_err());
}

#[test]
fn zero_interval_is_allowed() {
    let mut config = WaypointConfig::default();
    config.filter.min_interval_ms = 0;
    assert!(validate(&config).is_ok());
}

#[test]
fn catches_zoom_out_of_range() {
    let mut config = WaypointConfig::default();
    config.tracking.acquire_zoom = 25;
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("tracking.acquire_zoom"));
}

#[test]
fn collects_multiple_errors() {
    let mut config = WaypointConfig::default();
    config.server.port = 0;
    config.positioning.timeout_ms = 10;
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("server.port"));
    assert!(err.contains("positioning.timeout_ms"));
    assert!(err.contains("; "));
}
