//! Full configuration validation.
//!
//! Checks numeric ranges and URL schemes, collecting every problem into a
//! single `ConfigError`.

mod helpers;

#[cfg(test)]
mod tests;

use crate::schema::WaypointConfig;
use waypoint_common::ConfigError;

use helpers::{validate_range, validate_range_f64};

/// Run all validations on a config, collecting all errors.
pub fn validate(config: &WaypointConfig) -> Result<(), ConfigError> {
    let mut errors: Vec<String> = Vec::new();

    validate_relay(&mut errors, config);
    validate_server(&mut errors, config);
    validate_filter(&mut errors, config);
    validate_positioning(&mut errors, config);
    validate_tracking(&mut errors, config);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::ValidationError(errors.join("; ")))
    }
}

fn validate_relay(errors: &mut Vec<String>, config: &WaypointConfig) {
    let url = &config.relay.url;
    if !(url.starts_with("ws://") || url.starts_with("wss://")) {
        errors.push(format!("relay.url = {url} must use ws:// or wss://"));
    }
    validate_range(
        errors,
        "relay.reconnect_delay_secs",
        config.relay.reconnect_delay_secs,
        1,
        300,
    );
    if config.relay.max_reconnect_delay_secs < config.relay.reconnect_delay_secs {
        errors.push(format!(
            "relay.max_reconnect_delay_secs = {} is below relay.reconnect_delay_secs = {}",
            config.relay.max_reconnect_delay_secs, config.relay.reconnect_delay_secs
        ));
    }
    validate_range(
        errors,
        "relay.connect_timeout_secs",
        config.relay.connect_timeout_secs,
        1,
        120,
    );
}

fn validate_server(errors: &mut Vec<String>, config: &WaypointConfig) {
    validate_range(errors, "server.port", config.server.port as u64, 1, 65535);
    validate_range(
        errors,
        "server.outbound_queue",
        config.server.outbound_queue as u64,
        1,
        65536,
    );
}

fn validate_filter(errors: &mut Vec<String>, config: &WaypointConfig) {
    validate_range_f64(
        errors,
        "filter.rejection_threshold",
        config.filter.rejection_threshold,
        1.0,
        10_000.0,
    );
    validate_range(
        errors,
        "filter.min_interval_ms",
        config.filter.min_interval_ms,
        0,
        600_000,
    );
}

fn validate_positioning(errors: &mut Vec<String>, config: &WaypointConfig) {
    validate_range(
        errors,
        "positioning.timeout_ms",
        config.positioning.timeout_ms,
        1000,
        600_000,
    );
}

fn validate_tracking(errors: &mut Vec<String>, config: &WaypointConfig) {
    validate_range(
        errors,
        "tracking.acquire_zoom",
        config.tracking.acquire_zoom as u64,
        1,
        20,
    );
    validate_range_f64(
        errors,
        "tracking.fallback_accuracy_radius",
        config.tracking.fallback_accuracy_radius,
        1.0,
        10_000.0,
    );
}
