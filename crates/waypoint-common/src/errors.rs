use std::path::PathBuf;

use crate::id::Role;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("config parse error: {0}")]
    ParseError(String),

    #[error("config validation error: {0}")]
    ValidationError(String),
}

/// Why the positioning source stopped producing readings.
///
/// The kinds only differ in how they are reported to the user; every one of
/// them ends sample production for the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum PositionError {
    #[error("permission denied, enable location access")]
    PermissionDenied,

    #[error("signal unavailable")]
    Unavailable,

    #[error("positioning timeout, move outdoors for a better signal")]
    Timeout,
}

#[derive(Debug, thiserror::Error)]
pub enum WaypointError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Position(#[from] PositionError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("network error: {0}")]
    Network(String),

    #[error("protocol error: {0}")]
    Protocol(#[from] serde_json::Error),

    #[error("persistence error: {0}")]
    Persistence(String),

    #[error("no session id configured for {0}, run `waypoint setup` first")]
    MissingSessionId(Role),

    #[error("{0}")]
    Other(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_display() {
        let err = ConfigError::FileNotFound(PathBuf::from("/tmp/missing.toml"));
        assert_eq!(err.to_string(), "config file not found: /tmp/missing.toml");

        let err = ConfigError::ParseError("unexpected token".into());
        assert_eq!(err.to_string(), "config parse error: unexpected token");

        let err = ConfigError::ValidationError("filter.min_interval_ms out of range".into());
        assert_eq!(
            err.to_string(),
            "config validation error: filter.min_interval_ms out of range"
        );
    }

    #[test]
    fn position_error_messages_differ_per_kind() {
        let denied = PositionError::PermissionDenied.to_string();
        let unavailable = PositionError::Unavailable.to_string();
        let timeout = PositionError::Timeout.to_string();
        assert!(denied.contains("permission"));
        assert!(unavailable.contains("unavailable"));
        assert!(timeout.contains("timeout"));
    }

    #[test]
    fn waypoint_error_from_config() {
        let config_err = ConfigError::ParseError("bad toml".into());
        let err: WaypointError = config_err.into();
        assert!(matches!(err, WaypointError::Config(_)));
        assert!(err.to_string().contains("bad toml"));
    }

    #[test]
    fn waypoint_error_from_position() {
        let err: WaypointError = PositionError::Timeout.into();
        assert!(matches!(err, WaypointError::Position(PositionError::Timeout)));
    }

    #[test]
    fn waypoint_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file missing");
        let err: WaypointError = io_err.into();
        assert!(matches!(err, WaypointError::Io(_)));
        assert!(err.to_string().contains("file missing"));
    }

    #[test]
    fn missing_session_id_points_to_setup() {
        let err = WaypointError::MissingSessionId(Role::Tracker);
        assert_eq!(
            err.to_string(),
            "no session id configured for tracker, run `waypoint setup` first"
        );
    }

    #[test]
    fn waypoint_error_other_variants() {
        let err = WaypointError::Network("connection refused".into());
        assert_eq!(err.to_string(), "network error: connection refused");

        let err = WaypointError::Persistence("pool timed out".into());
        assert_eq!(err.to_string(), "persistence error: pool timed out");

        let err = WaypointError::Other("something went wrong".into());
        assert_eq!(err.to_string(), "something went wrong");
    }
}
