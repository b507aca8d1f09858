//! Waypoint configuration system.
//!
//! TOML-based configuration shared by the relay server and the `waypoint`
//! CLI. Every section has defaults, so partial configs work out of the box.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use waypoint_config::load_config;
//!
//! let config = load_config().expect("failed to load config");
//! println!("relay at {}", config.relay.url);
//! ```

pub mod schema;
pub mod toml_loader;
pub mod toml_writer;
pub mod validation;

pub use schema::WaypointConfig;
pub use toml_writer::{save_config, save_config_to_path};

use std::path::Path;

use waypoint_common::ConfigError;

/// Load config from the platform default path, creating it if missing.
pub fn load_config() -> Result<WaypointConfig, ConfigError> {
    toml_loader::load_default()
}

/// Load config from an explicit path, or the platform default when `None`.
pub fn load_config_from(path: Option<&Path>) -> Result<WaypointConfig, ConfigError> {
    match path {
        Some(path) => toml_loader::load_from_path(path),
        None => load_config(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_renders_every_section() {
        let mut config = WaypointConfig::default();
        config.session.device_id = Some("3FA9C2D1".into());
        let rendered = toml::to_string_pretty(&config).unwrap();
        for section in [
            "[relay]",
            "[server]",
            "[filter]",
            "[positioning]",
            "[tracking]",
            "[session]",
            "[logging]",
        ] {
            assert!(rendered.contains(section), "missing {section}");
        }
    }

    #[test]
    fn load_config_from_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[server]\nport = 8080\n").unwrap();

        let config = load_config_from(Some(&path)).unwrap();
        assert_eq!(config.server.port, 8080);
    }

    #[test]
    fn load_config_from_missing_explicit_path_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");
        assert!(matches!(
            load_config_from(Some(&path)),
            Err(ConfigError::FileNotFound(_))
        ));
    }
}
