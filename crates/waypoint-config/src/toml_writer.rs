//! Persist `WaypointConfig` as TOML.
//!
//! `waypoint setup` is the only writer. The file is staged next to the
//! target and renamed over it, so readers see either the old or new config.

use std::path::{Path, PathBuf};

use waypoint_common::ConfigError;

use crate::schema::WaypointConfig;
use crate::toml_loader::default_config_path;

/// Save to `<config_dir>/waypoint/config.toml`.
pub fn save_config(config: &WaypointConfig) -> Result<(), ConfigError> {
    save_config_to_path(config, &default_config_path()?)
}

/// Save to `path`, creating missing parent directories.
pub fn save_config_to_path(config: &WaypointConfig, path: &Path) -> Result<(), ConfigError> {
    let rendered = toml::to_string_pretty(config)
        .map_err(|e| ConfigError::ParseError(format!("cannot encode config: {e}")))?;

    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir).map_err(|e| write_error(dir, e))?;
    }

    let staged = staging_path(path);
    std::fs::write(&staged, &rendered).map_err(|e| write_error(&staged, e))?;

    if let Err(e) = std::fs::rename(&staged, path) {
        // Some platforms will not rename over an existing file.
        tracing::warn!(path = %path.display(), error = %e, "Rename failed, writing config in place");
        let _ = std::fs::remove_file(&staged);
        std::fs::write(path, &rendered).map_err(|e| write_error(path, e))?;
    }

    tracing::debug!(path = %path.display(), "Config saved");
    Ok(())
}

fn staging_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}

fn write_error(path: &Path, e: std::io::Error) -> ConfigError {
    ConfigError::ParseError(format!("cannot write {}: {e}", path.display()))
}
