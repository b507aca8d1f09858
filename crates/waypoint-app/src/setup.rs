//! `waypoint setup`: session ids stored in the config file.

use waypoint_common::{SessionId, WaypointError};
use waypoint_config::WaypointConfig;

/// What `setup` did to the config.
#[derive(Debug, PartialEq)]
pub struct SetupOutcome {
    pub device_id: SessionId,
    pub generated: bool,
    pub track_target: Option<SessionId>,
}

impl SetupOutcome {
    pub fn changed(&self) -> bool {
        self.generated || self.track_target.is_some()
    }
}

/// Ensure a device id exists and optionally record a tracking target.
pub fn apply(
    config: &mut WaypointConfig,
    regenerate: bool,
    track: Option<&str>,
) -> Result<SetupOutcome, WaypointError> {
    let track_target = match track {
        Some(raw) => Some(
            SessionId::parse(raw)
                .ok_or_else(|| WaypointError::Other("session id to track is empty".into()))?,
        ),
        None => None,
    };

    let existing = config
        .session
        .device_id
        .as_deref()
        .and_then(SessionId::parse)
        .filter(|_| !regenerate);
    let (device_id, generated) = match existing {
        Some(id) => (id, false),
        None => (SessionId::generate(), true),
    };

    if generated {
        config.session.device_id = Some(device_id.as_str().to_string());
    }
    if let Some(target) = &track_target {
        config.session.track_target_id = Some(target.as_str().to_string());
    }

    Ok(SetupOutcome {
        device_id,
        generated,
        track_target,
    })
}

pub fn print(outcome: &SetupOutcome) {
    if outcome.generated {
        println!("New session id: {}", outcome.device_id);
    } else {
        println!("Session id: {}", outcome.device_id);
    }
    println!("Share it with trackers: waypoint track --session {}", outcome.device_id);
    if let Some(target) = &outcome.track_target {
        println!("Tracking target set to {target}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generates_id_when_missing() {
        let mut config = WaypointConfig::default();
        let outcome = apply(&mut config, false, None).unwrap();
        assert!(outcome.generated);
        assert!(outcome.changed());
        assert_eq!(config.session.device_id.as_deref(), Some(outcome.device_id.as_str()));
    }

    #[test]
    fn keeps_existing_id() {
        let mut config = WaypointConfig::default();
        config.session.device_id = Some("3FA9C2D1".into());
        let outcome = apply(&mut config, false, None).unwrap();
        assert_eq!(outcome.device_id.as_str(), "3FA9C2D1");
        assert!(!outcome.changed());
    }

    #[test]
    fn regenerate_replaces_id() {
        let mut config = WaypointConfig::default();
        config.session.device_id = Some("3FA9C2D1".into());
        let outcome = apply(&mut config, true, None).unwrap();
        assert!(outcome.generated);
        assert_ne!(config.session.device_id.as_deref(), Some("3FA9C2D1"));
    }

    #[test]
    fn records_tracking_target() {
        let mut config = WaypointConfig::default();
        config.session.device_id = Some("3FA9C2D1".into());
        let outcome = apply(&mut config, false, Some(" ABC123 ")).unwrap();
        assert!(outcome.changed());
        assert_eq!(config.session.track_target_id.as_deref(), Some("ABC123"));
    }

    #[test]
    fn blank_target_is_rejected_without_changes() {
        let mut config = WaypointConfig::default();
        assert!(apply(&mut config, false, Some("   ")).is_err());
        assert_eq!(config.session.device_id, None);
    }
}
