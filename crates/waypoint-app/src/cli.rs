use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Waypoint: share your live location, or follow someone else's.
#[derive(Parser, Debug)]
#[command(name = "waypoint", version, about)]
pub struct Args {
    /// Config file path override.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log level override (trace, debug, info, warn, error).
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Relay URL override, e.g. ws://relay.example:3000.
    #[arg(long, global = true, env = "WAYPOINT_RELAY_URL")]
    pub relay_url: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create this device's session id, or set the id to track.
    Setup {
        /// Replace the existing session id with a new one.
        #[arg(long)]
        regenerate: bool,

        /// Remember ID as the device `waypoint track` follows.
        #[arg(long, value_name = "ID")]
        track: Option<String>,
    },

    /// Broadcast readings from a position source.
    Share {
        /// Session id to share under. Defaults to `session.device_id`.
        #[arg(long)]
        session: Option<String>,

        /// JSON-lines readings to replay; stdin when omitted or `-`.
        #[arg(long, value_name = "PATH")]
        input: Option<PathBuf>,

        /// Send every reading, skipping the accuracy gate and throttle.
        #[arg(long)]
        no_filter: bool,
    },

    /// Follow a sharing device.
    Track {
        /// Session id to follow. Defaults to `session.track_target_id`.
        #[arg(long)]
        session: Option<String>,
    },
}

pub fn parse() -> Args {
    Args::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_share_with_global_flags_after_subcommand() {
        let args = Args::try_parse_from([
            "waypoint",
            "share",
            "--input",
            "walk.jsonl",
            "--relay-url",
            "ws://10.0.0.2:3000",
        ])
        .unwrap();
        assert_eq!(args.relay_url.as_deref(), Some("ws://10.0.0.2:3000"));
        match args.command {
            Command::Share {
                session,
                input,
                no_filter,
            } => {
                assert_eq!(session, None);
                assert_eq!(input, Some(PathBuf::from("walk.jsonl")));
                assert!(!no_filter);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn parses_setup_track() {
        let args = Args::try_parse_from(["waypoint", "setup", "--track", "ABC123"]).unwrap();
        assert!(matches!(
            args.command,
            Command::Setup { regenerate: false, track: Some(ref id) } if id == "ABC123"
        ));
    }

    #[test]
    fn subcommand_is_required() {
        assert!(Args::try_parse_from(["waypoint"]).is_err());
    }
}
