mod cli;
mod settings;
mod setup;
mod share;
mod track;

use std::path::Path;

use tracing_subscriber::EnvFilter;
use waypoint_common::{ConfigError, WaypointError};
use waypoint_config::WaypointConfig;

use cli::Command;

#[tokio::main]
async fn main() {
    let args = cli::parse();

    let config = load_config(args.config.as_deref());

    let log_directive = match (&args.log_level, &config) {
        (Some(level), _) => format!("waypoint={level}"),
        (None, Ok(config)) => config.logging.directive("waypoint"),
        (None, Err(_)) => "waypoint=info".to_string(),
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_directive)),
        )
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!("Waypoint v{} starting...", env!("CARGO_PKG_VERSION"));

    let mut config = match config {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load config: {e}");
            std::process::exit(1);
        }
    };

    let result = match &args.command {
        Command::Setup { regenerate, track } => {
            run_setup(&mut config, args.config.as_deref(), *regenerate, track.as_deref())
        }
        Command::Share {
            session,
            input,
            no_filter,
        } => {
            share::run(
                &config,
                share::ShareArgs {
                    session: session.as_deref(),
                    input: input.as_deref(),
                    no_filter: *no_filter,
                    relay_url: args.relay_url.as_deref(),
                },
            )
            .await
        }
        Command::Track { session } => {
            track::run(&config, session.as_deref(), args.relay_url.as_deref()).await
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        if matches!(e, WaypointError::MissingSessionId(_)) {
            eprintln!("You can also pass --session <ID>.");
        }
        std::process::exit(1);
    }
}

/// Explicit paths that do not exist yet start from defaults so `setup`
/// can create them.
fn load_config(path: Option<&Path>) -> Result<WaypointConfig, ConfigError> {
    match waypoint_config::load_config_from(path) {
        Err(ConfigError::FileNotFound(missing)) if path.is_some() => {
            tracing::debug!(path = %missing.display(), "Config file missing, using defaults");
            Ok(WaypointConfig::default())
        }
        other => other,
    }
}

fn run_setup(
    config: &mut WaypointConfig,
    path: Option<&Path>,
    regenerate: bool,
    track: Option<&str>,
) -> Result<(), WaypointError> {
    let outcome = setup::apply(config, regenerate, track)?;
    if outcome.changed() {
        match path {
            Some(path) => waypoint_config::save_config_to_path(config, path)?,
            None => waypoint_config::save_config(config)?,
        }
    }
    setup::print(&outcome);
    Ok(())
}
