use std::path::PathBuf;
#[cfg(feature = "postgres")]
use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;
use waypoint_config::WaypointConfig;
use waypoint_relay::{serve, Relay};

#[derive(Parser)]
#[command(name = "waypoint-relay", version, about = "WebSocket relay for live location sharing")]
struct Args {
    /// Port to listen on. Overrides `server.port`.
    #[arg(short, long)]
    port: Option<u16>,

    /// Address to bind. Overrides `server.bind`.
    #[arg(long)]
    bind: Option<String>,

    /// Postgres URL for the session log. Overrides `server.database_url`.
    #[arg(long, env = "DATABASE_URL")]
    database_url: Option<String>,

    /// Config file path. Built-in defaults are used when omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log level override (trace, debug, info, warn, error).
    #[arg(long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    let config = match args.config.as_deref() {
        Some(path) => waypoint_config::load_config_from(Some(path)),
        None => Ok(WaypointConfig::default()),
    };

    let directive = match (&args.log_level, &config) {
        (Some(level), _) => format!("waypoint_relay={level}"),
        (None, Ok(config)) => config.logging.directive("waypoint_relay"),
        (None, Err(_)) => "waypoint_relay=info".to_string(),
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directive)),
        )
        .init();

    let config = match config {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Failed to load config: {e}");
            std::process::exit(1);
        }
    };

    let port = args.port.map(u32::from).unwrap_or(config.server.port);
    let bind = args.bind.unwrap_or(config.server.bind);
    let database_url = args.database_url.or(config.server.database_url);

    let relay = Relay::new(config.server.outbound_queue as usize);
    let relay = attach_store(relay, database_url.as_deref());

    let addr = format!("{bind}:{port}");
    let listener = match TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!("Failed to bind {addr}: {e}");
            std::process::exit(1);
        }
    };

    tracing::info!("waypoint-relay listening on ws://{}", addr);
    serve(listener, relay).await;
}

#[cfg(feature = "postgres")]
fn attach_store(relay: Relay, database_url: Option<&str>) -> Relay {
    let Some(url) = database_url else {
        tracing::info!("No database configured, session log disabled");
        return relay;
    };
    match waypoint_relay::PgSessionStore::connect(url) {
        Ok(store) => relay.with_store(Arc::new(store)),
        Err(e) => {
            tracing::error!(error = %e, "DB: connection failed, session log disabled");
            relay
        }
    }
}

#[cfg(not(feature = "postgres"))]
fn attach_store(relay: Relay, database_url: Option<&str>) -> Relay {
    if database_url.is_some() {
        tracing::warn!("Built without the `postgres` feature, ignoring database URL");
    }
    relay
}
