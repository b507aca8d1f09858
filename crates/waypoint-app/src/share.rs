//! `waypoint share`: replay a position source through the filter to the relay.

use std::path::Path;

use tokio::sync::mpsc;
use waypoint_client::{
    FilterPolicy, InhibitorLock, PositionSource, RelayClient, RelayEvent, ReplaySource, ShareSession,
    ShareUpdate, Verdict,
};
use waypoint_common::{Role, WaypointError};
use waypoint_config::WaypointConfig;

use crate::settings;

pub struct ShareArgs<'a> {
    pub session: Option<&'a str>,
    pub input: Option<&'a Path>,
    pub no_filter: bool,
    pub relay_url: Option<&'a str>,
}

pub async fn run(config: &WaypointConfig, args: ShareArgs<'_>) -> Result<(), WaypointError> {
    let session_id = settings::resolve_session(
        args.session,
        config.session.device_id.as_deref(),
        Role::Sharer,
    )?;
    let policy = if args.no_filter {
        FilterPolicy::passthrough()
    } else {
        settings::filter_policy(&config.filter)
    };

    let input = args.input.filter(|p| p.as_os_str() != "-");
    let mut source = ReplaySource::open(input).await?;

    let (client, mut events) = RelayClient::connect(settings::relay_config(&config.relay, args.relay_url));
    println!("Connecting to relay...");
    tokio::select! {
        connected = wait_connected(&mut events) => connected?,
        _ = tokio::signal::ctrl_c() => {
            client.shutdown().await;
            return Ok(());
        }
    }

    let readings = source.watch(&settings::source_options(&config.positioning))?;
    let mut session = ShareSession::new(session_id.clone(), policy, client.sender());
    if let Some(lock) = InhibitorLock::acquire("Sharing location") {
        session = session.with_wake_lock(Box::new(lock));
    }
    session.start();
    println!("Sharing as {session_id}. Follow with: waypoint track --session {session_id}");

    let monitor = tokio::spawn(log_connection(events));
    let token = session.cancel_token();
    let interrupt = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            token.cancel();
        }
    });

    let result = session.run(readings, print_update).await;

    interrupt.abort();
    drop(session);
    client.shutdown().await;
    monitor.abort();
    println!("Stopped sharing.");

    result.map_err(WaypointError::from)
}

async fn wait_connected(events: &mut mpsc::Receiver<RelayEvent>) -> Result<(), WaypointError> {
    while let Some(event) = events.recv().await {
        if event == RelayEvent::Connected {
            return Ok(());
        }
    }
    Err(WaypointError::Network("relay connection task ended".into()))
}

async fn log_connection(mut events: mpsc::Receiver<RelayEvent>) {
    while let Some(event) = events.recv().await {
        match event {
            RelayEvent::Connected => tracing::info!("Relay reconnected"),
            RelayEvent::Disconnected => tracing::warn!("Relay connection lost, retrying"),
            RelayEvent::Server(_) => {}
        }
    }
}

fn print_update(update: &ShareUpdate) {
    match update {
        ShareUpdate::Reading { status, verdict } => {
            println!("{status}");
            match verdict {
                Verdict::Transmit(sample) => tracing::debug!(timestamp = sample.timestamp, "Sample sent"),
                Verdict::Throttled { wait } => tracing::trace!(?wait, "Throttled"),
                Verdict::Rejected { accuracy } => tracing::debug!(accuracy, "Rejected low-accuracy reading"),
                Verdict::Dropped => tracing::debug!("Relay offline, sample not sent"),
                Verdict::Inactive => {}
            }
        }
        ShareUpdate::SourceLost(error) => eprintln!("Location error: {error}"),
    }
}
