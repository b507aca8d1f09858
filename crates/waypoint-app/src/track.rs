//! `waypoint track`: follow a session and draw it in the terminal.

use waypoint_client::{RelayClient, RelayEvent, TerminalRenderer, TrackingView};
use waypoint_common::{now_millis, Role, WaypointError};
use waypoint_config::WaypointConfig;

use crate::settings;

pub async fn run(
    config: &WaypointConfig,
    session: Option<&str>,
    relay_url: Option<&str>,
) -> Result<(), WaypointError> {
    let target = settings::resolve_session(
        session,
        config.session.track_target_id.as_deref(),
        Role::Tracker,
    )?;

    let (client, mut events) = RelayClient::connect(settings::relay_config(&config.relay, relay_url));
    client.join(&target).await;
    println!("Tracking {target}");

    let mut view = TrackingView::new(
        TerminalRenderer::new(std::io::stdout()),
        settings::view_options(&config.tracking),
    );

    loop {
        tokio::select! {
            event = events.recv() => match event {
                Some(RelayEvent::Server(event)) => view.handle(&event, now_millis()),
                Some(RelayEvent::Connected) => tracing::info!(session = %target, "Connected to relay"),
                Some(RelayEvent::Disconnected) => tracing::warn!("Relay connection lost, retrying"),
                None => break,
            },
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    client.shutdown().await;
    Ok(())
}
