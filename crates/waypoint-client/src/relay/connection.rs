//! Background WebSocket connection loop with auto-reconnect.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use futures_util::{Sink, SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::Message as WsMessage;
use tracing::{debug, error, info, warn};
use waypoint_common::{ClientEvent, ServerEvent};

use super::types::{RelayClientConfig, RelayCommand, RelayEvent};

/// Background task owning the WebSocket.
///
/// Rooms joined through this connection are joined again after every
/// reconnect. Other events issued while offline are dropped.
pub(crate) async fn connection_loop(
    config: RelayClientConfig,
    connected: Arc<AtomicBool>,
    event_tx: mpsc::Sender<RelayEvent>,
    mut command_rx: mpsc::Receiver<RelayCommand>,
) {
    let base_delay = config.reconnect_delay_secs.max(1);
    let max_delay = config.max_reconnect_delay_secs.max(base_delay);
    let mut reconnect_delay = base_delay;
    let mut rooms: Vec<String> = Vec::new();

    loop {
        info!(url = %config.url, "Connecting to relay");

        match tokio::time::timeout(
            Duration::from_secs(config.connect_timeout_secs),
            tokio_tungstenite::connect_async(config.url.as_str()),
        )
        .await
        {
            Ok(Ok((ws_stream, _))) => {
                reconnect_delay = base_delay;
                connected.store(true, Ordering::SeqCst);
                let _ = event_tx.send(RelayEvent::Connected).await;

                let (mut write, mut read) = ws_stream.split();

                let mut alive = true;
                for room in &rooms {
                    if !send_event(&mut write, &ClientEvent::Join(room.clone())).await {
                        alive = false;
                        break;
                    }
                }

                while alive {
                    tokio::select! {
                        cmd = command_rx.recv() => match cmd {
                            Some(RelayCommand::Send(event)) => {
                                remember_join(&mut rooms, &event);
                                if !send_event(&mut write, &event).await {
                                    break;
                                }
                            }
                            Some(RelayCommand::Shutdown) | None => {
                                let _ = write.send(WsMessage::Close(None)).await;
                                connected.store(false, Ordering::SeqCst);
                                info!("Relay connection closed");
                                return;
                            }
                        },

                        frame = read.next() => match frame {
                            Some(Ok(WsMessage::Text(text))) => {
                                match serde_json::from_str::<ServerEvent>(&text) {
                                    Ok(event) => {
                                        if event_tx.send(RelayEvent::Server(event)).await.is_err() {
                                            debug!("Event receiver dropped");
                                        }
                                    }
                                    Err(e) => {
                                        debug!(error = %e, "Unrecognized message from relay");
                                    }
                                }
                            }
                            Some(Ok(WsMessage::Ping(data))) => {
                                let _ = write.send(WsMessage::Pong(data)).await;
                            }
                            Some(Ok(WsMessage::Close(_))) | None => {
                                info!("Relay closed connection");
                                break;
                            }
                            Some(Err(e)) => {
                                warn!(error = %e, "WebSocket error");
                                break;
                            }
                            _ => {}
                        },
                    }
                }

                connected.store(false, Ordering::SeqCst);
                let _ = event_tx.send(RelayEvent::Disconnected).await;
            }
            Ok(Err(e)) => {
                error!(error = %e, "Failed to connect to relay");
            }
            Err(_elapsed) => {
                error!(
                    "Relay connection timed out after {}s",
                    config.connect_timeout_secs
                );
            }
        }

        // Exponential backoff, still listening for commands.
        info!(
            delay = reconnect_delay,
            "Reconnecting in {} seconds", reconnect_delay
        );
        let sleep = tokio::time::sleep(Duration::from_secs(reconnect_delay));
        tokio::pin!(sleep);
        loop {
            tokio::select! {
                _ = &mut sleep => break,
                cmd = command_rx.recv() => match cmd {
                    Some(RelayCommand::Send(event)) => {
                        if !remember_join(&mut rooms, &event) {
                            debug!(?event, "Offline, dropping event");
                        }
                    }
                    Some(RelayCommand::Shutdown) | None => return,
                },
            }
        }
        reconnect_delay = (reconnect_delay * 2).min(max_delay);
    }
}

/// Track joined rooms for rejoin. Returns true if `event` was a join.
fn remember_join(rooms: &mut Vec<String>, event: &ClientEvent) -> bool {
    match event {
        ClientEvent::Join(room) => {
            if !rooms.contains(room) {
                rooms.push(room.clone());
            }
            true
        }
        _ => false,
    }
}

/// Write one event as a text frame. Returns false if the socket is gone.
async fn send_event<S>(write: &mut S, event: &ClientEvent) -> bool
where
    S: Sink<WsMessage> + Unpin,
{
    match event.to_json() {
        Ok(json) => write.send(WsMessage::Text(json.into())).await.is_ok(),
        Err(e) => {
            warn!(error = %e, "Failed to encode event");
            true
        }
    }
}
