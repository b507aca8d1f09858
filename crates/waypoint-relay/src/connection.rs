//! Per-connection handler: decode client events, join rooms, fan out.

use std::collections::HashSet;
use std::net::SocketAddr;

use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::Message;
use waypoint_common::protocol::events;
use waypoint_common::{ClientEvent, ServerEvent};

use crate::rooms::{next_connection_id, ConnectionId};
use crate::server::Relay;

/// Handle a single WebSocket connection until it closes.
pub async fn handle_connection(
    ws: tokio_tungstenite::WebSocketStream<tokio::net::TcpStream>,
    addr: SocketAddr,
    user_agent: Option<String>,
    relay: Relay,
) {
    let conn = next_connection_id();
    let (mut sink, mut stream) = ws.split();
    let (tx, mut rx) = mpsc::channel::<String>(relay.outbound_queue());
    let mut joined: HashSet<String> = HashSet::new();

    tracing::info!(peer = %addr, conn, "A user connected");

    loop {
        tokio::select! {
            // Frames queued by broadcasts → this client's WebSocket
            Some(frame) = rx.recv() => {
                if sink.send(Message::Text(frame.into())).await.is_err() {
                    break;
                }
            }

            frame = stream.next() => {
                match frame {
                    Some(Ok(Message::Text(text))) => {
                        match serde_json::from_str::<ClientEvent>(&text) {
                            Ok(event) => {
                                handle_event(event, conn, &tx, &mut joined, user_agent.as_deref(), &relay).await;
                            }
                            Err(e) => {
                                tracing::debug!(peer = %addr, error = %e, "Ignoring unparseable frame");
                            }
                        }
                    }
                    Some(Ok(Message::Ping(data))) => {
                        let _ = sink.send(Message::Pong(data)).await;
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Err(e)) => {
                        tracing::debug!(peer = %addr, error = %e, "WS error");
                        break;
                    }
                    _ => {}
                }
            }
        }
    }

    for session_id in &joined {
        relay.rooms().leave(session_id, conn).await;
    }

    tracing::info!(peer = %addr, conn, rooms = joined.len(), "User disconnected");
}

async fn handle_event(
    event: ClientEvent,
    conn: ConnectionId,
    tx: &mpsc::Sender<String>,
    joined: &mut HashSet<String>,
    user_agent: Option<&str>,
    relay: &Relay,
) {
    match event {
        ClientEvent::Join(session_id) => {
            if joined.insert(session_id.clone()) {
                relay.rooms().join(&session_id, conn, tx.clone()).await;
            }
            tracing::info!(conn, session = %session_id, event = events::JOIN, "User joined room");
            relay.record_join(&session_id, user_agent);
        }
        ClientEvent::UpdateLocation(payload) => {
            let Some(session_id) = ClientEvent::target_room(&payload).map(str::to_string) else {
                tracing::debug!(conn, event = events::UPDATE_LOCATION, "Dropping sample without room");
                return;
            };
            let delivered = broadcast(relay, &session_id, ServerEvent::ReceiveLocation(payload)).await;
            tracing::trace!(conn, session = %session_id, delivered, "Location relayed");
        }
        ClientEvent::StopSharing(session_id) => {
            let delivered = broadcast(relay, &session_id, ServerEvent::DeviceStopped).await;
            tracing::info!(
                conn,
                session = %session_id,
                delivered,
                event = events::STOP_SHARING,
                "Device stopped sharing"
            );
        }
    }
}

async fn broadcast(relay: &Relay, session_id: &str, event: ServerEvent) -> usize {
    match event.to_json() {
        Ok(frame) => relay.rooms().broadcast(session_id, &frame).await,
        Err(e) => {
            tracing::warn!(session = %session_id, error = %e, "Failed to encode frame");
            0
        }
    }
}
