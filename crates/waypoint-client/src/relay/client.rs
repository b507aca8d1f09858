//! Public handle for interacting with the relay connection.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use waypoint_common::{ClientEvent, SessionId};

use super::connection::connection_loop;
use super::types::{RelayClientConfig, RelayCommand, RelayEvent};
use crate::share::Outbound;

/// Handle for the relay connection.
///
/// All methods only queue commands for the background connection task.
pub struct RelayClient {
    command_tx: mpsc::Sender<RelayCommand>,
    connected: Arc<AtomicBool>,
    task: JoinHandle<()>,
}

impl RelayClient {
    /// Start the background connection. Returns `(client, event_receiver)`.
    pub fn connect(config: RelayClientConfig) -> (Self, mpsc::Receiver<RelayEvent>) {
        let (event_tx, event_rx) = mpsc::channel(256);
        let (command_tx, command_rx) = mpsc::channel(64);
        let connected = Arc::new(AtomicBool::new(false));

        let task = tokio::spawn(connection_loop(
            config,
            Arc::clone(&connected),
            event_tx,
            command_rx,
        ));

        let client = Self {
            command_tx,
            connected,
            task,
        };
        (client, event_rx)
    }

    /// Lightweight handle that can emit events on this connection.
    pub fn sender(&self) -> RelaySender {
        RelaySender {
            command_tx: self.command_tx.clone(),
            connected: Arc::clone(&self.connected),
        }
    }

    /// Join a room. The join is repeated after every reconnect.
    pub async fn join(&self, session_id: &SessionId) {
        self.send(ClientEvent::join(session_id)).await;
    }

    pub async fn send(&self, event: ClientEvent) {
        let _ = self.command_tx.send(RelayCommand::Send(event)).await;
    }

    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    /// Flush queued events, close the socket, and wait for the task to end.
    pub async fn shutdown(self) {
        let _ = self.command_tx.send(RelayCommand::Shutdown).await;
        if tokio::time::timeout(Duration::from_secs(5), self.task)
            .await
            .is_err()
        {
            tracing::warn!("Relay connection did not shut down within 5s");
        }
    }
}

/// Cloneable, non-blocking event sink for one relay connection.
///
/// Location updates are refused while the socket is down; joins and stops
/// are always queued.
#[derive(Clone)]
pub struct RelaySender {
    command_tx: mpsc::Sender<RelayCommand>,
    connected: Arc<AtomicBool>,
}

impl Outbound for RelaySender {
    fn emit(&self, event: ClientEvent) -> bool {
        if matches!(event, ClientEvent::UpdateLocation(_)) && !self.connected.load(Ordering::SeqCst) {
            tracing::debug!("Relay offline, dropping location update");
            return false;
        }
        match self.command_tx.try_send(RelayCommand::Send(event)) {
            Ok(()) => true,
            Err(TrySendError::Full(_)) => {
                tracing::warn!("Relay command queue full, dropping event");
                false
            }
            Err(TrySendError::Closed(_)) => {
                tracing::debug!("Relay connection gone, dropping event");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_util::StreamExt;
    use tokio::net::TcpListener;
    use tokio_tungstenite::tungstenite::Message;
    use waypoint_common::ServerEvent;

    async fn next_text<S>(ws: &mut S) -> String
    where
        S: futures_util::Stream<Item = Result<Message, tokio_tungstenite::tungstenite::Error>>
            + Unpin,
    {
        loop {
            let frame = tokio::time::timeout(Duration::from_secs(5), ws.next())
                .await
                .expect("timed out")
                .unwrap()
                .unwrap();
            if let Message::Text(text) = frame {
                return text.as_str().to_string();
            }
        }
    }

    fn config_for(listener: &TcpListener) -> RelayClientConfig {
        RelayClientConfig {
            url: format!("ws://{}", listener.local_addr().unwrap()),
            reconnect_delay_secs: 1,
            max_reconnect_delay_secs: 1,
            connect_timeout_secs: 5,
        }
    }

    #[tokio::test]
    async fn rejoins_rooms_after_reconnect() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let (client, mut events) = RelayClient::connect(config_for(&listener));
        client.join(&SessionId::parse("ABC123").unwrap()).await;

        let (stream, _) = listener.accept().await.unwrap();
        let mut ws = tokio_tungstenite::accept_async(stream).await.unwrap();
        assert_eq!(next_text(&mut ws).await, r#"{"event":"join","data":"ABC123"}"#);
        assert_eq!(events.recv().await, Some(RelayEvent::Connected));
        drop(ws);

        assert_eq!(events.recv().await, Some(RelayEvent::Disconnected));

        let (stream, _) = listener.accept().await.unwrap();
        let mut ws = tokio_tungstenite::accept_async(stream).await.unwrap();
        assert_eq!(next_text(&mut ws).await, r#"{"event":"join","data":"ABC123"}"#);

        client.shutdown().await;
    }

    #[tokio::test]
    async fn forwards_server_events() {
        use futures_util::SinkExt;

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let (client, mut events) = RelayClient::connect(config_for(&listener));

        let (stream, _) = listener.accept().await.unwrap();
        let mut ws = tokio_tungstenite::accept_async(stream).await.unwrap();
        assert_eq!(events.recv().await, Some(RelayEvent::Connected));
        assert!(client.is_connected());

        ws.send(Message::Text(r#"{"event":"device_stopped"}"#.into()))
            .await
            .unwrap();
        assert_eq!(
            events.recv().await,
            Some(RelayEvent::Server(ServerEvent::DeviceStopped))
        );

        client.shutdown().await;
    }

    #[tokio::test]
    async fn offline_sender_refuses_location_updates() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let config = config_for(&listener);
        drop(listener);

        let (client, _events) = RelayClient::connect(config);
        let sender = client.sender();
        assert!(!client.is_connected());
        assert!(!sender.emit(ClientEvent::UpdateLocation(
            serde_json::json!({"room": "ABC123", "latitude": 1.0})
        )));
        assert!(sender.emit(ClientEvent::StopSharing("ABC123".into())));

        client.shutdown().await;
    }

    #[tokio::test]
    async fn sender_events_follow_join_in_order() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let (client, _events) = RelayClient::connect(config_for(&listener));
        client.join(&SessionId::parse("ABC123").unwrap()).await;
        assert!(client
            .sender()
            .emit(ClientEvent::StopSharing("ABC123".into())));

        let (stream, _) = listener.accept().await.unwrap();
        let mut ws = tokio_tungstenite::accept_async(stream).await.unwrap();
        assert_eq!(next_text(&mut ws).await, r#"{"event":"join","data":"ABC123"}"#);
        assert_eq!(
            next_text(&mut ws).await,
            r#"{"event":"stop_sharing","data":"ABC123"}"#
        );

        client.shutdown().await;
    }
}
