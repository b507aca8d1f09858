//! Accept loop and the state shared by every connection.

use std::sync::Arc;

use tokio::net::TcpListener;
use tokio_tungstenite::accept_hdr_async;
use tokio_tungstenite::tungstenite::handshake::server::{ErrorResponse, Request, Response};
use tokio_tungstenite::tungstenite::http::header::USER_AGENT;

use crate::connection::handle_connection;
use crate::rooms::RoomRegistry;
use crate::store::SessionStore;

/// Relay state: the room registry and the optional session store.
#[derive(Clone)]
pub struct Relay {
    rooms: RoomRegistry,
    store: Option<Arc<dyn SessionStore>>,
    outbound_queue: usize,
}

impl Relay {
    pub fn new(outbound_queue: usize) -> Self {
        Self {
            rooms: RoomRegistry::new(),
            store: None,
            outbound_queue: outbound_queue.max(1),
        }
    }

    pub fn with_store(mut self, store: Arc<dyn SessionStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn rooms(&self) -> &RoomRegistry {
        &self.rooms
    }

    pub fn outbound_queue(&self) -> usize {
        self.outbound_queue
    }

    /// Fire-and-forget write to the session store, if one is configured.
    pub fn record_join(&self, session_id: &str, user_agent: Option<&str>) {
        let Some(store) = self.store.clone() else {
            return;
        };
        let session_id = session_id.to_string();
        let user_agent = user_agent.map(str::to_string);
        tokio::spawn(async move {
            if let Err(e) = store.record_join(&session_id, user_agent.as_deref()).await {
                tracing::error!(session = %session_id, error = %e, "DB: save error");
            }
        });
    }
}

/// Accept WebSocket clients forever, one task per connection.
pub async fn serve(listener: TcpListener, relay: Relay) {
    loop {
        match listener.accept().await {
            Ok((stream, addr)) => {
                let relay = relay.clone();
                tokio::spawn(async move {
                    let mut user_agent: Option<String> = None;
                    let capture = |req: &Request, resp: Response| -> Result<Response, ErrorResponse> {
                        user_agent = req
                            .headers()
                            .get(USER_AGENT)
                            .and_then(|v| v.to_str().ok())
                            .map(str::to_string);
                        Ok(resp)
                    };
                    let handshake = accept_hdr_async(stream, capture).await;
                    match handshake {
                        Ok(ws) => handle_connection(ws, addr, user_agent, relay).await,
                        Err(e) => {
                            tracing::warn!(peer = %addr, error = %e, "WS handshake failed");
                        }
                    }
                });
            }
            Err(e) => {
                tracing::warn!(error = %e, "TCP accept error");
            }
        }
    }
}
