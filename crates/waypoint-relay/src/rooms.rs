//! Room registry: maps session ids to the connections joined to them.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::{mpsc, RwLock};
use tokio::sync::mpsc::error::TrySendError;

/// Process-unique handle for one WebSocket connection.
pub type ConnectionId = u64;

static CONNECTION_COUNTER: AtomicU64 = AtomicU64::new(1);

pub fn next_connection_id() -> ConnectionId {
    CONNECTION_COUNTER.fetch_add(1, Ordering::Relaxed)
}

type Members = HashMap<ConnectionId, mpsc::Sender<String>>;

/// Thread-safe room registry.
///
/// Each member is represented by the sending half of its outbound queue.
/// Rooms exist only while they have members.
#[derive(Clone, Default)]
pub struct RoomRegistry {
    rooms: Arc<RwLock<HashMap<String, Members>>>,
}

impl RoomRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a connection to a room. Returns false if it was already a member.
    pub async fn join(&self, session_id: &str, conn: ConnectionId, tx: mpsc::Sender<String>) -> bool {
        let mut map = self.rooms.write().await;
        let members = map.entry(session_id.to_string()).or_default();
        members.insert(conn, tx).is_none()
    }

    /// Queue `frame` for every member of the room, sender included.
    ///
    /// Never waits: a member whose queue is full or closed misses the frame.
    /// Returns the number of members the frame was queued for.
    pub async fn broadcast(&self, session_id: &str, frame: &str) -> usize {
        let map = self.rooms.read().await;
        let Some(members) = map.get(session_id) else {
            return 0;
        };

        let mut delivered = 0;
        for (conn, tx) in members {
            match tx.try_send(frame.to_string()) {
                Ok(()) => delivered += 1,
                Err(TrySendError::Full(_)) => {
                    tracing::warn!(session = %session_id, conn, "Outbound queue full, dropping frame");
                }
                Err(TrySendError::Closed(_)) => {
                    tracing::debug!(session = %session_id, conn, "Member channel closed");
                }
            }
        }
        delivered
    }

    /// Remove a connection from a room. Returns true if the room is now gone.
    pub async fn leave(&self, session_id: &str, conn: ConnectionId) -> bool {
        let mut map = self.rooms.write().await;
        if let Some(members) = map.get_mut(session_id) {
            members.remove(&conn);
            if members.is_empty() {
                map.remove(session_id);
                return true;
            }
        }
        false
    }

    #[cfg(test)]
    pub(crate) async fn member_count(&self, session_id: &str) -> usize {
        self.rooms
            .read()
            .await
            .get(session_id)
            .map(|m| m.len())
            .unwrap_or(0)
    }
}
