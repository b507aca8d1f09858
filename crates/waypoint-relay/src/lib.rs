//! waypoint-relay: WebSocket relay for live location sharing.
//!
//! Connections join rooms named by session id. A location sample sent to a
//! room is forwarded verbatim to every member; the relay only looks at the
//! `room` field and never validates the rest of the payload.
//!
//! There is no authentication. Anyone who knows a session id can join its
//! room, read its samples and inject samples of their own.

pub mod connection;
pub mod rooms;
pub mod server;
pub mod store;

pub use rooms::{ConnectionId, RoomRegistry};
pub use server::{serve, Relay};
pub use store::SessionStore;

#[cfg(feature = "postgres")]
pub use store::PgSessionStore;
