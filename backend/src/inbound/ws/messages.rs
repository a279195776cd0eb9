//! Frames clients send over the realtime channel.
//!
//! Server frames live with the room registry in
//! [`crate::outbound::realtime::ServerFrame`].

use serde::Deserialize;

/// Client-to-server frame, tagged by `event`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "event", rename_all = "camelCase")]
pub enum ClientFrame {
    /// Ask to join a user's room. Only the authenticated user's own room is
    /// accepted.
    #[serde(rename_all = "camelCase")]
    JoinRoom { user_id: String },
}
