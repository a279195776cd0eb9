//! Frames received over the realtime channel.

use serde::Deserialize;

use crate::records::PushedNotification;

/// Server-to-client frame, tagged by `event`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "event", rename_all = "camelCase")]
pub enum ServerFrame {
    /// A notification for the connected user.
    Notification {
        /// Pushed payload.
        data: PushedNotification,
    },
    /// Acknowledgement of a `joinRoom` request.
    #[serde(rename_all = "camelCase")]
    Joined {
        /// Room the connection is bound to.
        user_id: String,
    },
    /// A rejected client frame.
    Error {
        /// Machine-readable reason.
        code: String,
        /// Human-readable reason.
        message: String,
    },
}

/// What applying a frame did to the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrameEffect {
    /// A notification was prepended and the unread count bumped.
    NotificationAdded,
    /// The server confirmed the room binding.
    Joined {
        /// Room the connection is bound to.
        user_id: String,
    },
    /// The server rejected a client frame.
    Rejected {
        /// Machine-readable reason.
        code: String,
        /// Human-readable reason.
        message: String,
    },
}
