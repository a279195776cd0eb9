//! Per-user rooms for pushing notifications to live WebSocket connections.
//!
//! Each connection owns an unbounded sender registered under its user id.
//! Delivery is best effort: a user with no connections drops the push, and
//! senders whose receiver has gone away are pruned on the next push.

mod frames;

pub use frames::ServerFrame;

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use dashmap::DashMap;
use tokio::sync::mpsc;
use tracing::debug;

use crate::domain::ports::{NotificationPublishError, NotificationPublisher};
use crate::domain::{NotificationPayload, UserId};

/// Identifies one connection within a room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(u64);

struct Member {
    id: ConnectionId,
    tx: mpsc::UnboundedSender<String>,
}

/// Concurrent map from user id to that user's live connections.
#[derive(Default)]
pub struct RoomRegistry {
    rooms: DashMap<UserId, Vec<Member>>,
    next_id: AtomicU64,
}

impl RoomRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a connection to `user`'s room.
    ///
    /// The connection stays registered until the returned membership drops.
    pub fn join(
        self: &Arc<Self>,
        user: UserId,
    ) -> (RoomMembership, mpsc::UnboundedReceiver<String>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let id = ConnectionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.rooms.entry(user).or_default().push(Member { id, tx });
        debug!(user_id = %user, connection = id.0, "connection joined room");
        let membership = RoomMembership {
            registry: Arc::clone(self),
            user,
            id,
        };
        (membership, rx)
    }

    /// Number of live connections in `user`'s room.
    pub fn connections(&self, user: &UserId) -> usize {
        self.rooms.get(user).map_or(0, |members| members.len())
    }

    /// Send a raw text frame to every connection of `user`.
    pub fn push(&self, user: &UserId, frame: &str) -> usize {
        let Some(mut members) = self.rooms.get_mut(user) else {
            return 0;
        };
        members.retain(|member| member.tx.send(frame.to_owned()).is_ok());
        let delivered = members.len();
        let empty = members.is_empty();
        drop(members);
        if empty {
            self.rooms.remove_if(user, |_, members| members.is_empty());
        }
        delivered
    }

    fn leave(&self, user: &UserId, id: ConnectionId) {
        if let Some(mut members) = self.rooms.get_mut(user) {
            members.retain(|member| member.id != id);
        }
        self.rooms.remove_if(user, |_, members| members.is_empty());
        debug!(user_id = %user, connection = id.0, "connection left room");
    }
}

#[async_trait]
impl NotificationPublisher for RoomRegistry {
    async fn publish(
        &self,
        user: &UserId,
        payload: &NotificationPayload,
    ) -> Result<usize, NotificationPublishError> {
        let frame = ServerFrame::Notification {
            data: payload.clone(),
        }
        .encode()
        .map_err(|error| NotificationPublishError::encoding(error.to_string()))?;
        Ok(self.push(user, &frame))
    }
}

/// Registration handle; leaving the room happens on drop.
pub struct RoomMembership {
    registry: Arc<RoomRegistry>,
    user: UserId,
    id: ConnectionId,
}

impl RoomMembership {
    /// The identity the connection was bound to at upgrade.
    pub fn user(&self) -> UserId {
        self.user
    }
}

impl Drop for RoomMembership {
    fn drop(&mut self) {
        self.registry.leave(&self.user, self.id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::NotificationKind;
    use rstest::rstest;

    fn payload() -> NotificationPayload {
        NotificationPayload {
            kind: NotificationKind::NewJob,
            title: "New Job Application".to_owned(),
            message: "added".to_owned(),
        }
    }

    #[rstest]
    #[tokio::test]
    async fn publish_reaches_every_connection_of_the_user() {
        let registry = Arc::new(RoomRegistry::new());
        let user = UserId::random();
        let (_first, mut first_rx) = registry.join(user);
        let (_second, mut second_rx) = registry.join(user);
        let (_other, mut other_rx) = registry.join(UserId::random());

        let delivered = registry.publish(&user, &payload()).await.expect("publish");
        assert_eq!(delivered, 2);
        let frame = first_rx.recv().await.expect("first frame");
        assert!(frame.contains("\"event\":\"notification\""));
        assert_eq!(second_rx.recv().await.as_deref(), Some(frame.as_str()));
        assert!(other_rx.try_recv().is_err());
    }

    #[rstest]
    #[tokio::test]
    async fn empty_room_drops_the_push() {
        let registry = Arc::new(RoomRegistry::new());
        let delivered = registry
            .publish(&UserId::random(), &payload())
            .await
            .expect("publish");
        assert_eq!(delivered, 0);
    }

    #[rstest]
    fn dropping_membership_leaves_the_room() {
        let registry = Arc::new(RoomRegistry::new());
        let user = UserId::random();
        let (membership, _rx) = registry.join(user);
        let (_kept, _kept_rx) = registry.join(user);
        assert_eq!(registry.connections(&user), 2);
        drop(membership);
        assert_eq!(registry.connections(&user), 1);
    }

    #[rstest]
    fn closed_receivers_are_pruned_on_push() {
        let registry = Arc::new(RoomRegistry::new());
        let user = UserId::random();
        let (_membership, rx) = registry.join(user);
        drop(rx);
        assert_eq!(registry.push(&user, "{}"), 0);
        assert_eq!(registry.connections(&user), 0);
    }
}
