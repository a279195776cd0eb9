//! Port for pushing notifications to connected clients.

use async_trait::async_trait;

use crate::domain::{NotificationPayload, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised while pushing a notification.
    pub enum NotificationPublishError {
        /// The payload could not be encoded for the wire.
        Encoding { message: String } => "notification encoding failed: {message}",
    }
}

/// Best-effort delivery to every live connection of a user.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NotificationPublisher: Send + Sync {
    /// Push `payload` to `user`'s room, returning the number of connections
    /// reached. A user with no live connections is not an error.
    async fn publish(
        &self,
        user: &UserId,
        payload: &NotificationPayload,
    ) -> Result<usize, NotificationPublishError>;
}

/// Publisher that drops every payload.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOpNotificationPublisher;

#[async_trait]
impl NotificationPublisher for NoOpNotificationPublisher {
    async fn publish(
        &self,
        _user: &UserId,
        _payload: &NotificationPayload,
    ) -> Result<usize, NotificationPublishError> {
        Ok(0)
    }
}
