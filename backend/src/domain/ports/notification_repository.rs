//! Port abstraction for notification persistence adapters.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{JobId, Notification, NotificationId, UserId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by notification repository adapters.
    pub enum NotificationRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "notification repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "notification repository query failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NotificationRepository: Send + Sync {
    /// Persist a notification.
    async fn insert(&self, notification: &Notification) -> Result<(), NotificationRepositoryError>;

    /// Fetch a notification by identifier.
    async fn find_by_id(
        &self,
        id: &NotificationId,
    ) -> Result<Option<Notification>, NotificationRepositoryError>;

    /// Set the read flag, returning the updated record when it exists.
    async fn mark_read(
        &self,
        id: &NotificationId,
    ) -> Result<Option<Notification>, NotificationRepositoryError>;

    /// Set the read flag on every unread notification of `user`.
    async fn mark_all_read(&self, user: &UserId) -> Result<u64, NotificationRepositoryError>;

    /// All notifications of `user`, newest first.
    async fn list_for_user(
        &self,
        user: &UserId,
    ) -> Result<Vec<Notification>, NotificationRepositoryError>;

    /// Remove a notification, reporting whether it existed.
    async fn delete(&self, id: &NotificationId) -> Result<bool, NotificationRepositoryError>;

    /// Remove every notification referencing `job`.
    async fn delete_for_job(&self, job: &JobId) -> Result<u64, NotificationRepositoryError>;

    /// Remove every notification addressed to `user`.
    async fn delete_for_user(&self, user: &UserId) -> Result<u64, NotificationRepositoryError>;

    /// Remove notifications created strictly before `cutoff`.
    async fn delete_created_before(
        &self,
        cutoff: DateTime<Utc>,
    ) -> Result<u64, NotificationRepositoryError>;
}
