//! Driving port for notification mutations.

use async_trait::async_trait;

use crate::domain::{Caller, Error, Notification, NotificationId};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NotificationCommand: Send + Sync {
    /// Mark one of the caller's notifications as read.
    async fn mark_read(
        &self,
        caller: &Caller,
        id: &NotificationId,
    ) -> Result<Notification, Error>;

    /// Mark every notification of the caller as read. Idempotent.
    async fn mark_all_read(&self, caller: &Caller) -> Result<u64, Error>;

    /// Delete one of the caller's notifications.
    async fn delete(&self, caller: &Caller, id: &NotificationId) -> Result<(), Error>;
}
