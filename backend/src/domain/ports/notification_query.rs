//! Driving port for reading a user's notifications.

use async_trait::async_trait;

use crate::domain::{Caller, Error, NotificationFeed};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NotificationQuery: Send + Sync {
    /// The caller's notifications, newest first, with the unread count.
    async fn feed(&self, caller: &Caller) -> Result<NotificationFeed, Error>;
}
