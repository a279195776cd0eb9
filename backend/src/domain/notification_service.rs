//! Notification reads and read-state mutations, scoped to the owner.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, error};

use super::ports::{
    NotificationCommand, NotificationQuery, NotificationRepository, NotificationRepositoryError,
};
use super::{Caller, Error, Notification, NotificationFeed, NotificationId};

fn map_repository_error(error: NotificationRepositoryError) -> Error {
    error!(%error, "notification repository failure");
    Error::internal(format!("notification repository error: {error}"))
}

/// Implements [`NotificationCommand`] and [`NotificationQuery`].
///
/// Every by-id operation checks that the notification belongs to the caller,
/// admins included.
#[derive(Clone)]
pub struct NotificationService {
    notifications: Arc<dyn NotificationRepository>,
}

impl NotificationService {
    pub fn new(notifications: Arc<dyn NotificationRepository>) -> Self {
        Self { notifications }
    }

    async fn load_owned(
        &self,
        caller: &Caller,
        id: &NotificationId,
    ) -> Result<Notification, Error> {
        let notification = self
            .notifications
            .find_by_id(id)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| Error::not_found("Notification not found"))?;
        if notification.user_id != caller.user_id {
            return Err(Error::forbidden(
                "Not authorized to access this notification",
            ));
        }
        Ok(notification)
    }
}

#[async_trait]
impl NotificationCommand for NotificationService {
    async fn mark_read(
        &self,
        caller: &Caller,
        id: &NotificationId,
    ) -> Result<Notification, Error> {
        let notification = self.load_owned(caller, id).await?;
        if notification.read {
            return Ok(notification);
        }
        self.notifications
            .mark_read(id)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| Error::not_found("Notification not found"))
    }

    async fn mark_all_read(&self, caller: &Caller) -> Result<u64, Error> {
        let flipped = self
            .notifications
            .mark_all_read(&caller.user_id)
            .await
            .map_err(map_repository_error)?;
        debug!(user_id = %caller.user_id, flipped, "notifications marked read");
        Ok(flipped)
    }

    async fn delete(&self, caller: &Caller, id: &NotificationId) -> Result<(), Error> {
        self.load_owned(caller, id).await?;
        self.notifications
            .delete(id)
            .await
            .map_err(map_repository_error)?;
        Ok(())
    }
}

#[async_trait]
impl NotificationQuery for NotificationService {
    async fn feed(&self, caller: &Caller) -> Result<NotificationFeed, Error> {
        let notifications = self
            .notifications
            .list_for_user(&caller.user_id)
            .await
            .map_err(map_repository_error)?;
        Ok(NotificationFeed::new(notifications))
    }
}
