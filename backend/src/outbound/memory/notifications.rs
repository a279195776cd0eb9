use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::ports::{NotificationRepository, NotificationRepositoryError};
use crate::domain::{JobId, Notification, NotificationId, UserId};

use super::lock;

/// Notification store keyed by id.
#[derive(Debug, Default)]
pub struct MemoryNotificationRepository {
    notifications: Mutex<HashMap<NotificationId, Notification>>,
}

impl MemoryNotificationRepository {
    fn remove_where<F>(&self, doomed: F) -> Result<u64, NotificationRepositoryError>
    where
        F: Fn(&Notification) -> bool,
    {
        let mut guard = lock(
            &self.notifications,
            "notification",
            NotificationRepositoryError::query,
        )?;
        let before = guard.len();
        guard.retain(|_, notification| !doomed(notification));
        Ok((before - guard.len()) as u64)
    }
}

#[async_trait]
impl NotificationRepository for MemoryNotificationRepository {
    async fn insert(&self, notification: &Notification) -> Result<(), NotificationRepositoryError> {
        let mut guard = lock(
            &self.notifications,
            "notification",
            NotificationRepositoryError::query,
        )?;
        guard.insert(notification.id, notification.clone());
        Ok(())
    }

    async fn find_by_id(
        &self,
        id: &NotificationId,
    ) -> Result<Option<Notification>, NotificationRepositoryError> {
        let guard = lock(
            &self.notifications,
            "notification",
            NotificationRepositoryError::query,
        )?;
        Ok(guard.get(id).cloned())
    }

    async fn mark_read(
        &self,
        id: &NotificationId,
    ) -> Result<Option<Notification>, NotificationRepositoryError> {
        let mut guard = lock(
            &self.notifications,
            "notification",
            NotificationRepositoryError::query,
        )?;
        Ok(guard.get_mut(id).map(|notification| {
            notification.read = true;
            notification.clone()
        }))
    }

    async fn mark_all_read(&self, user: &UserId) -> Result<u64, NotificationRepositoryError> {
        let mut guard = lock(
            &self.notifications,
            "notification",
            NotificationRepositoryError::query,
        )?;
        let mut flipped = 0;
        for notification in guard
            .values_mut()
            .filter(|notification| notification.user_id == *user && !notification.read)
        {
            notification.read = true;
            flipped += 1;
        }
        Ok(flipped)
    }

    async fn list_for_user(
        &self,
        user: &UserId,
    ) -> Result<Vec<Notification>, NotificationRepositoryError> {
        let guard = lock(
            &self.notifications,
            "notification",
            NotificationRepositoryError::query,
        )?;
        let mut owned: Vec<_> = guard
            .values()
            .filter(|notification| notification.user_id == *user)
            .cloned()
            .collect();
        owned.sort_by(|left, right| right.created_at.cmp(&left.created_at));
        Ok(owned)
    }

    async fn delete(&self, id: &NotificationId) -> Result<bool, NotificationRepositoryError> {
        let mut guard = lock(
            &self.notifications,
            "notification",
            NotificationRepositoryError::query,
        )?;
        Ok(guard.remove(id).is_some())
    }

    async fn delete_for_job(&self, job: &JobId) -> Result<u64, NotificationRepositoryError> {
        self.remove_where(|notification| notification.job_id == Some(*job))
    }

    async fn delete_for_user(&self, user: &UserId) -> Result<u64, NotificationRepositoryError> {
        self.remove_where(|notification| notification.user_id == *user)
    }

    async fn delete_created_before(
        &self,
        cutoff: DateTime<Utc>,
    ) -> Result<u64, NotificationRepositoryError> {
        self.remove_where(|notification| notification.created_at < cutoff)
    }
}
