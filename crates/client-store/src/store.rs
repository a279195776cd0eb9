//! Single-owner cache of jobs and notifications.

use crate::error::StoreError;
use crate::frames::{FrameEffect, ServerFrame};
use crate::records::{JobRecord, NotificationRecord, PushedNotification};

/// Cached collections in server order, with lookups by id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientStore {
    jobs: Vec<JobRecord>,
    notifications: Vec<NotificationRecord>,
    unread_count: usize,
}

impl ClientStore {
    /// Cached jobs in the order the server returned them.
    #[must_use]
    pub fn jobs(&self) -> &[JobRecord] {
        &self.jobs
    }

    /// Look up a cached job.
    #[must_use]
    pub fn job(&self, id: &str) -> Option<&JobRecord> {
        self.jobs.iter().find(|job| job.id == id)
    }

    /// Cached notifications, newest first.
    #[must_use]
    pub fn notifications(&self) -> &[NotificationRecord] {
        &self.notifications
    }

    /// Number of unread notifications.
    #[must_use]
    pub const fn unread_count(&self) -> usize {
        self.unread_count
    }

    /// Replace the job collection with a fresh fetch.
    pub fn replace_jobs(&mut self, jobs: Vec<JobRecord>) {
        self.jobs = jobs;
    }

    /// Replace the notification feed with a fresh fetch.
    ///
    /// The unread count is taken from the server rather than recounted.
    pub fn replace_notifications(
        &mut self,
        notifications: Vec<NotificationRecord>,
        unread_count: usize,
    ) {
        self.notifications = notifications;
        self.unread_count = unread_count;
    }

    /// Insert a created job at the front or replace an updated one in place.
    pub fn upsert_job(&mut self, job: JobRecord) {
        match self.jobs.iter_mut().find(|cached| cached.id == job.id) {
            Some(cached) => *cached = job,
            None => self.jobs.insert(0, job),
        }
    }

    /// Drop a deleted job and the notifications that referenced it.
    ///
    /// Returns whether the job was cached.
    pub fn remove_job(&mut self, id: &str) -> bool {
        let before = self.jobs.len();
        self.jobs.retain(|job| job.id != id);
        let removed = self.jobs.len() != before;
        let dropped_unread = self
            .notifications
            .iter()
            .filter(|item| item.job.as_deref() == Some(id) && !item.read)
            .count();
        self.notifications
            .retain(|item| item.job.as_deref() != Some(id));
        self.unread_count = self.unread_count.saturating_sub(dropped_unread);
        removed
    }

    /// Prepend a pushed notification and count it as unread.
    pub fn push_notification(&mut self, pushed: PushedNotification) {
        self.notifications.insert(0, pushed.into());
        self.unread_count += 1;
    }

    /// Decode a realtime frame and merge it.
    ///
    /// # Errors
    /// Returns [`StoreError::MalformedFrame`] when the text is not a known
    /// frame; the store is left untouched.
    pub fn apply_frame(&mut self, text: &str) -> Result<FrameEffect, StoreError> {
        let frame: ServerFrame = serde_json::from_str(text)?;
        Ok(self.apply(frame))
    }

    /// Merge an already decoded frame.
    pub fn apply(&mut self, frame: ServerFrame) -> FrameEffect {
        match frame {
            ServerFrame::Notification { data } => {
                self.push_notification(data);
                FrameEffect::NotificationAdded
            }
            ServerFrame::Joined { user_id } => FrameEffect::Joined { user_id },
            ServerFrame::Error { code, message } => FrameEffect::Rejected { code, message },
        }
    }

    /// Mirror `PUT /api/notifications/{id}`. Idempotent.
    ///
    /// Returns whether the notification is cached.
    pub fn mark_read(&mut self, id: &str) -> bool {
        let Some(item) = self
            .notifications
            .iter_mut()
            .find(|item| item.id.as_deref() == Some(id))
        else {
            return false;
        };
        if !item.read {
            item.read = true;
            self.unread_count = self.unread_count.saturating_sub(1);
        }
        true
    }

    /// Mirror `PUT /api/notifications`.
    pub fn mark_all_read(&mut self) {
        for item in &mut self.notifications {
            item.read = true;
        }
        self.unread_count = 0;
    }

    /// Mirror `DELETE /api/notifications/{id}`.
    ///
    /// Returns whether the notification was cached.
    pub fn delete_notification(&mut self, id: &str) -> bool {
        let Some(position) = self
            .notifications
            .iter()
            .position(|item| item.id.as_deref() == Some(id))
        else {
            return false;
        };
        let removed = self.notifications.remove(position);
        if !removed.read {
            self.unread_count = self.unread_count.saturating_sub(1);
        }
        true
    }
}
