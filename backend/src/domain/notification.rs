//! Notifications raised for a user, optionally about one of their jobs.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

use super::identifier::uuid_identifier;
use super::{Job, JobId, StatusTransition, UserId};

uuid_identifier!(
    /// Stable notification identifier.
    NotificationId
);

/// Notifications older than this are purged.
pub const NOTIFICATION_RETENTION_DAYS: i64 = 30;

/// Oldest creation time a notification may have at `now` before it expires.
#[must_use]
pub fn retention_cutoff(now: DateTime<Utc>) -> DateTime<Utc> {
    now - TimeDelta::days(NOTIFICATION_RETENTION_DAYS)
}

/// Category of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    StatusChange,
    NewJob,
    Reminder,
    System,
}

impl NotificationKind {
    /// Wire and storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::StatusChange => "status_change",
            Self::NewJob => "new_job",
            Self::Reminder => "reminder",
            Self::System => "system",
        }
    }
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raised when a stored kind is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown notification kind: {0}")]
pub struct UnknownNotificationKind(pub String);

impl FromStr for NotificationKind {
    type Err = UnknownNotificationKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "status_change" => Ok(Self::StatusChange),
            "new_job" => Ok(Self::NewJob),
            "reminder" => Ok(Self::Reminder),
            "system" => Ok(Self::System),
            other => Err(UnknownNotificationKind(other.to_owned())),
        }
    }
}

/// A persisted notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub id: NotificationId,
    pub user_id: UserId,
    pub job_id: Option<JobId>,
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

/// A notification about to be emitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewNotification {
    pub user_id: UserId,
    pub job_id: Option<JobId>,
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
}

impl NewNotification {
    /// Announce a freshly recorded application to its owner.
    #[must_use]
    pub fn job_added(job: &Job) -> Self {
        Self {
            user_id: job.owner,
            job_id: Some(job.id),
            kind: NotificationKind::NewJob,
            title: "New Job Application".to_owned(),
            message: format!(
                "You've added a new application for {} at {}",
                job.title, job.company
            ),
        }
    }

    /// Tell the owner that `job` moved between statuses.
    #[must_use]
    pub fn status_changed(job: &Job, transition: StatusTransition) -> Self {
        Self {
            user_id: job.owner,
            job_id: Some(job.id),
            kind: NotificationKind::StatusChange,
            title: "Application Status Changed".to_owned(),
            message: format!(
                "Your application for {} at {} has changed from {} to {}",
                job.title, job.company, transition.from, transition.to
            ),
        }
    }

    /// Materialise the record stored for this notification.
    #[must_use]
    pub fn into_notification(self, id: NotificationId, now: DateTime<Utc>) -> Notification {
        Notification {
            id,
            user_id: self.user_id,
            job_id: self.job_id,
            kind: self.kind,
            title: self.title,
            message: self.message,
            read: false,
            created_at: now,
        }
    }
}

/// Transient payload pushed over the realtime channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationPayload {
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
}

impl From<&Notification> for NotificationPayload {
    fn from(value: &Notification) -> Self {
        Self {
            kind: value.kind,
            title: value.title.clone(),
            message: value.message.clone(),
        }
    }
}

/// A user's notifications, newest first, with the unread tally.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationFeed {
    pub notifications: Vec<Notification>,
    pub unread_count: usize,
}

impl NotificationFeed {
    /// Build a feed, ordering newest first.
    #[must_use]
    pub fn new(mut notifications: Vec<Notification>) -> Self {
        notifications.sort_by(|left, right| right.created_at.cmp(&left.created_at));
        let unread_count = notifications.iter().filter(|item| !item.read).count();
        Self {
            notifications,
            unread_count,
        }
    }
}
