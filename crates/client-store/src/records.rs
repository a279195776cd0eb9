//! Wire shapes for cached resources.

use serde::{Deserialize, Serialize};

/// A job application as returned by the jobs endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobRecord {
    /// Server identifier.
    pub id: String,
    /// Owning user identifier.
    pub user: String,
    /// Employer name.
    pub company: String,
    /// Position title.
    pub title: String,
    /// Lifecycle stage, for example `Applied` or `Offer`.
    pub status: String,
    /// RFC 3339 application date.
    pub applied_date: String,
    /// RFC 3339 time of the last change.
    pub updated_at: String,
}

/// A stored notification as returned by `GET /api/notifications`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationRecord {
    /// Server identifier; absent for entries merged from a push.
    #[serde(default)]
    pub id: Option<String>,
    /// Related job identifier, if any.
    #[serde(default)]
    pub job: Option<String>,
    /// Notification category, for example `status_change`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Short headline.
    pub title: String,
    /// Human-readable body.
    pub message: String,
    /// Whether the user has seen it.
    #[serde(default)]
    pub read: bool,
}

/// Transient payload carried by a `notification` frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PushedNotification {
    /// Notification category.
    #[serde(rename = "type")]
    pub kind: String,
    /// Short headline.
    pub title: String,
    /// Human-readable body.
    pub message: String,
}

impl From<PushedNotification> for NotificationRecord {
    fn from(value: PushedNotification) -> Self {
        Self {
            id: None,
            job: None,
            kind: value.kind,
            title: value.title,
            message: value.message,
            read: false,
        }
    }
}
