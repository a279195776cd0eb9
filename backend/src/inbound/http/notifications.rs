//! Notification feed endpoints.

use actix_web::{delete, get, put, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{JobId, Notification, NotificationId, NotificationKind, UserId};

use super::auth::AuthenticatedCaller;
use super::schemas::{ErrorSchema, NotificationKindSchema};
use super::state::HttpState;
use super::validation::parse_path_id;
use super::{ApiResult, DataResponse, Empty};

const NOTIFICATION_NOT_FOUND: &str = "Notification not found";

/// A stored notification.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NotificationResponse {
    #[schema(value_type = String)]
    pub id: NotificationId,
    #[schema(value_type = String)]
    pub user: UserId,
    /// The job this notification is about, if any.
    #[schema(value_type = Option<String>)]
    pub job: Option<JobId>,
    #[serde(rename = "type")]
    #[schema(value_type = NotificationKindSchema)]
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

impl From<Notification> for NotificationResponse {
    fn from(value: Notification) -> Self {
        Self {
            id: value.id,
            user: value.user_id,
            job: value.job_id,
            kind: value.kind,
            title: value.title,
            message: value.message,
            read: value.read,
            created_at: value.created_at,
        }
    }
}

/// The caller's notifications, newest first.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NotificationListResponse {
    pub success: bool,
    pub count: usize,
    pub unread_count: usize,
    pub data: Vec<NotificationResponse>,
}

fn notification_id(raw: &str) -> ApiResult<NotificationId> {
    parse_path_id(raw, NOTIFICATION_NOT_FOUND).map(NotificationId::from_uuid)
}

#[utoipa::path(
    get,
    path = "/api/notifications",
    responses(
        (status = 200, description = "Notifications", body = NotificationListResponse),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["notifications"],
    operation_id = "listNotifications"
)]
#[get("/notifications")]
pub async fn list_notifications(
    state: web::Data<HttpState>,
    caller: AuthenticatedCaller,
) -> ApiResult<web::Json<NotificationListResponse>> {
    let feed = state
        .notifications_query
        .feed(&caller.into_inner())
        .await?;
    let data: Vec<NotificationResponse> =
        feed.notifications.into_iter().map(Into::into).collect();
    Ok(web::Json(NotificationListResponse {
        success: true,
        count: data.len(),
        unread_count: feed.unread_count,
        data,
    }))
}

/// Mark every notification of the caller as read.
#[utoipa::path(
    put,
    path = "/api/notifications",
    responses(
        (status = 200, description = "All notifications read", body = DataResponse<Empty>),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["notifications"],
    operation_id = "markAllNotificationsRead"
)]
#[put("/notifications")]
pub async fn mark_all_read(
    state: web::Data<HttpState>,
    caller: AuthenticatedCaller,
) -> ApiResult<web::Json<DataResponse<Empty>>> {
    state.notifications.mark_all_read(&caller.into_inner()).await?;
    Ok(web::Json(DataResponse::new(Empty::default())))
}

#[utoipa::path(
    put,
    path = "/api/notifications/{id}",
    params(("id" = String, Path, description = "Notification identifier")),
    responses(
        (status = 200, description = "Notification read", body = DataResponse<NotificationResponse>),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Not the owner", body = ErrorSchema),
        (status = 404, description = "Notification not found", body = ErrorSchema)
    ),
    tags = ["notifications"],
    operation_id = "markNotificationRead"
)]
#[put("/notifications/{id}")]
pub async fn mark_read(
    state: web::Data<HttpState>,
    caller: AuthenticatedCaller,
    path: web::Path<String>,
) -> ApiResult<web::Json<DataResponse<NotificationResponse>>> {
    let id = notification_id(&path)?;
    let notification = state
        .notifications
        .mark_read(&caller.into_inner(), &id)
        .await?;
    Ok(web::Json(DataResponse::new(notification.into())))
}

#[utoipa::path(
    delete,
    path = "/api/notifications/{id}",
    params(("id" = String, Path, description = "Notification identifier")),
    responses(
        (status = 200, description = "Notification deleted", body = DataResponse<Empty>),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Not the owner", body = ErrorSchema),
        (status = 404, description = "Notification not found", body = ErrorSchema)
    ),
    tags = ["notifications"],
    operation_id = "deleteNotification"
)]
#[delete("/notifications/{id}")]
pub async fn delete_notification(
    state: web::Data<HttpState>,
    caller: AuthenticatedCaller,
    path: web::Path<String>,
) -> ApiResult<web::Json<DataResponse<Empty>>> {
    let id = notification_id(&path)?;
    state
        .notifications
        .delete(&caller.into_inner(), &id)
        .await?;
    Ok(web::Json(DataResponse::new(Empty::default())))
}

#[cfg(test)]
#[path = "notifications_tests.rs"]
mod tests;
