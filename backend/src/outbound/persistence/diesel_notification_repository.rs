//! PostgreSQL-backed `NotificationRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{NotificationRepository, NotificationRepositoryError};
use crate::domain::{JobId, Notification, NotificationId, NotificationKind, UserId};

use super::error_mapping::{DieselFailure, classify, pool_message};
use super::models::NotificationRow;
use super::pool::{DbPool, PoolError};
use super::schema::notifications;

/// Diesel-backed implementation of the notification repository port.
#[derive(Clone)]
pub struct DieselNotificationRepository {
    pool: DbPool,
}

impl DieselNotificationRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> NotificationRepositoryError {
    NotificationRepositoryError::connection(pool_message(error))
}

fn map_diesel_error(error: diesel::result::Error) -> NotificationRepositoryError {
    match classify(error) {
        DieselFailure::Connection(message) => NotificationRepositoryError::connection(message),
        DieselFailure::Query(message) => NotificationRepositoryError::query(message),
        DieselFailure::UniqueViolation { .. } => {
            NotificationRepositoryError::query("notification already exists")
        }
    }
}

fn count(affected: usize) -> u64 {
    u64::try_from(affected).unwrap_or(u64::MAX)
}

fn row_to_notification(row: NotificationRow) -> Result<Notification, NotificationRepositoryError> {
    let kind = row
        .kind
        .parse::<NotificationKind>()
        .map_err(|err| NotificationRepositoryError::query(err.to_string()))?;
    Ok(Notification {
        id: NotificationId::from_uuid(row.id),
        user_id: UserId::from_uuid(row.user_id),
        job_id: row.job_id.map(JobId::from_uuid),
        kind,
        title: row.title,
        message: row.message,
        read: row.read,
        created_at: row.created_at,
    })
}

fn notification_to_row(notification: &Notification) -> NotificationRow {
    NotificationRow {
        id: *notification.id.as_uuid(),
        user_id: *notification.user_id.as_uuid(),
        job_id: notification.job_id.map(|job| *job.as_uuid()),
        kind: notification.kind.as_str().to_owned(),
        title: notification.title.clone(),
        message: notification.message.clone(),
        read: notification.read,
        created_at: notification.created_at,
    }
}

#[async_trait]
impl NotificationRepository for DieselNotificationRepository {
    async fn insert(&self, notification: &Notification) -> Result<(), NotificationRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::insert_into(notifications::table)
            .values(&notification_to_row(notification))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn find_by_id(
        &self,
        id: &NotificationId,
    ) -> Result<Option<Notification>, NotificationRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<NotificationRow> = notifications::table
            .filter(notifications::id.eq(id.as_uuid()))
            .select(NotificationRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(row_to_notification).transpose()
    }

    async fn mark_read(
        &self,
        id: &NotificationId,
    ) -> Result<Option<Notification>, NotificationRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<NotificationRow> =
            diesel::update(notifications::table.filter(notifications::id.eq(id.as_uuid())))
                .set(notifications::read.eq(true))
                .returning(NotificationRow::as_returning())
                .get_result(&mut conn)
                .await
                .optional()
                .map_err(map_diesel_error)?;
        row.map(row_to_notification).transpose()
    }

    async fn mark_all_read(&self, user: &UserId) -> Result<u64, NotificationRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::update(
            notifications::table
                .filter(notifications::user_id.eq(user.as_uuid()))
                .filter(notifications::read.eq(false)),
        )
        .set(notifications::read.eq(true))
        .execute(&mut conn)
        .await
        .map(count)
        .map_err(map_diesel_error)
    }

    async fn list_for_user(
        &self,
        user: &UserId,
    ) -> Result<Vec<Notification>, NotificationRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<NotificationRow> = notifications::table
            .filter(notifications::user_id.eq(user.as_uuid()))
            .order((notifications::created_at.desc(), notifications::id.desc()))
            .select(NotificationRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows.into_iter().map(row_to_notification).collect()
    }

    async fn delete(&self, id: &NotificationId) -> Result<bool, NotificationRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::delete(notifications::table.filter(notifications::id.eq(id.as_uuid())))
            .execute(&mut conn)
            .await
            .map(|deleted| deleted > 0)
            .map_err(map_diesel_error)
    }

    async fn delete_for_job(&self, job: &JobId) -> Result<u64, NotificationRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::delete(notifications::table.filter(notifications::job_id.eq(job.as_uuid())))
            .execute(&mut conn)
            .await
            .map(count)
            .map_err(map_diesel_error)
    }

    async fn delete_for_user(&self, user: &UserId) -> Result<u64, NotificationRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::delete(notifications::table.filter(notifications::user_id.eq(user.as_uuid())))
            .execute(&mut conn)
            .await
            .map(count)
            .map_err(map_diesel_error)
    }

    async fn delete_created_before(
        &self,
        cutoff: DateTime<Utc>,
    ) -> Result<u64, NotificationRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::delete(notifications::table.filter(notifications::created_at.lt(cutoff)))
            .execute(&mut conn)
            .await
            .map(count)
            .map_err(map_diesel_error)
    }
}
