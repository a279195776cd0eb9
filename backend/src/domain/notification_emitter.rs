//! Persist-then-push notification emission.
//!
//! The stored record is authoritative. The push that follows is best effort:
//! a failed or undelivered push is logged and never rolls back or retries the
//! write.

use std::sync::Arc;

use mockable::Clock;
use tracing::{debug, warn};

use super::ports::{NotificationPublisher, NotificationRepository, NotificationRepositoryError};
use super::{NewNotification, Notification, NotificationId, NotificationPayload};

/// Creates notifications and fans them out to the owner's live connections.
#[derive(Clone)]
pub struct NotificationEmitter {
    notifications: Arc<dyn NotificationRepository>,
    publisher: Arc<dyn NotificationPublisher>,
    clock: Arc<dyn Clock>,
}

impl NotificationEmitter {
    pub fn new(
        notifications: Arc<dyn NotificationRepository>,
        publisher: Arc<dyn NotificationPublisher>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            notifications,
            publisher,
            clock,
        }
    }

    /// Persist `notification`, then push it to the owner's room.
    pub async fn emit(
        &self,
        notification: NewNotification,
    ) -> Result<Notification, NotificationRepositoryError> {
        let stored = notification.into_notification(NotificationId::random(), self.clock.utc());
        self.notifications.insert(&stored).await?;

        let payload = NotificationPayload::from(&stored);
        match self.publisher.publish(&stored.user_id, &payload).await {
            Ok(connections) => debug!(
                user_id = %stored.user_id,
                kind = %stored.kind,
                connections,
                "notification pushed"
            ),
            Err(error) => warn!(
                user_id = %stored.user_id,
                kind = %stored.kind,
                %error,
                "notification push failed"
            ),
        }
        Ok(stored)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::{
        MockNotificationPublisher, MockNotificationRepository, NotificationPublishError,
    };
    use crate::domain::{NotificationKind, UserId};
    use crate::test_support::{FixtureClock, utc_date};
    use chrono::{DateTime, Utc};
    use mockall::predicate::always;
    use rstest::rstest;

    fn now() -> DateTime<Utc> {
        utc_date(2024, 6, 1)
    }

    fn system_notice(user_id: UserId) -> NewNotification {
        NewNotification {
            user_id,
            job_id: None,
            kind: NotificationKind::System,
            title: "Maintenance".to_owned(),
            message: "Back soon".to_owned(),
        }
    }

    fn emitter(
        repo: MockNotificationRepository,
        publisher: MockNotificationPublisher,
    ) -> NotificationEmitter {
        NotificationEmitter::new(
            Arc::new(repo),
            Arc::new(publisher),
            Arc::new(FixtureClock::at(now())),
        )
    }

    #[rstest]
    #[tokio::test]
    async fn persists_before_pushing() {
        let user_id = UserId::random();
        let mut sequence = mockall::Sequence::new();
        let mut repo = MockNotificationRepository::new();
        repo.expect_insert()
            .withf(move |stored| stored.user_id == user_id && !stored.read)
            .times(1)
            .in_sequence(&mut sequence)
            .returning(|_| Ok(()));
        let mut publisher = MockNotificationPublisher::new();
        publisher
            .expect_publish()
            .withf(move |target, payload| *target == user_id && payload.title == "Maintenance")
            .times(1)
            .in_sequence(&mut sequence)
            .returning(|_, _| Ok(1));

        let stored = emitter(repo, publisher)
            .emit(system_notice(user_id))
            .await
            .expect("emit succeeds");
        assert_eq!(stored.created_at, now());
        assert_eq!(stored.kind, NotificationKind::System);
    }

    #[rstest]
    #[tokio::test]
    async fn push_failure_keeps_stored_record() {
        let mut repo = MockNotificationRepository::new();
        repo.expect_insert().times(1).returning(|_| Ok(()));
        let mut publisher = MockNotificationPublisher::new();
        publisher
            .expect_publish()
            .with(always(), always())
            .returning(|_, _| Err(NotificationPublishError::encoding("boom")));

        let result = emitter(repo, publisher)
            .emit(system_notice(UserId::random()))
            .await;
        assert!(result.is_ok());
    }

    #[rstest]
    #[tokio::test]
    async fn storage_failure_skips_push() {
        let mut repo = MockNotificationRepository::new();
        repo.expect_insert()
            .returning(|_| Err(NotificationRepositoryError::query("disk full")));
        let mut publisher = MockNotificationPublisher::new();
        publisher.expect_publish().never();

        let error = emitter(repo, publisher)
            .emit(system_notice(UserId::random()))
            .await
            .expect_err("insert fails");
        assert_eq!(error, NotificationRepositoryError::query("disk full"));
    }
}
