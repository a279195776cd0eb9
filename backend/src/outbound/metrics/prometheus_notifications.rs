//! Prometheus counters around realtime notification delivery.
//!
//! Wraps any [`NotificationPublisher`] and counts each push by notification
//! type and outcome.
//!
//! # Metrics
//!
//! - **Name**: `jobtrack_notification_pushes_total`
//! - **Type**: Counter
//! - **Labels**:
//!   - `type`: `status_change`, `new_job`, `reminder`, or `system`
//!   - `outcome`: `delivered`, `no_listener`, or `failed`

use std::sync::Arc;

use async_trait::async_trait;
use prometheus::{CounterVec, Opts, Registry};

use crate::domain::ports::{NotificationPublishError, NotificationPublisher};
use crate::domain::{NotificationPayload, UserId};

/// Publisher decorator that records push outcomes.
pub struct PrometheusNotificationMetrics {
    inner: Arc<dyn NotificationPublisher>,
    pushes_total: CounterVec,
}

impl PrometheusNotificationMetrics {
    /// Register the counter and wrap `inner`.
    ///
    /// # Errors
    ///
    /// Returns an error when Prometheus rejects the registration, for example
    /// when the counter is already registered.
    pub fn new(
        inner: Arc<dyn NotificationPublisher>,
        registry: &Registry,
    ) -> Result<Self, prometheus::Error> {
        let pushes_total = CounterVec::new(
            Opts::new(
                "jobtrack_notification_pushes_total",
                "Realtime notification pushes by type and outcome",
            ),
            &["type", "outcome"],
        )?;
        registry.register(Box::new(pushes_total.clone()))?;
        Ok(Self {
            inner,
            pushes_total,
        })
    }

    fn record(&self, payload: &NotificationPayload, outcome: &str) {
        self.pushes_total
            .with_label_values(&[payload.kind.as_str(), outcome])
            .inc();
    }
}

#[async_trait]
impl NotificationPublisher for PrometheusNotificationMetrics {
    async fn publish(
        &self,
        user: &UserId,
        payload: &NotificationPayload,
    ) -> Result<usize, NotificationPublishError> {
        let result = self.inner.publish(user, payload).await;
        let outcome = match &result {
            Ok(0) => "no_listener",
            Ok(_) => "delivered",
            Err(_) => "failed",
        };
        self.record(payload, outcome);
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::NotificationKind;
    use crate::domain::ports::{MockNotificationPublisher, NoOpNotificationPublisher};
    use rstest::{fixture, rstest};

    #[fixture]
    fn payload() -> NotificationPayload {
        NotificationPayload {
            kind: NotificationKind::NewJob,
            title: "New Job Application".to_owned(),
            message: "You've added a new application for Engineer at Acme".to_owned(),
        }
    }

    fn count(metrics: &PrometheusNotificationMetrics, outcome: &str) -> u64 {
        metrics
            .pushes_total
            .with_label_values(&["new_job", outcome])
            .get() as u64
    }

    #[rstest]
    #[tokio::test]
    async fn counts_pushes_without_listeners(payload: NotificationPayload) {
        let registry = Registry::new();
        let metrics =
            PrometheusNotificationMetrics::new(Arc::new(NoOpNotificationPublisher), &registry)
                .expect("metric registration should succeed");

        metrics
            .publish(&UserId::random(), &payload)
            .await
            .expect("publish succeeds");

        assert_eq!(count(&metrics, "no_listener"), 1);
        assert!(
            registry
                .gather()
                .iter()
                .any(|family| family.name() == "jobtrack_notification_pushes_total")
        );
    }

    #[rstest]
    #[tokio::test]
    async fn passes_through_delivery_and_failure(payload: NotificationPayload) {
        let mut inner = MockNotificationPublisher::new();
        inner.expect_publish().times(1).returning(|_, _| Ok(2));
        inner
            .expect_publish()
            .times(1)
            .returning(|_, _| Err(NotificationPublishError::encoding("bad frame")));
        let metrics = PrometheusNotificationMetrics::new(Arc::new(inner), &Registry::new())
            .expect("metric registration should succeed");
        let user = UserId::random();

        assert_eq!(metrics.publish(&user, &payload).await, Ok(2));
        assert!(metrics.publish(&user, &payload).await.is_err());
        assert_eq!(count(&metrics, "delivered"), 1);
        assert_eq!(count(&metrics, "failed"), 1);
    }

    #[rstest]
    fn rejects_duplicate_registration() {
        let registry = Registry::new();
        let inner: Arc<dyn NotificationPublisher> = Arc::new(NoOpNotificationPublisher);
        let _first = PrometheusNotificationMetrics::new(Arc::clone(&inner), &registry)
            .expect("first registration succeeds");
        assert!(PrometheusNotificationMetrics::new(inner, &registry).is_err());
    }
}
