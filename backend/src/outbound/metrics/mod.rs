//! Prometheus-backed instrumentation, compiled only with the `metrics` feature.

mod prometheus_notifications;

pub use prometheus_notifications::PrometheusNotificationMetrics;
