//! Backend entry-point: loads settings, wires adapters and serves the API.

mod server;

use std::sync::Arc;

use actix_web::web;
#[cfg(feature = "metrics")]
use actix_web_prom::PrometheusMetricsBuilder;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use jobtrack::domain::ports::NotificationPublisher;
use jobtrack::inbound::http::health::HealthState;
#[cfg(feature = "metrics")]
use jobtrack::outbound::metrics::PrometheusNotificationMetrics;
use jobtrack::outbound::realtime::RoomRegistry;
use server::{AppSettings, ServerConfig, build_ports, build_repositories, create_server};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = AppSettings::load()
        .map_err(|e| std::io::Error::other(format!("failed to load settings: {e}")))?;
    let bind_addr = settings.bind_addr()?;

    let rooms = Arc::new(RoomRegistry::new());
    #[cfg(feature = "metrics")]
    let prometheus = make_metrics()?;
    #[cfg(feature = "metrics")]
    let publisher: Arc<dyn NotificationPublisher> = Arc::new(
        PrometheusNotificationMetrics::new(rooms.clone(), &prometheus.registry).map_err(|e| {
            std::io::Error::other(format!("notification metrics registration failed: {e}"))
        })?,
    );
    #[cfg(not(feature = "metrics"))]
    let publisher: Arc<dyn NotificationPublisher> = rooms.clone();

    let repositories = build_repositories(&settings).await?;
    let ports = build_ports(&settings, repositories, publisher, cfg!(debug_assertions))?;

    actix_web::rt::spawn(ports.retention_worker(settings.retention_interval()).run());

    let config = ServerConfig::new(bind_addr, ports, rooms, settings.allowed_origins());
    #[cfg(feature = "metrics")]
    let config = config.with_metrics(prometheus);

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state, config)?;
    info!(%bind_addr, "jobtrack listening");
    server.await
}

#[cfg(feature = "metrics")]
fn make_metrics() -> std::io::Result<actix_web_prom::PrometheusMetrics> {
    PrometheusMetricsBuilder::new("jobtrack")
        .endpoint("/metrics")
        .build()
        .map_err(|e| std::io::Error::other(format!("configure Prometheus metrics: {e}")))
}
