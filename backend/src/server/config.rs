//! Application settings and the HTTP server configuration object.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use chrono::TimeDelta;
use ortho_config::OrthoConfig;
use serde::Deserialize;
use tracing::warn;
use uuid::Uuid;
use zeroize::Zeroizing;

#[cfg(feature = "metrics")]
use actix_web_prom::PrometheusMetrics;

use jobtrack::inbound::ws::state::{AllowedOrigins, DEFAULT_ALLOWED_ORIGIN};
use jobtrack::outbound::persistence::DEFAULT_POOL_MAX_SIZE;
use jobtrack::outbound::realtime::RoomRegistry;
use jobtrack::outbound::security::DEFAULT_TOKEN_TTL_DAYS;
use jobtrack::services::DrivenPorts;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:5000";

/// Rejections raised while resolving settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("invalid bind address {value:?}: {source}")]
    BindAddr {
        value: String,
        source: std::net::AddrParseError,
    },
    #[error("JOBTRACK_JWT_SECRET must be set outside debug builds")]
    MissingJwtSecret,
    #[error("jwt_ttl_days must be positive, got {0}")]
    JwtTtl(i64),
}

impl From<SettingsError> for std::io::Error {
    fn from(value: SettingsError) -> Self {
        Self::other(value.to_string())
    }
}

/// Settings loaded from `JOBTRACK_*` variables, CLI flags and config files.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "JOBTRACK")]
pub struct AppSettings {
    /// Socket address the HTTP server binds to.
    pub bind_addr: Option<String>,
    /// PostgreSQL connection string. In-memory stores are used when absent.
    pub database_url: Option<String>,
    /// HS256 signing secret for bearer tokens.
    pub jwt_secret: Option<String>,
    /// Bearer token lifetime in days.
    #[ortho_config(default = 30)]
    pub jwt_ttl_days: i64,
    /// Secret keying the monthly admin invite codes.
    pub admin_invite_secret: Option<String>,
    /// Browser origin of the client, added to the WebSocket allow-list.
    pub client_url: Option<String>,
    /// Seconds between notification purge passes.
    #[ortho_config(default = 3600)]
    pub retention_interval_secs: u64,
    /// Maximum database connections.
    pub pool_max_size: Option<u32>,
}

impl AppSettings {
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let value = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        value.parse().map_err(|source| SettingsError::BindAddr {
            value: value.to_owned(),
            source,
        })
    }

    pub fn jwt_ttl(&self) -> Result<TimeDelta, SettingsError> {
        if self.jwt_ttl_days <= 0 {
            return Err(SettingsError::JwtTtl(self.jwt_ttl_days));
        }
        Ok(TimeDelta::try_days(self.jwt_ttl_days)
            .unwrap_or_else(|| TimeDelta::days(DEFAULT_TOKEN_TTL_DAYS)))
    }

    /// Signing secret, or a per-process secret when `allow_ephemeral` is set.
    ///
    /// Tokens signed with an ephemeral secret stop verifying on restart.
    pub fn jwt_secret(&self, allow_ephemeral: bool) -> Result<Zeroizing<String>, SettingsError> {
        match self.jwt_secret.as_deref().map(str::trim) {
            Some(secret) if !secret.is_empty() => Ok(Zeroizing::new(secret.to_owned())),
            _ if allow_ephemeral => {
                warn!("using temporary JWT secret (dev only)");
                Ok(Zeroizing::new(format!(
                    "{}{}",
                    Uuid::new_v4().simple(),
                    Uuid::new_v4().simple()
                )))
            }
            _ => Err(SettingsError::MissingJwtSecret),
        }
    }

    pub fn retention_interval(&self) -> Duration {
        Duration::from_secs(self.retention_interval_secs.max(1))
    }

    pub fn pool_max_size(&self) -> u32 {
        self.pool_max_size.unwrap_or(DEFAULT_POOL_MAX_SIZE)
    }

    /// The default development origin plus the configured client URL.
    pub fn allowed_origins(&self) -> AllowedOrigins {
        AllowedOrigins::new(
            std::iter::once(DEFAULT_ALLOWED_ORIGIN).chain(self.client_url.as_deref()),
        )
    }
}

/// Everything [`super::create_server`] needs to start listening.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) ports: DrivenPorts,
    pub(crate) rooms: Arc<RoomRegistry>,
    pub(crate) allowed_origins: AllowedOrigins,
    #[cfg(feature = "metrics")]
    pub(crate) prometheus: Option<PrometheusMetrics>,
}

impl ServerConfig {
    #[must_use]
    pub fn new(
        bind_addr: SocketAddr,
        ports: DrivenPorts,
        rooms: Arc<RoomRegistry>,
        allowed_origins: AllowedOrigins,
    ) -> Self {
        Self {
            bind_addr,
            ports,
            rooms,
            allowed_origins,
            #[cfg(feature = "metrics")]
            prometheus: None,
        }
    }

    #[cfg(feature = "metrics")]
    /// Attach Prometheus middleware and its `/metrics` endpoint.
    #[must_use]
    pub fn with_metrics(mut self, prometheus: PrometheusMetrics) -> Self {
        self.prometheus = Some(prometheus);
        self
    }
}
