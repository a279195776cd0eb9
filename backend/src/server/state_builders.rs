//! Builders for the driven ports behind the server.

use std::sync::Arc;

use mockable::{Clock, DefaultClock};
use tracing::{info, warn};

use jobtrack::domain::AdminInviteCodes;
use jobtrack::domain::ports::NotificationPublisher;
use jobtrack::outbound::persistence::{DbPool, PoolConfig, run_migrations};
use jobtrack::outbound::security::{Argon2PasswordHasher, JwtTokenService};
use jobtrack::services::{DrivenPorts, Repositories};

use super::AppSettings;

/// PostgreSQL repositories when a database URL is configured, in-memory
/// stores otherwise. Pending migrations run before the pool is built.
///
/// # Errors
/// Returns [`std::io::Error`] when migrations fail or the pool cannot be built.
pub async fn build_repositories(settings: &AppSettings) -> std::io::Result<Repositories> {
    let Some(database_url) = settings.database_url.as_deref() else {
        warn!("JOBTRACK_DATABASE_URL not set; using in-memory stores");
        return Ok(Repositories::in_memory());
    };

    run_migrations(database_url)
        .await
        .map_err(|error| std::io::Error::other(format!("database migration failed: {error}")))?;
    let pool = DbPool::new(PoolConfig::new(database_url).with_max_size(settings.pool_max_size()))
        .await
        .map_err(|error| std::io::Error::other(format!("database pool failed: {error}")))?;
    info!(max_size = settings.pool_max_size(), "database pool ready");
    Ok(Repositories::diesel(&pool))
}

/// Assemble every driven port from settings.
///
/// `allow_ephemeral_secret` permits a per-process JWT secret when none is
/// configured.
///
/// # Errors
/// Returns [`std::io::Error`] when the JWT settings are invalid.
pub fn build_ports(
    settings: &AppSettings,
    repositories: Repositories,
    publisher: Arc<dyn NotificationPublisher>,
    allow_ephemeral_secret: bool,
) -> std::io::Result<DrivenPorts> {
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    let secret = settings.jwt_secret(allow_ephemeral_secret)?;
    let tokens = JwtTokenService::new(secret.as_bytes(), settings.jwt_ttl()?, clock.clone());
    if settings.admin_invite_secret.is_none() {
        warn!("JOBTRACK_ADMIN_INVITE_SECRET not set; admin invites are disabled");
    }
    Ok(DrivenPorts {
        repositories,
        publisher,
        hasher: Arc::new(Argon2PasswordHasher::default()),
        tokens: Arc::new(tokens),
        invites: AdminInviteCodes::new(settings.admin_invite_secret.clone(), clock.clone()),
        clock,
    })
}
