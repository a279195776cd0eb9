//! Assemble domain services over a set of driven adapters.
//!
//! The server binary and the HTTP and WebSocket tests share this wiring so
//! every entry point runs the same service graph. Only the repositories
//! differ between PostgreSQL and the in-memory fallback.

use std::sync::Arc;
use std::time::Duration;

use mockable::Clock;

use crate::domain::ports::{
    Authenticator, JobRepository, NotificationPublisher, NotificationRepository, PasswordHasher,
    TokenService, UserRepository,
};
use crate::domain::{
    AccountManager, AdminInviteCodes, JobService, NotificationEmitter,
    NotificationRetentionWorker, NotificationService, TokenAuthenticator, UserAdminService,
};
use crate::inbound::http::state::HttpState;
use crate::outbound::memory::{
    MemoryJobRepository, MemoryNotificationRepository, MemoryUserRepository,
};
use crate::outbound::persistence::{
    DbPool, DieselJobRepository, DieselNotificationRepository, DieselUserRepository,
};

/// Storage adapters behind the repository ports.
#[derive(Clone)]
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub jobs: Arc<dyn JobRepository>,
    pub notifications: Arc<dyn NotificationRepository>,
}

impl Repositories {
    /// Process-local stores; contents are lost on restart.
    pub fn in_memory() -> Self {
        Self {
            users: Arc::new(MemoryUserRepository::default()),
            jobs: Arc::new(MemoryJobRepository::default()),
            notifications: Arc::new(MemoryNotificationRepository::default()),
        }
    }

    /// PostgreSQL stores sharing one pool.
    pub fn diesel(pool: &DbPool) -> Self {
        Self {
            users: Arc::new(DieselUserRepository::new(pool.clone())),
            jobs: Arc::new(DieselJobRepository::new(pool.clone())),
            notifications: Arc::new(DieselNotificationRepository::new(pool.clone())),
        }
    }
}

/// Every driven port the services need.
#[derive(Clone)]
pub struct DrivenPorts {
    pub repositories: Repositories,
    pub publisher: Arc<dyn NotificationPublisher>,
    pub hasher: Arc<dyn PasswordHasher>,
    pub tokens: Arc<dyn TokenService>,
    pub invites: AdminInviteCodes,
    pub clock: Arc<dyn Clock>,
}

impl DrivenPorts {
    /// Resolves bearer tokens against the user store.
    pub fn authenticator(&self) -> Arc<dyn Authenticator> {
        Arc::new(TokenAuthenticator::new(
            self.repositories.users.clone(),
            self.tokens.clone(),
        ))
    }

    /// Build the handler state over these ports.
    pub fn http_state(&self) -> HttpState {
        let Repositories {
            users,
            jobs,
            notifications,
        } = self.repositories.clone();
        let emitter = NotificationEmitter::new(
            notifications.clone(),
            self.publisher.clone(),
            self.clock.clone(),
        );
        let job_service = Arc::new(JobService::new(
            jobs.clone(),
            notifications.clone(),
            emitter,
            self.clock.clone(),
        ));
        let notification_service = Arc::new(NotificationService::new(notifications.clone()));
        let accounts = AccountManager::new(
            users.clone(),
            self.hasher.clone(),
            self.tokens.clone(),
            self.invites.clone(),
            self.clock.clone(),
        );
        let admin = UserAdminService::new(
            users,
            jobs,
            notifications,
            self.hasher.clone(),
            self.clock.clone(),
        );

        HttpState {
            accounts: Arc::new(accounts),
            authenticator: self.authenticator(),
            jobs: job_service.clone(),
            jobs_query: job_service,
            notifications: notification_service.clone(),
            notifications_query: notification_service,
            users: Arc::new(admin),
        }
    }

    /// Background purge of expired notifications.
    pub fn retention_worker(&self, interval: Duration) -> NotificationRetentionWorker {
        NotificationRetentionWorker::new(
            self.repositories.notifications.clone(),
            self.clock.clone(),
            interval,
        )
    }
}
