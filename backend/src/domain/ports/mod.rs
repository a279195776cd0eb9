//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (repositories, the publisher, credential adapters) carry
//! their own error enums. Driving ports return the domain [`Error`] so
//! inbound adapters can map failures without knowing the backing store.
//!
//! [`Error`]: crate::domain::Error

mod macros;
pub(crate) use macros::define_port_error;

mod accounts;
mod credentials;
mod job_command;
mod job_query;
mod job_repository;
mod notification_command;
mod notification_publisher;
mod notification_query;
mod notification_repository;
mod user_administration;
mod user_repository;

#[cfg(test)]
pub use accounts::{MockAccountService, MockAuthenticator};
pub use accounts::{AccountService, Authenticator, LoginCredentials, ProfileChanges, Registration};
#[cfg(test)]
pub use credentials::{MockPasswordHasher, MockTokenService};
pub use credentials::{PasswordHashError, PasswordHasher, TokenError, TokenService};
pub use job_command::JobCommand;
#[cfg(test)]
pub use job_command::MockJobCommand;
#[cfg(test)]
pub use job_query::MockJobQuery;
pub use job_query::{DASHBOARD_RECENT_JOBS, DashboardSummary, JobFilter, JobQuery};
#[cfg(test)]
pub use job_repository::MockJobRepository;
pub use job_repository::{JobListQuery, JobRepository, JobRepositoryError};
#[cfg(test)]
pub use notification_command::MockNotificationCommand;
pub use notification_command::NotificationCommand;
#[cfg(test)]
pub use notification_publisher::MockNotificationPublisher;
pub use notification_publisher::{
    NoOpNotificationPublisher, NotificationPublishError, NotificationPublisher,
};
#[cfg(test)]
pub use notification_query::MockNotificationQuery;
pub use notification_query::NotificationQuery;
#[cfg(test)]
pub use notification_repository::MockNotificationRepository;
pub use notification_repository::{NotificationRepository, NotificationRepositoryError};
#[cfg(test)]
pub use user_administration::MockUserAdministration;
pub use user_administration::{SystemStats, UserAdministration};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{ProfileUpdate, UserPersistenceError, UserRepository};
