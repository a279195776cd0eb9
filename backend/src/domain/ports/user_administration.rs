//! Driving port for admin-only user management.

use std::collections::BTreeMap;

use async_trait::async_trait;

use crate::domain::{Caller, Error, JobStatus, Role, User, UserId};

use super::Registration;

/// System-wide totals shown to admins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SystemStats {
    pub total_users: u64,
    pub total_admins: u64,
    pub total_jobs: u64,
    pub status_counts: BTreeMap<JobStatus, u64>,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserAdministration: Send + Sync {
    /// Every registered user.
    async fn list_users(&self, caller: &Caller) -> Result<Vec<User>, Error>;

    /// Create another admin account without signing it in.
    async fn create_admin(
        &self,
        caller: &Caller,
        registration: Registration,
    ) -> Result<User, Error>;

    /// Change a user's role. Admins cannot demote themselves.
    async fn update_role(&self, caller: &Caller, id: &UserId, role: Role) -> Result<User, Error>;

    /// Delete a user with their jobs and notifications. Admins cannot delete
    /// themselves.
    async fn delete_user(&self, caller: &Caller, id: &UserId) -> Result<(), Error>;

    /// Totals across every user.
    async fn stats(&self, caller: &Caller) -> Result<SystemStats, Error>;
}
