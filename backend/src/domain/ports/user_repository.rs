//! Port abstraction for user persistence adapters and their errors.
use async_trait::async_trait;

use crate::domain::{EmailAddress, Role, User, UserAccount, UserId, UserName};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user repository query failed: {message}",
        /// Another account already uses the email address.
        DuplicateEmail { email: String } => "email already registered: {email}",
    }
}

/// Replacement profile fields; `password_hash` of `None` keeps the current one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileUpdate {
    pub id: UserId,
    pub name: UserName,
    pub email: EmailAddress,
    pub password_hash: Option<String>,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Persist a new account. Fails with `DuplicateEmail` on conflict.
    async fn insert(&self, account: &UserAccount) -> Result<(), UserPersistenceError>;

    /// Fetch a user by identifier.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError>;

    /// Fetch an account, including its password hash, by email.
    async fn find_account_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<UserAccount>, UserPersistenceError>;

    /// Apply a profile update, returning the stored user when it exists.
    async fn update_profile(
        &self,
        update: &ProfileUpdate,
    ) -> Result<Option<User>, UserPersistenceError>;

    /// Change a user's role, returning the stored user when it exists.
    async fn update_role(
        &self,
        id: &UserId,
        role: Role,
    ) -> Result<Option<User>, UserPersistenceError>;

    /// Remove a user, reporting whether it existed.
    async fn delete(&self, id: &UserId) -> Result<bool, UserPersistenceError>;

    /// Every user, oldest first.
    async fn list(&self) -> Result<Vec<User>, UserPersistenceError>;

    /// Number of users holding `role`, or every user when `None`.
    async fn count(&self, role: Option<Role>) -> Result<u64, UserPersistenceError>;
}
