//! Driving ports for account lifecycle and bearer authentication.
//!
//! Inbound adapters validate raw input into the typed fields below before
//! calling in, so implementations only deal with well-formed values.

use async_trait::async_trait;

use crate::domain::{
    AuthSession, Caller, EmailAddress, Error, InviteCode, Password, User, UserName,
};

/// Validated sign-up input.
#[derive(Debug, Clone)]
pub struct Registration {
    pub name: UserName,
    pub email: EmailAddress,
    pub password: Password,
}

/// Profile fields supplied by the caller; absent fields are kept.
#[derive(Debug, Clone, Default)]
pub struct ProfileChanges {
    pub name: Option<UserName>,
    pub email: Option<EmailAddress>,
    pub password: Option<Password>,
}

/// Login input. The email is normalised but not validated so malformed
/// addresses fail like unknown ones.
#[derive(Debug, Clone)]
pub struct LoginCredentials {
    pub email: String,
    pub password: Password,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountService: Send + Sync {
    /// Create an applicant account and sign it in.
    async fn register(&self, registration: Registration) -> Result<AuthSession, Error>;

    /// Check credentials and issue a token.
    async fn login(&self, credentials: LoginCredentials) -> Result<AuthSession, Error>;

    /// Create an admin account when `invite_code` is currently valid.
    async fn register_admin(
        &self,
        registration: Registration,
        invite_code: String,
    ) -> Result<AuthSession, Error>;

    /// The caller's stored profile.
    async fn current_user(&self, caller: &Caller) -> Result<User, Error>;

    /// Update the caller's name, email or password.
    async fn update_profile(
        &self,
        caller: &Caller,
        changes: ProfileChanges,
    ) -> Result<User, Error>;

    /// Issue this month's admin invite code. Admins only.
    async fn admin_invite(&self, caller: &Caller) -> Result<InviteCode, Error>;
}

/// Resolves a bearer token into the caller it identifies.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Authenticator: Send + Sync {
    /// Fails with `Unauthorized` for missing, invalid, expired or orphaned
    /// tokens.
    async fn authenticate(&self, token: &str) -> Result<Caller, Error>;
}
