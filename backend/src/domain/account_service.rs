//! Account lifecycle and bearer-token authentication.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::{error, info, warn};

use super::ports::{
    AccountService, Authenticator, LoginCredentials, PasswordHashError, PasswordHasher,
    ProfileChanges, ProfileUpdate, Registration, TokenError, TokenService, UserPersistenceError,
    UserRepository,
};
use super::{
    AdminInviteCodes, AuthSession, Caller, EmailAddress, Error, InviteCode, Password, Role, User,
    UserAccount, UserId,
};

const INVALID_CREDENTIALS: &str = "Invalid credentials";
const UNAUTHORIZED_ROUTE: &str = "Not authorized to access this route";

pub(crate) fn map_user_persistence_error(error: UserPersistenceError) -> Error {
    match error {
        UserPersistenceError::DuplicateEmail { .. } => {
            Error::invalid_request("User already exists")
        }
        other => {
            error!(error = %other, "user repository failure");
            Error::internal(format!("user repository error: {other}"))
        }
    }
}

fn map_hash_error(error: PasswordHashError) -> Error {
    error!(%error, "password hashing failure");
    Error::internal(format!("password hashing error: {error}"))
}

fn map_signing_error(error: TokenError) -> Error {
    error!(%error, "token signing failure");
    Error::internal(format!("token error: {error}"))
}

/// Hash on the blocking pool.
pub(crate) async fn hash_password(
    hasher: &Arc<dyn PasswordHasher>,
    password: Password,
) -> Result<String, Error> {
    let hasher = Arc::clone(hasher);
    tokio::task::spawn_blocking(move || hasher.hash(&password))
        .await
        .map_err(|error| Error::internal(format!("password hashing task failed: {error}")))?
        .map_err(map_hash_error)
}

/// Persist a new account with `role`. Shared with user administration.
pub(crate) async fn create_account(
    users: &Arc<dyn UserRepository>,
    hasher: &Arc<dyn PasswordHasher>,
    clock: &Arc<dyn Clock>,
    registration: Registration,
    role: Role,
) -> Result<User, Error> {
    let existing = users
        .find_account_by_email(&registration.email)
        .await
        .map_err(map_user_persistence_error)?;
    if existing.is_some() {
        return Err(Error::invalid_request("User already exists"));
    }

    let password_hash = hash_password(hasher, registration.password).await?;
    let user = User {
        id: UserId::random(),
        name: registration.name,
        email: registration.email,
        role,
        created_at: clock.utc(),
    };
    users
        .insert(&UserAccount {
            user: user.clone(),
            password_hash,
        })
        .await
        .map_err(map_user_persistence_error)?;
    info!(user_id = %user.id, %role, "account created");
    Ok(user)
}

/// Implements [`AccountService`].
#[derive(Clone)]
pub struct AccountManager {
    users: Arc<dyn UserRepository>,
    hasher: Arc<dyn PasswordHasher>,
    tokens: Arc<dyn TokenService>,
    invites: AdminInviteCodes,
    clock: Arc<dyn Clock>,
}

impl AccountManager {
    pub fn new(
        users: Arc<dyn UserRepository>,
        hasher: Arc<dyn PasswordHasher>,
        tokens: Arc<dyn TokenService>,
        invites: AdminInviteCodes,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            users,
            hasher,
            tokens,
            invites,
            clock,
        }
    }

    fn session_for(&self, user: User) -> Result<AuthSession, Error> {
        let token = self.tokens.issue(&user.id).map_err(map_signing_error)?;
        Ok(AuthSession { token, user })
    }

    async fn load_user(&self, id: &UserId) -> Result<User, Error> {
        self.users
            .find_by_id(id)
            .await
            .map_err(map_user_persistence_error)?
            .ok_or_else(|| Error::not_found("User not found"))
    }
}

#[async_trait]
impl AccountService for AccountManager {
    async fn register(&self, registration: Registration) -> Result<AuthSession, Error> {
        let user = create_account(
            &self.users,
            &self.hasher,
            &self.clock,
            registration,
            Role::Applicant,
        )
        .await?;
        self.session_for(user)
    }

    async fn login(&self, credentials: LoginCredentials) -> Result<AuthSession, Error> {
        let Ok(email) = EmailAddress::new(&credentials.email) else {
            return Err(Error::unauthorized(INVALID_CREDENTIALS));
        };
        let Some(account) = self
            .users
            .find_account_by_email(&email)
            .await
            .map_err(map_user_persistence_error)?
        else {
            return Err(Error::unauthorized(INVALID_CREDENTIALS));
        };

        let hasher = Arc::clone(&self.hasher);
        let password = credentials.password;
        let hash = account.password_hash;
        let matches = tokio::task::spawn_blocking(move || hasher.verify(&password, &hash))
            .await
            .map_err(|error| Error::internal(format!("password check task failed: {error}")))?
            .map_err(map_hash_error)?;
        if !matches {
            return Err(Error::unauthorized(INVALID_CREDENTIALS));
        }
        self.session_for(account.user)
    }

    async fn register_admin(
        &self,
        registration: Registration,
        invite_code: String,
    ) -> Result<AuthSession, Error> {
        if !self.invites.validate(&invite_code) {
            warn!("admin registration with an invalid invite code");
            return Err(Error::invalid_request("Invalid invite code"));
        }
        let user = create_account(
            &self.users,
            &self.hasher,
            &self.clock,
            registration,
            Role::Admin,
        )
        .await?;
        self.session_for(user)
    }

    async fn current_user(&self, caller: &Caller) -> Result<User, Error> {
        self.load_user(&caller.user_id).await
    }

    async fn update_profile(
        &self,
        caller: &Caller,
        changes: ProfileChanges,
    ) -> Result<User, Error> {
        let current = self.load_user(&caller.user_id).await?;
        let password_hash = match changes.password {
            Some(password) => Some(hash_password(&self.hasher, password).await?),
            None => None,
        };
        let update = ProfileUpdate {
            id: current.id,
            name: changes.name.unwrap_or(current.name),
            email: changes.email.unwrap_or(current.email),
            password_hash,
        };
        self.users
            .update_profile(&update)
            .await
            .map_err(|error| match error {
                UserPersistenceError::DuplicateEmail { .. } => {
                    Error::invalid_request("Email already in use")
                }
                other => map_user_persistence_error(other),
            })?
            .ok_or_else(|| Error::not_found("User not found"))
    }

    async fn admin_invite(&self, caller: &Caller) -> Result<InviteCode, Error> {
        caller.authorize(Role::Admin)?;
        self.invites.generate().map_err(|error| {
            error!(%error, "admin invite code unavailable");
            Error::internal(format!("Failed to generate invite code: {error}"))
        })
    }
}

/// Implements [`Authenticator`] by verifying the token and reloading the user.
#[derive(Clone)]
pub struct TokenAuthenticator {
    users: Arc<dyn UserRepository>,
    tokens: Arc<dyn TokenService>,
}

impl TokenAuthenticator {
    pub fn new(users: Arc<dyn UserRepository>, tokens: Arc<dyn TokenService>) -> Self {
        Self { users, tokens }
    }
}

#[async_trait]
impl Authenticator for TokenAuthenticator {
    async fn authenticate(&self, token: &str) -> Result<Caller, Error> {
        let claims = self.tokens.verify(token).map_err(|error| {
            match &error {
                TokenError::Signing { .. } => error!(%error, "token verification failure"),
                _ => info!(%error, "bearer token rejected"),
            }
            Error::unauthorized(UNAUTHORIZED_ROUTE)
        })?;
        let user = self
            .users
            .find_by_id(&claims.subject)
            .await
            .map_err(map_user_persistence_error)?
            .ok_or_else(|| {
                info!(user_id = %claims.subject, "token subject no longer exists");
                Error::unauthorized(UNAUTHORIZED_ROUTE)
            })?;
        Ok(Caller::from_user(&user))
    }
}

#[cfg(test)]
#[path = "account_service_tests.rs"]
mod tests;
