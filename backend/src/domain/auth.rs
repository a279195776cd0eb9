//! Authenticated identities and the gates applied to them.

use chrono::{DateTime, Utc};

use super::{Error, Role, User, UserId};

/// Identity resolved from a verified bearer token.
///
/// The role is read from storage on every resolution so role changes take
/// effect without reissuing tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Caller {
    pub user_id: UserId,
    pub role: Role,
}

impl Caller {
    /// Build the caller view of a stored user.
    #[must_use]
    pub fn from_user(user: &User) -> Self {
        Self {
            user_id: user.id,
            role: user.role,
        }
    }

    /// Whether the caller holds the admin role.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Owners and admins may act on a resource owned by `owner`.
    #[must_use]
    pub fn can_access(&self, owner: &UserId) -> bool {
        self.is_admin() || self.user_id == *owner
    }

    /// Fail with `Forbidden` unless the caller holds `required`.
    ///
    /// # Examples
    /// ```
    /// use jobtrack::domain::{Caller, ErrorCode, Role, UserId};
    ///
    /// let caller = Caller { user_id: UserId::random(), role: Role::Applicant };
    /// let err = caller.authorize(Role::Admin).expect_err("applicants are not admins");
    /// assert_eq!(err.code(), ErrorCode::Forbidden);
    /// ```
    pub fn authorize(&self, required: Role) -> Result<(), Error> {
        if self.role == required {
            Ok(())
        } else {
            Err(Error::forbidden(format!(
                "User role {} is not authorized to access this route",
                self.role
            )))
        }
    }
}

/// Claims recovered from a verified token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenClaims {
    pub subject: UserId,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

/// Signed bearer token handed to a client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Result of a successful registration or login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthSession {
    pub token: IssuedToken,
    pub user: User,
}
