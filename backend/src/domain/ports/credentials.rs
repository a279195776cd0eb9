//! Ports for password hashing and bearer token signing.

use crate::domain::{IssuedToken, Password, TokenClaims, UserId};

use super::define_port_error;

define_port_error! {
    /// Failures raised by password hashing adapters.
    pub enum PasswordHashError {
        /// Hashing or hash parsing failed.
        Hash { message: String } => "password hashing failed: {message}",
    }
}

define_port_error! {
    /// Failures raised by token adapters.
    pub enum TokenError {
        /// The token is malformed or its signature does not verify.
        Invalid { message: String } => "token rejected: {message}",
        /// The token verified but its lifetime has passed.
        Expired => "token expired",
        /// Signing a new token failed.
        Signing { message: String } => "token signing failed: {message}",
    }
}

/// One-way password hashing.
#[cfg_attr(test, mockall::automock)]
pub trait PasswordHasher: Send + Sync {
    /// Hash `password` with a fresh salt.
    fn hash(&self, password: &Password) -> Result<String, PasswordHashError>;

    /// Whether `password` matches the stored `hash`.
    fn verify(&self, password: &Password, hash: &str) -> Result<bool, PasswordHashError>;
}

/// Issues and verifies signed bearer tokens.
#[cfg_attr(test, mockall::automock)]
pub trait TokenService: Send + Sync {
    /// Sign a token for `subject`.
    fn issue(&self, subject: &UserId) -> Result<IssuedToken, TokenError>;

    /// Verify `token` and recover its claims.
    fn verify(&self, token: &str) -> Result<TokenClaims, TokenError>;
}
