//! Credential adapters: argon2 password hashing and HS256 bearer tokens.

mod argon2_hasher;
mod jwt;

pub use argon2_hasher::Argon2PasswordHasher;
pub use jwt::{DEFAULT_TOKEN_TTL_DAYS, JwtTokenService};
