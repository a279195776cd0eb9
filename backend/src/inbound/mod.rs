//! Driving adapters.
//!
//! [`http`] serves the REST surface under `/api`; [`ws`] upgrades `/ws` into
//! a per-user notification socket. Both resolve callers through the
//! [`Authenticator`](crate::domain::ports::Authenticator) port.

pub mod http;
pub mod ws;
