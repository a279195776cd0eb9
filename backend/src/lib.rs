//! Job application tracker backend.
//!
//! Hexagonal layout: [`domain`] holds the model, use-cases and ports;
//! [`inbound`] adapts HTTP and WebSocket traffic onto the driving ports;
//! [`outbound`] implements the driven ports over PostgreSQL, memory,
//! Argon2/JWT and the realtime rooms. [`services`] wires them together.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod services;

#[cfg(test)]
mod test_support;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use middleware::Trace;
