//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **persistence**: PostgreSQL-backed repositories using Diesel ORM
//! - **memory**: process-local repositories used without a database
//! - **realtime**: per-user rooms that push notifications to WebSocket clients
//! - **security**: Argon2 password hashing and JWT bearer tokens
//! - **metrics**: Prometheus instrumentation (feature-gated)
//!
//! Adapters translate between domain types and infrastructure representations
//! and contain no business logic.

pub mod memory;
#[cfg(feature = "metrics")]
pub mod metrics;
pub mod persistence;
pub mod realtime;
pub mod security;
