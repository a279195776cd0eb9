//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Concrete implementations of the repository ports backed by PostgreSQL
//! through `diesel-async` and `bb8` connection pooling.
//!
//! - Repositories only translate between Diesel rows and domain types.
//! - Row structs (`models.rs`) and the schema (`schema.rs`) stay private to
//!   this module.
//! - Every database failure is mapped onto the owning port's error type.
//!
//! # Example
//!
//! ```ignore
//! use jobtrack::outbound::persistence::{DbPool, DieselJobRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/jobtrack")).await?;
//! let jobs = DieselJobRepository::new(pool);
//! ```

mod diesel_job_repository;
mod diesel_notification_repository;
mod diesel_user_repository;
mod error_mapping;
mod models;
mod pool;
mod schema;

pub use diesel_job_repository::DieselJobRepository;
pub use diesel_notification_repository::DieselNotificationRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use pool::{DEFAULT_POOL_MAX_SIZE, DbPool, PoolConfig, PoolError, run_migrations};
