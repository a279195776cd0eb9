//! In-process adapters used when no database is configured and in tests.
//!
//! State lives behind `std::sync::Mutex` guards that are never held across
//! an await point. A poisoned lock surfaces as the port's `Query` error.

mod jobs;
mod notifications;
mod users;

pub use jobs::MemoryJobRepository;
pub use notifications::MemoryNotificationRepository;
pub use users::MemoryUserRepository;

use std::sync::{Mutex, MutexGuard};

fn lock<'a, T, E>(
    mutex: &'a Mutex<T>,
    store: &str,
    to_error: impl FnOnce(String) -> E,
) -> Result<MutexGuard<'a, T>, E> {
    mutex
        .lock()
        .map_err(|_| to_error(format!("{store} store lock poisoned")))
}
