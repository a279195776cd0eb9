//! Shared handle serialising mutations of one [`ClientStore`].

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::store::ClientStore;

/// Cloneable handle over a single store.
///
/// Every read and write takes the same lock, so concurrent callers observe
/// mutations in one total order.
#[derive(Debug, Clone, Default)]
pub struct SharedStore {
    inner: Arc<Mutex<ClientStore>>,
}

impl SharedStore {
    /// Wrap an existing store.
    #[must_use]
    pub fn new(store: ClientStore) -> Self {
        Self {
            inner: Arc::new(Mutex::new(store)),
        }
    }

    /// Run `f` with exclusive access to the store.
    pub fn update<T>(&self, f: impl FnOnce(&mut ClientStore) -> T) -> T {
        f(&mut self.lock())
    }

    /// Run `f` against a consistent view of the store.
    pub fn read<T>(&self, f: impl FnOnce(&ClientStore) -> T) -> T {
        f(&self.lock())
    }

    /// Clone the current state.
    #[must_use]
    pub fn snapshot(&self) -> ClientStore {
        self.lock().clone()
    }

    fn lock(&self) -> MutexGuard<'_, ClientStore> {
        // Poisoned locks still hold a consistent store.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
