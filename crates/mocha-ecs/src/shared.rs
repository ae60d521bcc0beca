use std::sync::Arc;

use parking_lot::{Mutex, MutexGuard};

use crate::registry::Registry;

/// A registry handle that can be shared across threads.
///
/// Every access takes the single lock, so a frame run through
/// [`SharedRegistry::tick`] or [`SharedRegistry::update`] has exclusive use of
/// the registry for its whole duration.
#[derive(Clone, Default)]
pub struct SharedRegistry {
    inner: Arc<Mutex<Registry>>,
}

impl SharedRegistry {
    pub fn new(registry: Registry) -> Self {
        Self {
            inner: Arc::new(Mutex::new(registry)),
        }
    }

    /// Lock the registry until the guard is dropped.
    pub fn lock(&self) -> MutexGuard<'_, Registry> {
        self.inner.lock()
    }

    /// Run `f` with exclusive access to the registry.
    pub fn with<R>(&self, f: impl FnOnce(&mut Registry) -> R) -> R {
        f(&mut *self.inner.lock())
    }

    /// Run one frame of systems under the lock.
    pub fn update(&self) {
        self.inner.lock().update();
    }

    /// Advance the clock and run one frame under the lock.
    pub fn tick(&self, raw_delta: f32) {
        self.inner.lock().tick(raw_delta);
    }

    /// Recover the registry if this is the last handle.
    pub fn into_inner(self) -> Option<Registry> {
        Arc::try_unwrap(self.inner).ok().map(Mutex::into_inner)
    }
}
