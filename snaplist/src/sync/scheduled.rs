//! Stand-ins for `arc_swap::ArcSwap` and `parking_lot::ReentrantMutex`
//! built on shuttle's primitives.
use std::ops::Deref;
use std::sync::{Arc, PoisonError};

use shuttle::sync::{Mutex, MutexGuard, RwLock};
use shuttle::thread::{self, ThreadId};

/// An atomically replaceable `Arc`. Every load and store is a scheduling
/// point.
pub(crate) struct ArcSwap<T> {
    cell: RwLock<Arc<T>>,
}

/// A loaded value, dereferencing the way `arc_swap::Guard` does.
pub(crate) struct Guard<T>(T);

impl<T> Deref for Guard<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.0
    }
}

impl<T> ArcSwap<T> {
    pub(crate) fn new(value: Arc<T>) -> Self {
        Self {
            cell: RwLock::new(value),
        }
    }

    pub(crate) fn load(&self) -> Guard<Arc<T>> {
        Guard(self.load_full())
    }

    pub(crate) fn load_full(&self) -> Arc<T> {
        let current = self.cell.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&current)
    }

    pub(crate) fn store(&self, value: Arc<T>) {
        *self.cell.write().unwrap_or_else(PoisonError::into_inner) = value;
    }
}

/// A mutex that the thread holding it may lock again.
///
/// The outermost acquisition holds the underlying shuttle mutex; nested
/// acquisitions by the owner only bump `count`.
pub(crate) struct ReentrantMutex<T> {
    lock: Mutex<()>,
    owner: Mutex<Option<(ThreadId, usize)>>,
    data: T,
}

pub(crate) struct ReentrantMutexGuard<'a, T> {
    mutex: &'a ReentrantMutex<T>,
    _held: Option<MutexGuard<'a, ()>>,
}

impl<T> ReentrantMutex<T> {
    pub(crate) fn new(data: T) -> Self {
        Self {
            lock: Mutex::new(()),
            owner: Mutex::new(None),
            data,
        }
    }

    pub(crate) fn lock(&self) -> ReentrantMutexGuard<'_, T> {
        let me = thread::current().id();
        if let Some((owner, count)) = self.owner().as_mut() {
            if *owner == me {
                *count += 1;
                return ReentrantMutexGuard {
                    mutex: self,
                    _held: None,
                };
            }
        }
        let held = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        *self.owner() = Some((me, 1));
        ReentrantMutexGuard {
            mutex: self,
            _held: Some(held),
        }
    }

    fn owner(&self) -> MutexGuard<'_, Option<(ThreadId, usize)>> {
        self.owner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<T> Deref for ReentrantMutexGuard<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.mutex.data
    }
}

impl<T> Drop for ReentrantMutexGuard<'_, T> {
    // Runs before `_held` is dropped, so ownership is cleared before the
    // underlying mutex is released.
    fn drop(&mut self) {
        let mut owner = self.mutex.owner();
        if let Some((_, count)) = owner.as_mut() {
            *count -= 1;
            if *count == 0 {
                *owner = None;
            }
        }
    }
}
