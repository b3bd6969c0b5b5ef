//! Synchronization primitives shared by the list, its views and cursors.
//!
//! Every type that crosses a thread boundary is imported from here so that
//! the atomic cell and the writer lock can be swapped in a single place.
//! Building with `--cfg shuttle` replaces both with versions that route
//! every access through shuttle's scheduler.
pub(crate) use std::sync::Arc;

#[cfg(not(shuttle))]
pub(crate) use arc_swap::{ArcSwap, Guard};
#[cfg(not(shuttle))]
pub(crate) use parking_lot::{ReentrantMutex, ReentrantMutexGuard};

#[cfg(shuttle)]
mod scheduled;
#[cfg(shuttle)]
pub(crate) use scheduled::{ArcSwap, Guard, ReentrantMutex, ReentrantMutexGuard};

/// Lets the scheduler run other threads between a writer loading the live
/// snapshot and publishing its replacement.
#[cfg(shuttle)]
pub(crate) fn yield_point() {
    shuttle::thread::yield_now();
}

#[cfg(not(shuttle))]
#[inline(always)]
pub(crate) fn yield_point() {}
