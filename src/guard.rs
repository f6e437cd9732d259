//! Access Guard
//!
//! Per-device mutual exclusion with cancellable acquisition.
//!
//! ## Model
//! - One lock per device; every structural operation (truncate-on-open, read,
//!   write, trim, introspection visit) holds it for its full duration
//! - Waiting can be abandoned through a [`CancelToken`]; the caller then gets
//!   `StoreError::Interrupted` and nothing was changed
//! - No internal timeout: a waiter that is never cancelled waits until the
//!   lock is free
//!
//! The guard also keeps counters ([`GuardStats`]) so tests and operators can
//! see contention and confirm critical sections never overlap.

use std::ops::{Deref, DerefMut};
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::{Mutex, MutexGuard};

use crate::error::{Result, StoreError};

// =============================================================================
// Cancellation
// =============================================================================

/// Shared cancellation flag observed while waiting for a lock
///
/// Clones share the same flag.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    /// Create a token that is not cancelled
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation of any wait observing this token
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    /// Whether cancellation has been requested
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }

    /// Clear a previous cancellation so the token can be reused
    pub fn reset(&self) {
        self.cancelled.store(false, Ordering::Release);
    }
}

// =============================================================================
// Statistics
// =============================================================================

/// Snapshot of a guard's counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GuardStats {
    /// Successful acquisitions
    pub acquisitions: u64,

    /// Acquisitions that had to wait
    pub contended: u64,

    /// Waits abandoned through cancellation
    pub interrupted: u64,

    /// Highest number of holders ever observed inside the critical section
    pub max_concurrent: usize,
}

#[derive(Debug, Default)]
struct Counters {
    acquisitions: AtomicU64,
    contended: AtomicU64,
    interrupted: AtomicU64,
    active: AtomicUsize,
    max_concurrent: AtomicUsize,
}

// =============================================================================
// Guard
// =============================================================================

/// Exclusive, cancellable lock around a value
#[derive(Debug)]
pub struct AccessGuard<T> {
    inner: Mutex<T>,
    poll_interval: Duration,
    counters: Counters,
}

impl<T> AccessGuard<T> {
    /// Wrap `value`; blocked waiters re-check cancellation every `poll_interval`
    pub fn new(value: T, poll_interval: Duration) -> Self {
        Self {
            inner: Mutex::new(value),
            poll_interval,
            counters: Counters::default(),
        }
    }

    /// Acquire the lock, or fail with `Interrupted` if `cancel` fires while waiting
    ///
    /// An uncontended lock is taken even if the token is already cancelled.
    pub fn lock(&self, cancel: &CancelToken) -> Result<Guarded<'_, T>> {
        if let Some(guard) = self.inner.try_lock() {
            return Ok(self.enter(guard));
        }

        self.counters.contended.fetch_add(1, Ordering::Relaxed);
        loop {
            if cancel.is_cancelled() {
                self.counters.interrupted.fetch_add(1, Ordering::Relaxed);
                return Err(StoreError::Interrupted);
            }
            if let Some(guard) = self.inner.try_lock_for(self.poll_interval) {
                return Ok(self.enter(guard));
            }
        }
    }

    /// Current counter values
    pub fn stats(&self) -> GuardStats {
        GuardStats {
            acquisitions: self.counters.acquisitions.load(Ordering::Relaxed),
            contended: self.counters.contended.load(Ordering::Relaxed),
            interrupted: self.counters.interrupted.load(Ordering::Relaxed),
            max_concurrent: self.counters.max_concurrent.load(Ordering::Relaxed),
        }
    }

    /// Acquire the lock, waiting as long as it takes
    ///
    /// For teardown paths that must not be abandoned.
    pub fn lock_blocking(&self) -> Guarded<'_, T> {
        match self.inner.try_lock() {
            Some(guard) => self.enter(guard),
            None => {
                self.counters.contended.fetch_add(1, Ordering::Relaxed);
                self.enter(self.inner.lock())
            }
        }
    }

    fn enter<'a>(&'a self, guard: MutexGuard<'a, T>) -> Guarded<'a, T> {
        self.counters.acquisitions.fetch_add(1, Ordering::Relaxed);
        let holders = self.counters.active.fetch_add(1, Ordering::AcqRel) + 1;
        self.counters.max_concurrent.fetch_max(holders, Ordering::AcqRel);
        Guarded {
            guard,
            active: &self.counters.active,
        }
    }
}

/// Held lock; releases on drop
pub struct Guarded<'a, T> {
    guard: MutexGuard<'a, T>,
    active: &'a AtomicUsize,
}

impl<T> Deref for Guarded<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.guard
    }
}

impl<T> DerefMut for Guarded<'_, T> {
    fn deref_mut(&mut self) -> &mut T {
        &mut self.guard
    }
}

impl<T> Drop for Guarded<'_, T> {
    fn drop(&mut self) {
        // Runs before `guard` is dropped, i.e. while the lock is still held
        self.active.fetch_sub(1, Ordering::AcqRel);
    }
}
