//! The problem-scoped fault record and the lock that guards it.
//!
//! [`ExceptionRecord`] is the flag + message slot a problem owns.
//! [`ExceptionLock`] serializes message construction and recording
//! across workers. Both are owned by the problem and borrowed by loops.

use parking_lot::{Mutex, MutexGuard};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

/// Lock dedicated to fault recording.
///
/// Backed by `parking_lot::Mutex`, which spins briefly before parking.
/// It is never shared with the thread pool, so a worker that faults while
/// the scheduler holds its own internal locks cannot deadlock on it.
#[derive(Debug, Default)]
pub struct ExceptionLock {
    inner: Mutex<()>,
}

/// RAII guard for [`ExceptionLock`]. Releases on drop, including during
/// unwinding.
pub type ExceptionGuard<'a> = MutexGuard<'a, ()>;

impl ExceptionLock {
    /// A new, unlocked lock.
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquire the lock, blocking until it is available.
    pub fn lock(&self) -> ExceptionGuard<'_> {
        self.inner.lock()
    }

    /// Returns `true` if some thread currently holds the lock.
    pub fn is_locked(&self) -> bool {
        self.inner.is_locked()
    }
}

/// Problem-scoped fault flag and message.
///
/// First writer wins: the first [`record()`](Self::record) after a
/// [`clear()`](Self::clear) stores its message and raises the flag; later
/// calls are counted and dropped. The flag is an atomic so that
/// `keep_going` checks never contend on the message mutex.
#[derive(Debug, Default)]
pub struct ExceptionRecord {
    flag: AtomicBool,
    message: Mutex<Option<String>>,
    suppressed: AtomicUsize,
}

impl ExceptionRecord {
    /// An empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a fault has been recorded since the last clear.
    pub fn is_set(&self) -> bool {
        self.flag.load(Ordering::Acquire)
    }

    /// Record a fault. Returns `true` if this call stored the message,
    /// `false` if an earlier fault already occupies the slot.
    ///
    /// Does no logging: callers log the outcome after releasing their
    /// own locks.
    pub fn record(&self, message: String) -> bool {
        let mut slot = self.message.lock();
        if slot.is_some() {
            self.suppressed.fetch_add(1, Ordering::Relaxed);
            return false;
        }
        *slot = Some(message);
        self.flag.store(true, Ordering::Release);
        true
    }

    /// The recorded message, if any.
    pub fn message(&self) -> Option<String> {
        self.message.lock().clone()
    }

    /// Number of faults dropped because the slot was already occupied.
    pub fn suppressed(&self) -> usize {
        self.suppressed.load(Ordering::Relaxed)
    }

    /// Reset the record for the next traversal.
    pub fn clear(&self) {
        let mut slot = self.message.lock();
        *slot = None;
        self.flag.store(false, Ordering::Release);
        self.suppressed.store(0, Ordering::Relaxed);
    }
}
