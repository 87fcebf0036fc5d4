//! Blocking read/write lock contract
//!
//! The timing core does not implement the rwlock itself; it consumes the
//! blocking primitive the kernel provides. This module pins down the
//! interface contract the timed acquire path relies on: a non-blocking
//! try-acquire, a relative-timeout blocking acquire, and the ambient
//! call-status channel the primitive may clobber on failure.

use core::cell::Cell;
use core::fmt;

/// Failure reported by the blocking primitive's wait path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum WaitError {
    /// The timeout elapsed before the lock became available.
    TimedOut,
    /// The lock was destroyed while waiting on it.
    Destroyed,
    /// Waiting is not permitted in the current context (e.g. inside an ISR).
    BadContext,
}

impl fmt::Display for WaitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WaitError::TimedOut => write!(f, "wait timed out"),
            WaitError::Destroyed => write!(f, "lock destroyed while waiting"),
            WaitError::BadContext => write!(f, "blocking wait in a non-blocking context"),
        }
    }
}

/// Ambient per-thread call-status channel, the kernel's errno analogue.
///
/// Lock operations may record their failure cause here as a side effect.
/// Callers that probe a lock speculatively save and restore the channel so
/// the probe stays invisible; see `timed_read_acquire`.
#[derive(Debug, Default)]
pub struct CallStatus {
    last: Cell<Option<WaitError>>,
}

impl CallStatus {
    pub const fn new() -> Self {
        Self {
            last: Cell::new(None),
        }
    }

    /// Read the current status without clearing it.
    pub fn get(&self) -> Option<WaitError> {
        self.last.get()
    }

    /// Record a failure cause.
    pub fn set(&self, cause: WaitError) {
        self.last.set(Some(cause));
    }

    /// Overwrite the channel with a previously saved value.
    pub fn restore(&self, saved: Option<WaitError>) {
        self.last.set(saved);
    }
}

/// Counting read/write lock with a timed blocking acquire.
///
/// Many shared holders or one exclusive holder. Ordering among waiters is
/// the implementation's business; nothing here assumes reader or writer
/// preference.
pub trait BlockingRwLock {
    /// Non-blocking shared acquire. Returns `true` and takes a read hold if
    /// the lock is immediately available. On failure the implementation may
    /// clobber `status` with the cause.
    fn try_read(&self, status: &CallStatus) -> bool;

    /// Blocking shared acquire, waiting at most `timeout_ms` milliseconds.
    /// The calling thread suspends until the hold is granted, the timeout
    /// elapses, or the primitive fails.
    fn read_timed(&self, timeout_ms: i64, status: &CallStatus) -> Result<(), WaitError>;
}

/// Mock rwlock with scripted behavior for host tests.
///
/// No real blocking happens; a scripted writer release models "the lock
/// became available after waiting this long".
#[cfg(any(test, feature = "mock"))]
#[derive(Debug, Default)]
pub struct MockRwLock {
    write_held: Cell<bool>,
    readers: Cell<u32>,
    /// Writer releases after this many ms of blocking, if it fits the timeout.
    release_after_ms: Cell<Option<i64>>,
    /// Force every wait to fail with this error.
    wait_failure: Cell<Option<WaitError>>,
    try_read_calls: Cell<u32>,
    timed_wait_calls: Cell<u32>,
}

#[cfg(any(test, feature = "mock"))]
impl MockRwLock {
    /// A free lock.
    pub fn unlocked() -> Self {
        Self::default()
    }

    /// A lock held exclusively by a writer that never releases.
    pub fn write_locked() -> Self {
        let lock = Self::default();
        lock.write_held.set(true);
        lock
    }

    /// Script the writer to release after `ms` milliseconds of blocking.
    pub fn release_write_after_ms(&self, ms: i64) {
        self.release_after_ms.set(Some(ms));
    }

    /// Force timed waits to fail with `cause` instead of waiting.
    pub fn fail_waits_with(&self, cause: WaitError) {
        self.wait_failure.set(Some(cause));
    }

    /// Number of shared holds currently outstanding.
    pub fn reader_count(&self) -> u32 {
        self.readers.get()
    }

    pub fn try_read_calls(&self) -> u32 {
        self.try_read_calls.get()
    }

    pub fn timed_wait_calls(&self) -> u32 {
        self.timed_wait_calls.get()
    }
}

#[cfg(any(test, feature = "mock"))]
impl BlockingRwLock for MockRwLock {
    fn try_read(&self, status: &CallStatus) -> bool {
        self.try_read_calls.set(self.try_read_calls.get() + 1);
        if self.write_held.get() {
            // Failure cause leaks into the ambient channel, as the real
            // primitive's internals may do
            status.set(WaitError::TimedOut);
            false
        } else {
            self.readers.set(self.readers.get() + 1);
            true
        }
    }

    fn read_timed(&self, timeout_ms: i64, status: &CallStatus) -> Result<(), WaitError> {
        self.timed_wait_calls.set(self.timed_wait_calls.get() + 1);
        if let Some(cause) = self.wait_failure.get() {
            status.set(cause);
            return Err(cause);
        }
        match self.release_after_ms.get() {
            Some(delay) if delay <= timeout_ms => {
                self.write_held.set(false);
                self.readers.set(self.readers.get() + 1);
                Ok(())
            }
            _ if !self.write_held.get() => {
                self.readers.set(self.readers.get() + 1);
                Ok(())
            }
            _ => {
                status.set(WaitError::TimedOut);
                Err(WaitError::TimedOut)
            }
        }
    }
}
