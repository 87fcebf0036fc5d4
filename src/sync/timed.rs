//! Deadline-bounded shared acquire
//!
//! POSIX `pthread_rwlock_timedrdlock` semantics over the kernel's blocking
//! rwlock: try immediately, and only if that fails compute the remaining time
//! and block once. A lock that can be taken immediately is never reported as
//! timed out, no matter how stale the deadline is, and a success is never
//! re-checked against the clock afterwards.

use crate::platform::traits::ClockInterface;

use super::rwlock::{BlockingRwLock, CallStatus, WaitError};

pub const NANOS_PER_SEC: u32 = 1_000_000_000;

/// Absolute deadline for a timed acquire: seconds and nanoseconds against the
/// same epoch as the wall-clock source. Valid only while
/// `nanoseconds < 1_000_000_000`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Deadline {
    pub seconds: i64,
    pub nanoseconds: u32,
}

impl Deadline {
    pub const fn new(seconds: i64, nanoseconds: u32) -> Self {
        Self {
            seconds,
            nanoseconds,
        }
    }
}

/// Failure cause of a timed acquire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AcquireError {
    /// Lock or deadline handle was absent.
    Fault,
    /// Deadline nanoseconds out of range.
    InvalidArgument,
    /// The blocking primitive failed for a reason other than timing out.
    Underlying(WaitError),
}

/// Outcome of a timed acquire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AcquireOutcome {
    /// Shared hold taken; the caller owns a read lock.
    Acquired,
    /// The lock stayed unavailable for the full allotted time.
    TimedOut,
    /// The acquire failed without consuming the allotted time.
    Error(AcquireError),
}

/// Milliseconds from `now` to `deadline`, truncated toward zero.
///
/// Truncation is safe here: the immediate try-acquire has already handled the
/// only case where a sub-millisecond remainder could matter.
fn remaining_ms<C: ClockInterface>(deadline: &Deadline, clock: &C) -> i64 {
    let now = clock.now();
    (deadline.seconds - now.seconds).saturating_mul(1000)
        + deadline.nanoseconds as i64 / 1_000_000
        - now.nanoseconds as i64 / 1_000_000
}

/// Acquire a shared hold on `lock` no later than `deadline`.
///
/// Mirrors `pthread_rwlock_timedrdlock`:
///
/// 1. Absent handles fail with [`AcquireError::Fault`], an out-of-range
///    nanosecond field with [`AcquireError::InvalidArgument`], both before
///    the lock is touched.
/// 2. A non-blocking try-acquire runs first. If it succeeds the call returns
///    [`AcquireOutcome::Acquired`] even when `deadline` already passed.
/// 3. Otherwise the remaining time is computed once; if none is left the
///    call returns [`AcquireOutcome::TimedOut`] without blocking.
/// 4. Exactly one blocking timed wait is issued for the remaining time, and
///    its outcome is translated without retrying.
///
/// The ambient `status` channel is saved before the speculative try-acquire
/// and restored on every path that reaches it, so a failed probe leaves no
/// externally visible trace. Lock state changes only on `Acquired`.
pub fn timed_read_acquire<L, C>(
    lock: Option<&L>,
    deadline: Option<&Deadline>,
    clock: &C,
    status: &CallStatus,
) -> AcquireOutcome
where
    L: BlockingRwLock,
    C: ClockInterface,
{
    let (lock, deadline) = match (lock, deadline) {
        (Some(lock), Some(deadline)) => (lock, deadline),
        _ => return AcquireOutcome::Error(AcquireError::Fault),
    };

    if deadline.nanoseconds >= NANOS_PER_SEC {
        return AcquireOutcome::Error(AcquireError::InvalidArgument);
    }

    let saved = status.get();

    if lock.try_read(status) {
        return AcquireOutcome::Acquired;
    }

    let remaining = remaining_ms(deadline, clock);
    if remaining <= 0 {
        status.restore(saved);
        return AcquireOutcome::TimedOut;
    }

    let waited = lock.read_timed(remaining, status);
    status.restore(saved);

    match waited {
        Ok(()) => AcquireOutcome::Acquired,
        Err(WaitError::TimedOut) => AcquireOutcome::TimedOut,
        Err(cause) => AcquireOutcome::Error(AcquireError::Underlying(cause)),
    }
}
