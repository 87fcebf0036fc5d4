//! Timed synchronization operations
//!
//! The blocking read/write lock itself lives elsewhere in the kernel; this
//! module specifies the contract the timing core needs from it and builds
//! the deadline-aware shared acquire on top.

pub mod rwlock;
pub mod timed;

pub use rwlock::{BlockingRwLock, CallStatus, WaitError};
pub use timed::{timed_read_acquire, AcquireError, AcquireOutcome, Deadline};

#[cfg(any(test, feature = "mock"))]
pub use rwlock::MockRwLock;
