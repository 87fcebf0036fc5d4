//! Mock wall clock for testing

use core::cell::Cell;

use crate::platform::traits::{ClockInterface, Timespec};

/// Mock wall clock with a settable current time.
///
/// Interior mutability lets tests advance the clock while lock operations
/// hold a shared reference to it.
#[derive(Debug)]
pub struct MockClock {
    now: Cell<Timespec>,
}

impl MockClock {
    /// Create a clock reading the given time.
    pub fn at(seconds: i64, nanoseconds: u32) -> Self {
        Self {
            now: Cell::new(Timespec::new(seconds, nanoseconds)),
        }
    }

    /// Set the current time.
    pub fn set(&self, seconds: i64, nanoseconds: u32) {
        self.now.set(Timespec::new(seconds, nanoseconds));
    }

    /// Advance the clock by whole milliseconds.
    pub fn advance_ms(&self, ms: u32) {
        let t = self.now.get();
        let mut nanos = t.nanoseconds as u64 + ms as u64 * 1_000_000;
        let mut secs = t.seconds;
        while nanos >= 1_000_000_000 {
            nanos -= 1_000_000_000;
            secs += 1;
        }
        self.now.set(Timespec::new(secs, nanos as u32));
    }
}

impl Default for MockClock {
    fn default() -> Self {
        Self::at(0, 0)
    }
}

impl ClockInterface for MockClock {
    fn now(&self) -> Timespec {
        self.now.get()
    }
}
