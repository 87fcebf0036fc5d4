//! Wall-clock interface
//!
//! The timed lock operations measure remaining time against an absolute
//! deadline, so they need a wall-clock source sharing the deadline's epoch.
//! On the target this is backed by the kernel's RTC-derived clock; tests use
//! a settable mock.

/// An absolute point in time: seconds and nanoseconds since the epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Timespec {
    pub seconds: i64,
    pub nanoseconds: u32,
}

impl Timespec {
    pub const fn new(seconds: i64, nanoseconds: u32) -> Self {
        Self {
            seconds,
            nanoseconds,
        }
    }
}

/// Wall-clock source.
pub trait ClockInterface {
    /// Current wall-clock time.
    fn now(&self) -> Timespec;
}
