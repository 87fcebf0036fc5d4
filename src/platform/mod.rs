//! Platform abstraction layer
//!
//! This module provides hardware abstraction for the timing core. All
//! register-level and clock-source code is isolated here so that the timer
//! driver and the timed lock operations stay platform-independent and
//! host-testable.

pub mod traits;

// Platform implementations (feature-gated)
#[cfg(feature = "sh4")]
pub mod sh4;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

// Re-export commonly used types
pub use traits::{ClockInterface, Timespec, WdtInterface, Wtcsr};
