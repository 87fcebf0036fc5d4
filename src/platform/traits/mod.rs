//! Platform abstraction traits
//!
//! This module defines the traits that platform backends must provide.

pub mod clock;
pub mod wdt;

// Re-export trait interfaces
pub use clock::{ClockInterface, Timespec};
pub use wdt::{WdtInterface, Wtcsr};
