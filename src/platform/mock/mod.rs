//! Mock platform implementations for hardware-free testing

pub mod clock;
pub mod wdt;

pub use clock::MockClock;
pub use wdt::MockWdt;
