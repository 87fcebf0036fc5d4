//! SH4 platform implementation

pub mod wdt;

pub use wdt::Sh4Wdt;
