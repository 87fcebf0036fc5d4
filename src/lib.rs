#![cfg_attr(not(test), no_std)]

//! sh4-timing - Timing and synchronization core for a small SH4 embedded kernel
//!
//! This library provides the watchdog/interval timer (WDT) driver and the
//! deadline-aware read-lock acquire operation used by the rest of the kernel.
//! All hardware access goes through the platform abstraction so the timer and
//! lock logic can be tested on the host against mock backends.

// Platform abstraction layer: register interfaces, wall clock, mock/SH4 backends
pub mod platform;

// Watchdog/interval timer driver
pub mod timer;

// Timed read/write lock acquisition
pub mod sync;

// Logging macros (defmt on target, println! in host tests)
pub mod core;
