//! Watchdog/interval timer driver
//!
//! The hardware unit runs in one of two mutually exclusive modes: watchdog
//! (counter overflow triggers a hardware reset with no software involvement)
//! or interval timer (counter overflow raises an interrupt, and the ISR
//! accumulates ticks into a microsecond period before firing a user
//! callback). Switching modes requires passing through the disabled state.

pub mod config;
pub mod driver;

#[cfg(feature = "sh4")]
pub mod global;

pub use config::{ClockDivider, ResetSelect};
pub use driver::WdtDriver;

use core::ffi::c_void;

/// Witness that the current code runs in interrupt context.
///
/// The overflow ISR and the user callback both receive a reference to this
/// token. It cannot be constructed by ordinary code, which keeps
/// interrupt-only entry points from being called from thread context by
/// accident. Code holding an `IsrContext` must not block, allocate, or
/// re-enter the driver's configuration operations.
pub struct IsrContext {
    _private: (),
}

impl IsrContext {
    /// Conjure an interrupt-context witness.
    ///
    /// # Safety
    ///
    /// Must only be called on an interrupt entry path, before dispatching
    /// into driver ISR logic.
    pub unsafe fn steal() -> Self {
        Self { _private: () }
    }

    /// Simulated interrupt context for host tests injecting ticks.
    #[cfg(any(test, feature = "mock"))]
    pub fn simulated() -> Self {
        Self { _private: () }
    }
}

/// User callback fired from the interval-timer ISR.
///
/// Runs in interrupt context with equal/lower-priority interrupts held off:
/// it must not block, allocate, or call back into the driver's `enable_*` /
/// `disable` operations. The opaque pointer is the `user_data` value passed
/// to [`WdtDriver::enable_timer`], never dereferenced by the driver itself.
pub type WdtCallback = fn(&IsrContext, *mut c_void);
