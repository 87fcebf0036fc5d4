//! Static ISR context and the kernel-facing WDT API
//!
//! Interrupt vectors cannot carry closures, so the active driver lives in a
//! statically known slot shared between these configuration entry points and
//! the overflow trampoline. Nothing locks the slot: the ISR must not block,
//! so the protection is the documented discipline that configuration calls
//! only run while the timer is disabled (overflow interrupt masked).

use core::cell::UnsafeCell;
use core::ffi::c_void;

use crate::platform::sh4::Sh4Wdt;

use super::{ClockDivider, IsrContext, ResetSelect, WdtCallback, WdtDriver};

struct IsrShared<T>(UnsafeCell<T>);

// SAFETY: single core. Non-ISR code touches the slot only while the overflow
// interrupt is masked or the timer is disabled; the ISR has it to itself
// while it runs.
unsafe impl<T> Sync for IsrShared<T> {}

static CONTEXT: IsrShared<Option<WdtDriver<Sh4Wdt>>> = IsrShared(UnsafeCell::new(None));

fn with_driver<R>(f: impl FnOnce(&mut WdtDriver<Sh4Wdt>) -> R) -> R {
    // SAFETY: see IsrShared
    let slot = unsafe { &mut *CONTEXT.0.get() };
    let driver = slot.get_or_insert_with(|| {
        // SAFETY: this slot is the only place a Sh4Wdt is ever constructed
        WdtDriver::new(unsafe { Sh4Wdt::new(wdt_overflow_isr) })
    });
    f(driver)
}

/// Overflow trampoline, installed at the WDT interval-timer vector by
/// `enable_timer`.
#[no_mangle]
pub extern "C" fn wdt_overflow_isr() {
    // SAFETY: entered from the interrupt vector
    let cx = unsafe { IsrContext::steal() };
    // SAFETY: see IsrShared
    if let Some(driver) = unsafe { (*CONTEXT.0.get()).as_mut() } {
        driver.on_overflow(&cx);
    }
}

/// Arm the WDT as a software interval timer. See [`WdtDriver::enable_timer`].
pub fn enable_timer(
    initial_count: u8,
    period_us: u32,
    callback: WdtCallback,
    user_data: *mut c_void,
) {
    with_driver(|driver| driver.enable_timer(initial_count, period_us, callback, user_data));
}

/// Arm the WDT as a watchdog. See [`WdtDriver::enable_watchdog`].
pub fn enable_watchdog(initial_count: u8, divider: ClockDivider, reset_select: ResetSelect) {
    with_driver(|driver| driver.enable_watchdog(initial_count, divider, reset_select));
}

/// Read the running counter.
pub fn get_counter() -> u8 {
    with_driver(|driver| driver.get_counter())
}

/// Write the running counter.
pub fn set_counter(value: u8) {
    with_driver(|driver| driver.set_counter(value));
}

/// Reset the counter, holding off an imminent watchdog overflow.
pub fn pet() {
    with_driver(|driver| driver.pet());
}

/// Stop the timer. Idempotent.
pub fn disable() {
    with_driver(|driver| driver.disable());
}

/// Read back the enable bit.
pub fn is_enabled() -> bool {
    with_driver(|driver| driver.is_enabled())
}
