//! WDT register interface
//!
//! The SH4 watchdog timer unit exposes two registers, a free-running 8-bit
//! counter (WTCNT) and a control/status register (WTCSR), plus one field in
//! the interrupt-priority controller that masks the overflow interrupt. This
//! trait models exactly that surface so the driver can run against the real
//! memory-mapped unit or a mock register bank.
//!
//! The key-byte write protocol (every write is a 16-bit transaction whose
//! upper byte must carry a fixed key) is a property of the bus, not of the
//! driver, and is hidden behind this trait.

use bitflags::bitflags;

bitflags! {
    /// WTCSR control/status register layout.
    ///
    /// Bits 2-0 select the clock divider and are accessed through
    /// [`Wtcsr::divider_bits`] / [`Wtcsr::with_divider_bits`] rather than as
    /// individual flags.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Wtcsr: u8 {
        /// Timer enable (TME).
        const ENABLE = 1 << 7;
        /// Mode select (WT/IT): set for watchdog mode, clear for interval timer.
        const WATCHDOG_MODE = 1 << 6;
        /// Reset select (RSTS): set for manual reset, clear for power-on reset.
        /// Meaningful only in watchdog mode.
        const RESET_MANUAL = 1 << 5;
        /// Watchdog overflow status flag (WOVF).
        const WATCHDOG_OVERFLOW = 1 << 4;
        /// Interval timer overflow status flag (IOVF). Must be cleared by the
        /// ISR to acknowledge the interrupt.
        const INTERVAL_OVERFLOW = 1 << 3;
        /// Clock divider select field (CKS2-CKS0).
        const DIVIDER = 0b111;
    }
}

impl Wtcsr {
    /// Read the 3-bit clock divider field.
    pub const fn divider_bits(self) -> u8 {
        self.bits() & 0b111
    }

    /// Replace the 3-bit clock divider field, leaving the other bits intact.
    pub const fn with_divider_bits(self, bits: u8) -> Self {
        Self::from_bits_retain((self.bits() & !0b111) | (bits & 0b111))
    }
}

/// Register-level interface to the watchdog timer unit.
///
/// Implementations provide the raw register transactions; the driver layers
/// mode selection and ISR bookkeeping on top. Reads return the low 8 bits of
/// the register, writes go through the platform's key-guarded protocol.
pub trait WdtInterface {
    /// Read the running counter (WTCNT).
    fn read_counter(&self) -> u8;

    /// Write the counter (WTCNT).
    fn write_counter(&mut self, value: u8);

    /// Read the control/status register (WTCSR).
    fn read_control(&self) -> Wtcsr;

    /// Write the control/status register (WTCSR).
    fn write_control(&mut self, value: Wtcsr);

    /// Install the overflow ISR at the interval-timer interrupt vector.
    fn attach_overflow_vector(&mut self);

    /// Unmask the overflow interrupt at the priority controller.
    fn unmask_overflow_irq(&mut self);

    /// Mask the overflow interrupt at the priority controller.
    fn mask_overflow_irq(&mut self);
}
