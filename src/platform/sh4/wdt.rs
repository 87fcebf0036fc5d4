//! SH4 WDT register backend
//!
//! Memory-mapped implementation of [`WdtInterface`] for the SH4 watchdog
//! timer unit. Every register write is a 16-bit transaction whose upper byte
//! carries a fixed key (0x5A for WTCNT, 0xA5 for WTCSR); writes without the
//! key are ignored by the hardware. Reads return the low 8 bits only.

use crate::platform::traits::{WdtInterface, Wtcsr};

const WDT_BASE: usize = 0xffc0_0008;
const WTCNT: usize = WDT_BASE;
const WTCSR: usize = WDT_BASE + 0x4;

const WTCNT_KEY: u16 = 0x5A00;
const WTCSR_KEY: u16 = 0xA500;

/// Interrupt-priority register B; the WDT field sits at bits 14-12.
const IPRB: usize = 0xffd0_0008;
const IPRB_WDT_SHIFT: u16 = 12;
const WDT_IRQ_PRIORITY: u16 = 5;

/// SH4 INTEVT code for the WDT interval-timer interrupt.
const EXC_WDT_ITI: u32 = 0x560;

extern "C" {
    /// Kernel interrupt dispatcher: route interrupt `event` to `handler`.
    fn irq_install_handler(event: u32, handler: unsafe extern "C" fn());
}

fn read8(addr: usize) -> u8 {
    unsafe { (addr as *const u8).read_volatile() }
}

fn read16(addr: usize) -> u16 {
    unsafe { (addr as *const u16).read_volatile() }
}

fn write16(addr: usize, value: u16) {
    unsafe { (addr as *mut u16).write_volatile(value) }
}

/// SH4 WDT implementation
///
/// Owns the hardware unit; the overflow handler passed at construction is
/// what [`WdtInterface::attach_overflow_vector`] installs at the
/// interval-timer vector.
pub struct Sh4Wdt {
    overflow_handler: unsafe extern "C" fn(),
}

impl Sh4Wdt {
    /// Claim the WDT unit.
    ///
    /// # Safety
    ///
    /// At most one instance may exist: the registers are process-global and
    /// two owners would clobber each other's mode configuration.
    pub unsafe fn new(overflow_handler: unsafe extern "C" fn()) -> Self {
        Self { overflow_handler }
    }
}

impl WdtInterface for Sh4Wdt {
    fn read_counter(&self) -> u8 {
        read8(WTCNT)
    }

    fn write_counter(&mut self, value: u8) {
        write16(WTCNT, WTCNT_KEY | value as u16);
    }

    fn read_control(&self) -> Wtcsr {
        Wtcsr::from_bits_retain(read8(WTCSR))
    }

    fn write_control(&mut self, value: Wtcsr) {
        write16(WTCSR, WTCSR_KEY | value.bits() as u16);
    }

    fn attach_overflow_vector(&mut self) {
        unsafe { irq_install_handler(EXC_WDT_ITI, self.overflow_handler) };
    }

    fn unmask_overflow_irq(&mut self) {
        write16(IPRB, read16(IPRB) | (WDT_IRQ_PRIORITY << IPRB_WDT_SHIFT));
    }

    fn mask_overflow_irq(&mut self) {
        write16(IPRB, read16(IPRB) & !(0b111 << IPRB_WDT_SHIFT));
    }
}
