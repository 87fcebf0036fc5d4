//! Mock WDT register bank for testing
//!
//! Models the watchdog timer unit at the register level: an 8-bit counter, an
//! 8-bit control/status register, the key-byte write protocol and the
//! interrupt-priority field. Writes carrying the wrong key byte are dropped
//! and recorded, so protocol violations surface in tests instead of silently
//! corrupting state.

use heapless::Vec;

use crate::platform::traits::{WdtInterface, Wtcsr};

/// Register offsets within the WDT block.
pub const WTCNT_OFFSET: usize = 0x0;
pub const WTCSR_OFFSET: usize = 0x4;

/// Key bytes required in the upper half of every 16-bit register write.
pub const WTCNT_KEY: u8 = 0x5A;
pub const WTCSR_KEY: u8 = 0xA5;

/// Mock WDT implementation
///
/// Backs the [`WdtInterface`] trait with plain state plus enough bookkeeping
/// to assert on the driver's register protocol: attached vector, IRQ priority
/// field, and any writes rejected for a bad key byte.
#[derive(Debug, Default)]
pub struct MockWdt {
    wtcnt: u8,
    wtcsr: u8,
    /// WDT field of the interrupt-priority register (0 = masked).
    irq_priority: u8,
    vector_attached: bool,
    /// Writes dropped because the key byte did not match: (offset, raw word).
    rejected_writes: Vec<(usize, u16), 8>,
}

impl MockWdt {
    /// Create a new mock WDT with all registers cleared and the IRQ masked.
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw 16-bit register write, exactly as the hardware sees it.
    ///
    /// The upper byte must carry the key for the addressed register; writes
    /// with a wrong key are ignored and recorded.
    pub fn raw_write16(&mut self, offset: usize, word: u16) {
        let key = (word >> 8) as u8;
        let value = word as u8;
        match offset {
            WTCNT_OFFSET if key == WTCNT_KEY => self.wtcnt = value,
            WTCSR_OFFSET if key == WTCSR_KEY => self.wtcsr = value,
            _ => {
                // Full journal is a test bug, not a driver bug
                let _ = self.rejected_writes.push((offset, word));
            }
        }
    }

    /// Raw 8-bit register read.
    pub fn raw_read8(&self, offset: usize) -> u8 {
        match offset {
            WTCNT_OFFSET => self.wtcnt,
            WTCSR_OFFSET => self.wtcsr,
            _ => 0,
        }
    }

    /// Simulate the hardware raising the interval-overflow status flag, as it
    /// does on every counter overflow in interval-timer mode.
    pub fn raise_interval_overflow(&mut self) {
        self.wtcsr |= Wtcsr::INTERVAL_OVERFLOW.bits();
    }

    /// Whether the overflow vector has been installed.
    pub fn vector_attached(&self) -> bool {
        self.vector_attached
    }

    /// Current priority of the overflow interrupt (0 = masked).
    pub fn irq_priority(&self) -> u8 {
        self.irq_priority
    }

    /// Writes rejected for carrying a wrong key byte.
    pub fn rejected_writes(&self) -> &[(usize, u16)] {
        &self.rejected_writes
    }
}

impl WdtInterface for MockWdt {
    fn read_counter(&self) -> u8 {
        self.raw_read8(WTCNT_OFFSET)
    }

    fn write_counter(&mut self, value: u8) {
        self.raw_write16(WTCNT_OFFSET, ((WTCNT_KEY as u16) << 8) | value as u16);
    }

    fn read_control(&self) -> Wtcsr {
        Wtcsr::from_bits_retain(self.raw_read8(WTCSR_OFFSET))
    }

    fn write_control(&mut self, value: Wtcsr) {
        self.raw_write16(WTCSR_OFFSET, ((WTCSR_KEY as u16) << 8) | value.bits() as u16);
    }

    fn attach_overflow_vector(&mut self) {
        self.vector_attached = true;
    }

    fn unmask_overflow_irq(&mut self) {
        self.irq_priority = 5;
    }

    fn mask_overflow_irq(&mut self) {
        self.irq_priority = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keyed_write_reaches_register() {
        let mut wdt = MockWdt::new();
        wdt.raw_write16(WTCNT_OFFSET, 0x5A7F);
        assert_eq!(wdt.read_counter(), 0x7F);
        assert!(wdt.rejected_writes().is_empty());
    }

    #[test]
    fn wrong_key_write_is_dropped_and_recorded() {
        let mut wdt = MockWdt::new();
        wdt.raw_write16(WTCNT_OFFSET, 0xA57F); // control key on the counter
        assert_eq!(wdt.read_counter(), 0);
        assert_eq!(wdt.rejected_writes(), &[(WTCNT_OFFSET, 0xA57F)]);
    }

    #[test]
    fn control_write_uses_its_own_key() {
        let mut wdt = MockWdt::new();
        wdt.write_control(Wtcsr::ENABLE.with_divider_bits(0b011));
        assert_eq!(wdt.raw_read8(WTCSR_OFFSET), 0x83);
        assert!(wdt.rejected_writes().is_empty());
    }

    #[test]
    fn counter_roundtrips_full_byte_range() {
        let mut wdt = MockWdt::new();
        for value in 0..=255u8 {
            wdt.write_counter(value);
            assert_eq!(wdt.read_counter(), value);
        }
    }

    #[test]
    fn irq_mask_bookkeeping() {
        let mut wdt = MockWdt::new();
        assert_eq!(wdt.irq_priority(), 0);
        wdt.unmask_overflow_irq();
        assert_eq!(wdt.irq_priority(), 5);
        wdt.mask_overflow_irq();
        assert_eq!(wdt.irq_priority(), 0);
    }
}
