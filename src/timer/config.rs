//! Timer configuration types

/// Clock divider selection for the WDT input clock.
///
/// Each step doubles the duration of one counter tick, from roughly 41us at
/// `Div32` up to roughly 5.25ms at `Div4096`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum ClockDivider {
    Div32 = 0,
    Div64 = 1,
    Div128 = 2,
    Div256 = 3,
    Div512 = 4,
    Div1024 = 5,
    Div2048 = 6,
    Div4096 = 7,
}

impl ClockDivider {
    /// Duration of one counter tick in microseconds.
    pub const fn tick_period_us(self) -> u32 {
        41 << (self as u32)
    }

    /// The 3-bit CKS field value for this divider.
    pub const fn bits(self) -> u8 {
        self as u8
    }
}

/// Reset kind triggered by a watchdog overflow.
///
/// Only meaningful in watchdog mode; ignored by the interval timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ResetSelect {
    /// Overflow triggers a power-on reset.
    PowerOn,
    /// Overflow triggers a manual reset.
    Manual,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tick_periods_double_per_level() {
        let levels = [
            (ClockDivider::Div32, 41),
            (ClockDivider::Div64, 82),
            (ClockDivider::Div128, 164),
            (ClockDivider::Div256, 328),
            (ClockDivider::Div512, 656),
            (ClockDivider::Div1024, 1312),
            (ClockDivider::Div2048, 2624),
            (ClockDivider::Div4096, 5248),
        ];
        for (div, period) in levels {
            assert_eq!(div.tick_period_us(), period);
        }
    }

    #[test]
    fn cks_bits_match_hardware_encoding() {
        assert_eq!(ClockDivider::Div32.bits(), 0);
        assert_eq!(ClockDivider::Div4096.bits(), 7);
    }
}
