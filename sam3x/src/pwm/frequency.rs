//! Prescaler search for a requested frequency.
//!
//! Both searches walk the [prescaler ladder][Prescaler::LADDER] from the smallest
//! divider up, so the first hit keeps the largest period (finest duty resolution) or
//! the largest clock divisor. Results are truncated, no rounding is applied.

use super::channel::{Alignment, Prescaler};
use crate::error::{Error, Result};

/// Largest channel period.
pub const MAX_PERIOD: u32 = u16::MAX as u32;

/// Largest shared clock divisor.
pub const MAX_DIVISOR: u32 = u8::MAX as u32;

/// Channel prescaler and period producing a frequency.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PeriodResolution {
    pub prescaler: Prescaler,
    pub period: u16,
}

impl PeriodResolution {
    /// Output frequency actually produced.
    #[inline]
    pub fn frequency(&self, mck: u32, alignment: Alignment) -> u32 {
        let ticks =
            u64::from(self.period) * u64::from(self.prescaler.divider()) * u64::from(alignment.factor());
        (u64::from(mck) / ticks) as u32
    }
}

/// Shared clock prescaler and divisor producing a frequency.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DivisorResolution {
    pub prescaler: Prescaler,
    pub divisor: u8,
}

impl DivisorResolution {
    /// Clock frequency actually produced.
    #[inline]
    pub fn frequency(&self, mck: u32) -> u32 {
        mck / self.prescaler.divider() / u32::from(self.divisor)
    }
}

#[inline]
fn check(mck: u32, frequency: u32) -> Result<()> {
    if frequency == 0 {
        Err(Error::ZeroFrequency)
    } else if frequency > mck {
        Err(Error::FrequencyTooHigh(frequency))
    } else {
        Ok(())
    }
}

/// Channel prescaler and period for an output `frequency`.
///
/// `period = mck / (frequency * prescaler)`, halved for center alignment as the
/// counter covers the period twice per cycle.
pub fn resolve_period(mck: u32, frequency: u32, alignment: Alignment) -> Result<PeriodResolution> {
    check(mck, frequency)?;
    for &prescaler in Prescaler::LADDER.iter() {
        let ticks = u64::from(frequency)
            * u64::from(prescaler.divider())
            * u64::from(alignment.factor());
        let period = u64::from(mck) / ticks;
        if period <= u64::from(MAX_PERIOD) {
            if period == 0 {
                return Err(Error::FrequencyTooHigh(frequency));
            }
            return Ok(PeriodResolution {
                prescaler,
                period: period as u16,
            });
        }
    }
    Err(Error::NoPrescaler(frequency))
}

/// Shared clock prescaler and divisor for a clock `frequency`.
///
/// `divisor = (mck / prescaler) / frequency`.
pub fn resolve_divisor(mck: u32, frequency: u32) -> Result<DivisorResolution> {
    check(mck, frequency)?;
    for &prescaler in Prescaler::LADDER.iter() {
        let divisor = mck / prescaler.divider() / frequency;
        if divisor <= MAX_DIVISOR {
            if divisor == 0 {
                return Err(Error::FrequencyTooHigh(frequency));
            }
            return Ok(DivisorResolution {
                prescaler,
                divisor: divisor as u8,
            });
        }
    }
    Err(Error::NoDivisor(frequency))
}
