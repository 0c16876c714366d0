//! Shared clocks A and B.
//!
//! Each clock divides the master clock by a ladder prescaler and an integer divisor.
//! Any channel can select one of them instead of its own prescaler; reconfiguring
//! a clock affects every channel using it.

use super::channel::{ClockId, Prescaler};
use super::frequency::DivisorResolution;
use super::pac::{clk, Register, Registers};
use crate::error::Result;
use crate::field::Field;

/// Divisor value turning a shared clock off.
pub const DIVISOR_OFF: u8 = 0;

/// Shared clock setting.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ClockConfig {
    pub prescaler: Prescaler,
    /// Zero turns the clock off.
    pub divisor: u8,
}

impl ClockConfig {
    /// Clock frequency for a master clock `mck`, `None` if off.
    #[inline]
    pub fn frequency(&self, mck: u32) -> Option<u32> {
        match self.divisor {
            DIVISOR_OFF => None,
            div => Some(mck / self.prescaler.divider() / u32::from(div)),
        }
    }
}

impl From<DivisorResolution> for ClockConfig {
    #[inline]
    fn from(r: DivisorResolution) -> Self {
        Self {
            prescaler: r.prescaler,
            divisor: r.divisor,
        }
    }
}

#[inline]
fn fields(id: ClockId) -> (Field, Field) {
    match id {
        ClockId::A => (clk::PREA, clk::DIVA),
        ClockId::B => (clk::PREB, clk::DIVB),
    }
}

/// Write prescaler and divisor of a shared clock.
pub(crate) fn set<R: Registers>(regs: &mut R, id: ClockId, config: ClockConfig) -> Result<()> {
    let (pre, div) = fields(id);
    regs.write_field(Register::Clk, pre, u32::from(config.prescaler.index()))?;
    regs.write_field(Register::Clk, div, u32::from(config.divisor))?;
    debug!(
        "pwm: clock {:?} = mck/{}/{}",
        id,
        config.prescaler.divider(),
        config.divisor
    );
    Ok(())
}

/// Turn a shared clock off, keeping its prescaler.
pub(crate) fn turn_off<R: Registers>(regs: &mut R, id: ClockId) -> Result<()> {
    let (_, div) = fields(id);
    regs.write_field(Register::Clk, div, u32::from(DIVISOR_OFF))?;
    debug!("pwm: clock {:?} off", id);
    Ok(())
}

/// Current setting of a shared clock.
pub(crate) fn read<R: Registers>(regs: &R, id: ClockId) -> Result<ClockConfig> {
    let (pre, div) = fields(id);
    let clk = regs.read(Register::Clk);
    Ok(ClockConfig {
        prescaler: Prescaler::from_index(pre.get(clk))?,
        divisor: div.get(clk) as u8,
    })
}
