//! PWM register map and access to the register block.

use super::channel::Channel;
use crate::error::Result;
use crate::field::Field;
use core::ptr;

/// PWM peripheral base address.
pub const BASE: usize = 0x4009_4000;

/// Byte distance between the register groups of two channels.
const CHANNEL_STRIDE: usize = 0x20;

/// `PWM_CLK` fields.
pub mod clk {
    use crate::field::Field;

    pub const DIVA: Field = Field::from_mask(0x0000_00FF);
    pub const PREA: Field = Field::from_mask(0x0000_0F00);
    pub const DIVB: Field = Field::from_mask(0x00FF_0000);
    pub const PREB: Field = Field::from_mask(0x0F00_0000);
}

/// `PWM_CMRx` fields.
pub mod cmr {
    use crate::field::Field;

    pub const CPRE: Field = Field::from_mask(0x0000_000F);
    pub const CALG: Field = Field::from_mask(0x0000_0100);
    pub const CPOL: Field = Field::from_mask(0x0000_0200);
}

/// `PWM_CPRDx`, `PWM_CPRDUPDx`, `PWM_CDTYx` and `PWM_CDTYUPDx` value field.
pub const COUNTER: Field = Field::from_mask(0x00FF_FFFF);

/// One bit per channel: `PWM_ENA`, `PWM_DIS` and `PWM_SR`.
pub const CHID: Field = Field::from_mask(0x0000_00FF);

/// Registers of the PWM block used by the driver.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Register {
    /// Shared clocks A and B.
    Clk,
    /// Channel enable, write-only.
    Ena,
    /// Channel disable, write-only.
    Dis,
    /// Channel status, read-only.
    Sr,
    /// Channel mode.
    Cmr(Channel),
    /// Duty cycle.
    Cdty(Channel),
    /// Duty cycle update.
    CdtyUpd(Channel),
    /// Period.
    Cprd(Channel),
    /// Period update.
    CprdUpd(Channel),
    /// Dead time.
    Dt(Channel),
    /// Dead time update.
    DtUpd(Channel),
}

impl Register {
    /// Byte offset from the peripheral base.
    #[inline]
    pub const fn offset(self) -> usize {
        match self {
            Register::Clk => 0x000,
            Register::Ena => 0x004,
            Register::Dis => 0x008,
            Register::Sr => 0x00C,
            Register::Cmr(ch) => 0x200 + CHANNEL_STRIDE * ch as usize,
            Register::Cdty(ch) => 0x204 + CHANNEL_STRIDE * ch as usize,
            Register::CdtyUpd(ch) => 0x208 + CHANNEL_STRIDE * ch as usize,
            Register::Cprd(ch) => 0x20C + CHANNEL_STRIDE * ch as usize,
            Register::CprdUpd(ch) => 0x210 + CHANNEL_STRIDE * ch as usize,
            Register::Dt(ch) => 0x218 + CHANNEL_STRIDE * ch as usize,
            Register::DtUpd(ch) => 0x21C + CHANNEL_STRIDE * ch as usize,
        }
    }

    /// Every channel register, cleared on a channel reset.
    #[inline]
    pub const fn channel_group(ch: Channel) -> [Register; 7] {
        [
            Register::Cmr(ch),
            Register::Cdty(ch),
            Register::CdtyUpd(ch),
            Register::Cprd(ch),
            Register::CprdUpd(ch),
            Register::Dt(ch),
            Register::DtUpd(ch),
        ]
    }
}

/// Access to the PWM register block.
///
/// Implemented by the memory mapped peripheral ([Mmio]) and by an in-memory
/// block in tests.
pub trait Registers {
    fn read(&self, register: Register) -> u32;

    fn write(&mut self, register: Register, value: u32);

    /// Read a field of a register.
    #[inline]
    fn read_field(&self, register: Register, field: Field) -> u32 {
        field.get(self.read(register))
    }

    /// Read-modify-write of a field, keeping the other bits of the register.
    #[inline]
    fn write_field(&mut self, register: Register, field: Field, value: u32) -> Result<()> {
        let new = field.set(self.read(register), value)?;
        self.write(register, new);
        Ok(())
    }
}

impl<R: Registers + ?Sized> Registers for &mut R {
    #[inline]
    fn read(&self, register: Register) -> u32 {
        (**self).read(register)
    }

    #[inline]
    fn write(&mut self, register: Register, value: u32) {
        (**self).write(register, value)
    }
}

/// The memory mapped PWM peripheral.
#[derive(Debug)]
pub struct Mmio {
    base: usize,
}

impl Mmio {
    /// Handle to the PWM peripheral.
    ///
    /// # Safety
    ///
    /// Only one handle may be in use at a time: the register block is not
    /// protected against concurrent access, e.g. from an interrupt handler.
    #[inline]
    pub unsafe fn steal() -> Self {
        Self { base: BASE }
    }

    #[inline]
    fn ptr(&self, register: Register) -> *mut u32 {
        (self.base + register.offset()) as *mut u32
    }
}

impl Registers for Mmio {
    #[inline]
    fn read(&self, register: Register) -> u32 {
        unsafe { ptr::read_volatile(self.ptr(register)) }
    }

    #[inline]
    fn write(&mut self, register: Register, value: u32) {
        unsafe { ptr::write_volatile(self.ptr(register), value) }
    }
}
