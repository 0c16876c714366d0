//! Bitfields inside 32-bit registers.
//!
//! A [Field] is described by its mask only; the shift is derived from the mask.
//!
//! ```
//! use sam3x::field::Field;
//!
//! const PREA: Field = Field::from_mask(0x0000_0F00);
//!
//! let reg = PREA.set(0xFFFF_00FF, 0b1010).unwrap();
//! assert_eq!(reg, 0xFFFF_0AFF);
//! assert_eq!(PREA.get(reg), 0b1010);
//! ```

use crate::error::{Error, Result};

/// Contiguous group of bits in a 32-bit register.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Field {
    mask: u32,
}

impl Field {
    /// The whole register.
    pub const WORD: Field = Field::from_mask(0xFFFF_FFFF);

    /// Field from a constant mask.
    ///
    /// Panics (at compile time for constants) if the mask is zero or not contiguous.
    #[inline]
    pub const fn from_mask(mask: u32) -> Self {
        if mask == 0 {
            panic!("bitfield mask is zero");
        }
        if !is_contiguous(mask) {
            panic!("bitfield mask is not contiguous");
        }
        Self { mask }
    }

    /// Field from a run-time mask.
    #[inline]
    pub fn try_from_mask(mask: u32) -> Result<Self> {
        if mask == 0 {
            Err(Error::ZeroMask)
        } else if !is_contiguous(mask) {
            Err(Error::NonContiguousMask(mask))
        } else {
            Ok(Self { mask })
        }
    }

    #[inline]
    pub const fn mask(self) -> u32 {
        self.mask
    }

    /// Bit position of the field, i.e. of the lowest set bit in the mask.
    #[inline]
    pub const fn shift(self) -> u32 {
        self.mask.trailing_zeros()
    }

    /// Number of bits in the field.
    #[inline]
    pub const fn width(self) -> u32 {
        self.mask.count_ones()
    }

    /// Largest value the field can hold.
    #[inline]
    pub const fn max(self) -> u32 {
        self.mask >> self.shift()
    }

    /// Extract the field value from a register value.
    #[inline]
    pub const fn get(self, register: u32) -> u32 {
        (register & self.mask) >> self.shift()
    }

    /// Returns `register` with the field replaced by `value`.
    ///
    /// Bits outside the mask are kept. Values wider than the field are rejected.
    #[inline]
    pub fn set(self, register: u32, value: u32) -> Result<u32> {
        if value > self.max() {
            return Err(Error::FieldOverflow {
                mask: self.mask,
                value,
            });
        }
        Ok((register & !self.mask) | (value << self.shift()))
    }
}

#[inline]
const fn is_contiguous(mask: u32) -> bool {
    let low = mask >> mask.trailing_zeros();
    low & low.wrapping_add(1) == 0
}
