//! Driver errors.

use core::fmt;

/// Result type of the fallible driver operations.
pub type Result<T> = core::result::Result<T, Error>;

/// Errors reported by the peripheral drivers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Error {
    /// A bitfield mask without any set bit.
    ZeroMask,
    /// A bitfield mask with a gap between its set bits.
    NonContiguousMask(u32),
    /// The value does not fit in the bitfield.
    FieldOverflow { mask: u32, value: u32 },
    /// A frequency of 0Hz was requested.
    ZeroFrequency,
    /// The requested frequency can not be produced from the system clock.
    FrequencyTooHigh(u32),
    /// No channel prescaler gives a period in range for this frequency.
    NoPrescaler(u32),
    /// No clock prescaler gives a divisor in range for this frequency.
    NoDivisor(u32),
    /// Channel index outside `0..8`.
    UnknownChannel(u8),
    /// Clock identifier other than A (0) or B (1).
    UnknownClock(u8),
    /// Prescaler selector value not defined by the hardware.
    InvalidPrescaler(u32),
    /// A channel period of zero.
    ZeroPeriod,
    /// Duty cycle larger than the channel period.
    DutyExceedsPeriod { duty: u16, period: u16 },
    /// The channels in the mask did not report disabled in time.
    DisableTimeout(u8),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::ZeroMask => write!(f, "bitfield mask is zero"),
            Error::NonContiguousMask(mask) => {
                write!(f, "bitfield mask {:#010x} is not contiguous", mask)
            }
            Error::FieldOverflow { mask, value } => {
                write!(f, "value {:#x} does not fit mask {:#010x}", value, mask)
            }
            Error::ZeroFrequency => write!(f, "frequency must be non-zero"),
            Error::FrequencyTooHigh(hz) => write!(f, "frequency {}Hz is too high", hz),
            Error::NoPrescaler(hz) => write!(f, "no channel prescaler fits {}Hz", hz),
            Error::NoDivisor(hz) => write!(f, "no clock divisor fits {}Hz", hz),
            Error::UnknownChannel(ch) => write!(f, "unknown channel {}", ch),
            Error::UnknownClock(id) => write!(f, "unknown clock {}", id),
            Error::InvalidPrescaler(raw) => write!(f, "invalid prescaler selector {}", raw),
            Error::ZeroPeriod => write!(f, "period must be non-zero"),
            Error::DutyExceedsPeriod { duty, period } => {
                write!(f, "duty cycle {} exceeds period {}", duty, period)
            }
            Error::DisableTimeout(mask) => {
                write!(f, "channels {:#010b} did not disable in time", mask)
            }
        }
    }
}
