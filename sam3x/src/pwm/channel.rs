use crate::error::{Error, Result};
use core::convert::TryFrom;

/// PWM channel.
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Channel {
    C0 = 0,
    C1 = 1,
    C2 = 2,
    C3 = 3,
    C4 = 4,
    C5 = 5,
    C6 = 6,
    C7 = 7,
}

impl Channel {
    /// All channels, in index order.
    pub const ALL: [Channel; 8] = [
        Channel::C0,
        Channel::C1,
        Channel::C2,
        Channel::C3,
        Channel::C4,
        Channel::C5,
        Channel::C6,
        Channel::C7,
    ];

    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// The channel bit in the `ENA`, `DIS` and `SR` registers.
    #[inline]
    pub const fn mask(self) -> u8 {
        1 << self as u8
    }
}

impl TryFrom<u8> for Channel {
    type Error = Error;

    #[inline]
    fn try_from(index: u8) -> Result<Self> {
        Channel::ALL
            .get(index as usize)
            .copied()
            .ok_or(Error::UnknownChannel(index))
    }
}

/// Counter alignment.
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Alignment {
    /// Counter ramps up once per period.
    Left = 0,
    /// Counter ramps up and down, covering the period twice per output cycle.
    Center = 1,
}

impl Alignment {
    /// Counter traversals per output cycle.
    #[inline]
    pub const fn factor(self) -> u32 {
        match self {
            Alignment::Left => 1,
            Alignment::Center => 2,
        }
    }

    #[inline]
    pub(crate) const fn from_bit(bit: u32) -> Self {
        if bit == 0 {
            Alignment::Left
        } else {
            Alignment::Center
        }
    }
}

/// Output level at the start of the period.
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Polarity {
    /// Starts low.
    Normal = 0,
    /// Starts high.
    Inverted = 1,
}

impl Polarity {
    #[inline]
    pub(crate) const fn from_bit(bit: u32) -> Self {
        if bit == 0 {
            Polarity::Normal
        } else {
            Polarity::Inverted
        }
    }
}

/// Prescaler ladder: the master clock divided by a power of two.
#[repr(u8)]
#[rustfmt::skip]
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Prescaler {
    Div1    = 0,
    Div2    = 1,
    Div4    = 2,
    Div8    = 3,
    Div16   = 4,
    Div32   = 5,
    Div64   = 6,
    Div128  = 7,
    Div256  = 8,
    Div512  = 9,
    Div1024 = 10,
}

impl Prescaler {
    /// The ladder, smallest divider first.
    pub const LADDER: [Prescaler; 11] = [
        Prescaler::Div1,
        Prescaler::Div2,
        Prescaler::Div4,
        Prescaler::Div8,
        Prescaler::Div16,
        Prescaler::Div32,
        Prescaler::Div64,
        Prescaler::Div128,
        Prescaler::Div256,
        Prescaler::Div512,
        Prescaler::Div1024,
    ];

    #[inline]
    pub const fn index(self) -> u8 {
        self as u8
    }

    /// Divide-by value.
    #[inline]
    pub const fn divider(self) -> u32 {
        1 << self as u32
    }

    #[inline]
    pub fn from_index(index: u32) -> Result<Self> {
        Prescaler::LADDER
            .get(index as usize)
            .copied()
            .ok_or(Error::InvalidPrescaler(index))
    }
}

/// Identifier of the shared clocks.
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClockId {
    A = 0,
    B = 1,
}

impl TryFrom<u8> for ClockId {
    type Error = Error;

    #[inline]
    fn try_from(id: u8) -> Result<Self> {
        match id {
            0 => Ok(ClockId::A),
            1 => Ok(ClockId::B),
            _ => Err(Error::UnknownClock(id)),
        }
    }
}

/// Counter clock of a channel: selected by the `CPRE` field.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChannelClock {
    /// Master clock through the channel's own prescaler.
    Prescaler(Prescaler),
    /// Shared clock A or B.
    Shared(ClockId),
}

impl ChannelClock {
    const CLOCK_A: u32 = 11;
    const CLOCK_B: u32 = 12;

    #[inline]
    pub(crate) const fn bits(self) -> u32 {
        match self {
            ChannelClock::Prescaler(p) => p as u32,
            ChannelClock::Shared(ClockId::A) => Self::CLOCK_A,
            ChannelClock::Shared(ClockId::B) => Self::CLOCK_B,
        }
    }

    #[inline]
    pub(crate) fn from_bits(bits: u32) -> Result<Self> {
        match bits {
            Self::CLOCK_A => Ok(ChannelClock::Shared(ClockId::A)),
            Self::CLOCK_B => Ok(ChannelClock::Shared(ClockId::B)),
            _ => Prescaler::from_index(bits).map(ChannelClock::Prescaler),
        }
    }
}

impl From<Prescaler> for ChannelClock {
    #[inline]
    fn from(p: Prescaler) -> Self {
        ChannelClock::Prescaler(p)
    }
}
