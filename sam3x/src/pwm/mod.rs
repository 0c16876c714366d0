//! PWM peripheral.
//!
//! Example use:
//!
//! ```no_run
//! use sam3x::{clock, pwm};
//!
//! // Enable the peripheral clock.
//! unsafe { clock::enable_pwm() };
//!
//! // Start shared clock A at 1MHz.
//! let mut pwm = pwm::Config {
//!     clocks: pwm::ClockSettings {
//!         clock_a: Some(pwm::ClockConfig {
//!             prescaler: pwm::Prescaler::Div4,
//!             divisor: 21,
//!         }),
//!         clock_b: None,
//!     },
//!     ..Default::default()
//! }
//! .make(unsafe { pwm::Mmio::steal() })
//! .unwrap();
//!
//! // 50Hz servo signal, 1.5ms pulse.
//! pwm::ChannelConfig {
//!     channel: pwm::Channel::C2,
//!     frequency: 50,
//!     alignment: pwm::Alignment::Left,
//!     polarity: pwm::Polarity::Inverted,
//!     duty_cycle: 0,
//!     source: pwm::ClockSource::Local,
//! }
//! .make(&mut pwm)
//! .unwrap();
//! let period = pwm.period(pwm::Channel::C2);
//! pwm.set_duty_cycle(pwm::Channel::C2, period / 40 * 3).unwrap();
//! pwm.enable(pwm::Channel::C2);
//! ```
//!
//! The period and duty cycle of a running channel are written to the update
//! registers, so they take effect at the next period boundary. Everything else
//! that depends on the counter (prescaler, shared clock) is changed with the
//! channel stopped, and the channel is restarted afterwards.
//!
//! The driver assumes a single execution context: calls from an interrupt handler
//! need a critical section around every use of the driver.

mod channel;
mod clock;
pub mod frequency;
pub mod pac;
mod pin;

#[cfg(test)]
pub(crate) mod mock;

pub use channel::{Alignment, Channel, ChannelClock, ClockId, Polarity, Prescaler};
pub use clock::{ClockConfig, DIVISOR_OFF};
pub use frequency::{DivisorResolution, PeriodResolution};
pub use pac::{Mmio, Register, Registers};
pub use pin::PwmChannel;

use crate::error::{Error, Result};
use crate::field::Field;

/// Mask selecting every channel.
pub const ALL_CHANNELS: u8 = 0xFF;

/// Default number of extra status reads before a disable is reported as timed out.
///
/// The wait always allows one status read per master clock cycle of the longest
/// period among the channels being stopped; these reads come on top.
pub const DEFAULT_DISABLE_POLLS: u32 = 10_000;

/// Shared clock settings applied by [Pwm::init_peripheral].
///
/// A missing setting, or a divisor of zero, leaves that clock as it is.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ClockSettings {
    pub clock_a: Option<ClockConfig>,
    pub clock_b: Option<ClockConfig>,
}

/// PWM peripheral configuration.
///
/// Use [make][Config::make()] to create the [Pwm] driver.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    pub clocks: ClockSettings,
    /// Status reads allowed past the channel period while waiting for a disable.
    pub disable_polls: u32,
}

impl Default for Config {
    #[inline]
    fn default() -> Self {
        Self {
            clocks: ClockSettings::default(),
            disable_polls: DEFAULT_DISABLE_POLLS,
        }
    }
}

impl Config {
    #[inline]
    pub fn make<R: Registers>(self, regs: R) -> Result<Pwm<R>> {
        let mut pwm = Pwm::new(regs, self.disable_polls);
        pwm.init_peripheral(self.clocks)?;
        Ok(pwm)
    }
}

/// Counter clock source of a channel.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClockSource {
    /// The channel's own prescaler; the period is derived from the frequency.
    Local,
    /// A shared clock running at the requested frequency, counting up to `period`.
    Shared { clock: ClockId, period: u16 },
}

/// Channel configuration.
///
/// Use [make][ChannelConfig::make()] to apply it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ChannelConfig {
    pub channel: Channel,
    /// Output frequency for a [local][ClockSource::Local] clock, clock frequency
    /// for a [shared][ClockSource::Shared] one.
    pub frequency: u32,
    pub alignment: Alignment,
    pub polarity: Polarity,
    pub duty_cycle: u16,
    pub source: ClockSource,
}

impl ChannelConfig {
    #[inline]
    pub fn make<R: Registers>(self, pwm: &mut Pwm<R>) -> Result<()> {
        pwm.init_channel(&self)
    }
}

/// PWM driver.
///
/// Can be constructed using [Config][Config::make()].
#[derive(Debug)]
pub struct Pwm<R: Registers> {
    regs: R,
    disable_polls: u32,
    pending: [Pending; 8],
}

/// Values written to the update registers of a running channel.
///
/// The update registers can not be read back on the hardware.
#[derive(Clone, Copy, Debug, Default)]
struct Pending {
    period: Option<u16>,
    duty: Option<u16>,
}

impl<R: Registers> Pwm<R> {
    /// Driver without touching the hardware.
    #[inline]
    pub fn new(regs: R, disable_polls: u32) -> Self {
        Self {
            regs,
            disable_polls,
            pending: [Pending::default(); 8],
        }
    }

    /// Release the register block.
    #[inline]
    pub fn free(self) -> R {
        self.regs
    }

    #[inline]
    pub fn registers(&self) -> &R {
        &self.regs
    }

    /// Handle to a single channel.
    #[inline]
    pub fn pin(&mut self, channel: Channel) -> PwmChannel<'_, R> {
        PwmChannel::new(self, channel)
    }
}

/// Peripheral lifecycle.
impl<R: Registers> Pwm<R> {
    /// Configure the shared clocks.
    ///
    /// Only clocks with a non-zero divisor are written, the others are left running
    /// or stopped as they are.
    pub fn init_peripheral(&mut self, clocks: ClockSettings) -> Result<()> {
        let settings = [(ClockId::A, clocks.clock_a), (ClockId::B, clocks.clock_b)];
        for &(id, config) in settings.iter() {
            match config {
                Some(config) if config.divisor != DIVISOR_OFF => self.set_clock(id, config)?,
                _ => (),
            }
        }
        Ok(())
    }

    /// Stop the channel and clear all of its registers.
    pub fn reset_channel(&mut self, channel: Channel) -> Result<()> {
        self.disable(channel)?;
        for &reg in Register::channel_group(channel).iter() {
            self.regs.write_field(reg, Field::WORD, 0)?;
        }
        self.pending[channel.index()] = Pending::default();
        debug!("pwm: {:?} reset", channel);
        Ok(())
    }

    /// Clear the shared clocks and reset every channel.
    ///
    /// All channels are reset even if one of them fails to disable; the first
    /// error is returned.
    pub fn reset_peripheral(&mut self) -> Result<()> {
        self.regs.write_field(Register::Clk, Field::WORD, 0)?;
        let mut result = Ok(());
        for &channel in Channel::ALL.iter() {
            let reset = self.reset_channel(channel);
            if result.is_ok() {
                result = reset;
            }
        }
        result
    }

    /// Configure a channel: clock, period, alignment, polarity and duty cycle.
    ///
    /// The request is checked before anything is written: on error the channel is
    /// unchanged. A running channel is stopped while configured and restarted after.
    pub fn init_channel(&mut self, config: &ChannelConfig) -> Result<()> {
        let channel = config.channel;
        let (selector, period, shared) = match config.source {
            ClockSource::Local => {
                let r =
                    frequency::resolve_period(crate::clock::SPEED, config.frequency, config.alignment)?;
                (ChannelClock::Prescaler(r.prescaler), r.period, None)
            }
            ClockSource::Shared { clock, period } => {
                let r = frequency::resolve_divisor(crate::clock::SPEED, config.frequency)?;
                if period == 0 {
                    return Err(Error::ZeroPeriod);
                }
                (ChannelClock::Shared(clock), period, Some((clock, ClockConfig::from(r))))
            }
        };
        if config.duty_cycle > period {
            return Err(Error::DutyExceedsPeriod {
                duty: config.duty_cycle,
                period,
            });
        }

        self.with_disabled(channel, |pwm| {
            pwm.set_alignment(channel, config.alignment)?;
            pwm.set_polarity(channel, config.polarity)?;
            if let Some((id, clock)) = shared {
                pwm.set_clock(id, clock)?;
            }
            pwm.set_prescaler(channel, selector)?;
            pwm.set_period(channel, period)?;
            pwm.set_duty_cycle(channel, config.duty_cycle)
        })?;
        debug!(
            "pwm: {:?} {}Hz {:?} period {}",
            channel, config.frequency, selector, period
        );
        Ok(())
    }

    /// Run `f` with the channel stopped, restarting it afterwards if it was running.
    fn with_disabled<T>(
        &mut self,
        channel: Channel,
        f: impl FnOnce(&mut Self) -> Result<T>,
    ) -> Result<T> {
        let running = self.is_enabled(channel);
        if running {
            if let Err(e) = self.disable(channel) {
                // Cancel the pending disable.
                self.enable(channel);
                return Err(e);
            }
        }
        let result = f(self);
        if running {
            self.enable(channel);
        }
        result
    }
}

/// Channel enable and status.
impl<R: Registers> Pwm<R> {
    /// Start the channels in `mask`.
    #[inline]
    pub fn enable_channels(&mut self, mask: u8) {
        self.regs.write(Register::Ena, u32::from(mask));
    }

    /// Stop the channels in `mask`.
    ///
    /// The hardware stops a channel at the end of its current period: blocks until
    /// all channels in `mask` report disabled. A status read takes at least one
    /// master clock cycle, so the wait gives up after [period_cycles] reads of the
    /// slowest channel plus the configured number of extra reads.
    ///
    /// [period_cycles]: Pwm::period_cycles
    pub fn disable_channels(&mut self, mask: u8) -> Result<()> {
        let active = mask & self.enabled_channels();
        if active == 0 {
            return Ok(());
        }
        let longest = Channel::ALL
            .iter()
            .filter(|ch| active & ch.mask() != 0)
            .map(|&ch| self.period_cycles(ch))
            .max()
            .unwrap_or(0);
        let polls = longest + u64::from(self.disable_polls);
        self.regs.write(Register::Dis, u32::from(active));
        for _ in 0..polls {
            if self.enabled_channels() & active == 0 {
                return Ok(());
            }
            core::hint::spin_loop();
        }
        match self.enabled_channels() & active {
            0 => Ok(()),
            stuck => {
                warn!("pwm: channels {:#010b} still enabled", stuck);
                Err(Error::DisableTimeout(stuck))
            }
        }
    }

    #[inline]
    pub fn enable(&mut self, channel: Channel) {
        self.enable_channels(channel.mask());
    }

    #[inline]
    pub fn disable(&mut self, channel: Channel) -> Result<()> {
        self.disable_channels(channel.mask())
    }

    #[inline]
    pub fn is_enabled(&self, channel: Channel) -> bool {
        self.enabled_channels() & channel.mask() != 0
    }

    /// Status of all channels, one bit per channel.
    #[inline]
    pub fn enabled_channels(&self) -> u8 {
        self.regs.read_field(Register::Sr, pac::CHID) as u8
    }
}

/// Channel mode, period and duty cycle.
impl<R: Registers> Pwm<R> {
    #[inline]
    pub fn set_alignment(&mut self, channel: Channel, alignment: Alignment) -> Result<()> {
        self.regs
            .write_field(Register::Cmr(channel), pac::cmr::CALG, alignment as u32)
    }

    #[inline]
    pub fn set_polarity(&mut self, channel: Channel, polarity: Polarity) -> Result<()> {
        self.regs
            .write_field(Register::Cmr(channel), pac::cmr::CPOL, polarity as u32)
    }

    /// Select the channel's counter clock.
    #[inline]
    pub fn set_prescaler(&mut self, channel: Channel, clock: ChannelClock) -> Result<()> {
        self.regs
            .write_field(Register::Cmr(channel), pac::cmr::CPRE, clock.bits())
    }

    /// Set the period, through the update register if the channel is running.
    ///
    /// Writing the period directly while running would cut the current cycle short.
    /// A duty cycle above the new period is lowered to it, through the same path.
    pub fn set_period(&mut self, channel: Channel, period: u16) -> Result<()> {
        if period == 0 {
            return Err(Error::ZeroPeriod);
        }
        if self.duty_cycle(channel) > period {
            self.write_duty_cycle(channel, period)?;
        }
        let running = self.is_enabled(channel);
        let slot = &mut self.pending[channel.index()].period;
        if running {
            self.regs
                .write_field(Register::CprdUpd(channel), pac::COUNTER, u32::from(period))?;
            *slot = Some(period);
        } else {
            self.regs
                .write_field(Register::Cprd(channel), pac::COUNTER, u32::from(period))?;
            *slot = None;
        }
        Ok(())
    }

    /// Set the duty cycle, through the update register if the channel is running.
    ///
    /// The duty cycle can not exceed the period, a pending one included.
    pub fn set_duty_cycle(&mut self, channel: Channel, duty: u16) -> Result<()> {
        let period = self.period(channel);
        if duty > period {
            return Err(Error::DutyExceedsPeriod { duty, period });
        }
        self.write_duty_cycle(channel, duty)
    }

    fn write_duty_cycle(&mut self, channel: Channel, duty: u16) -> Result<()> {
        let running = self.is_enabled(channel);
        let slot = &mut self.pending[channel.index()].duty;
        if running {
            self.regs
                .write_field(Register::CdtyUpd(channel), pac::COUNTER, u32::from(duty))?;
            *slot = Some(duty);
        } else {
            self.regs
                .write_field(Register::Cdty(channel), pac::COUNTER, u32::from(duty))?;
            *slot = None;
        }
        Ok(())
    }

    #[inline]
    pub fn alignment(&self, channel: Channel) -> Alignment {
        Alignment::from_bit(self.regs.read_field(Register::Cmr(channel), pac::cmr::CALG))
    }

    #[inline]
    pub fn polarity(&self, channel: Channel) -> Polarity {
        Polarity::from_bit(self.regs.read_field(Register::Cmr(channel), pac::cmr::CPOL))
    }

    #[inline]
    pub fn prescaler(&self, channel: Channel) -> Result<ChannelClock> {
        ChannelClock::from_bits(self.regs.read_field(Register::Cmr(channel), pac::cmr::CPRE))
    }

    /// Channel period, also the maximum duty cycle.
    ///
    /// A value waiting in the update register takes precedence.
    #[inline]
    pub fn period(&self, channel: Channel) -> u16 {
        match self.pending[channel.index()].period {
            Some(period) => period,
            None => self.regs.read_field(Register::Cprd(channel), pac::COUNTER) as u16,
        }
    }

    /// Channel duty cycle, a value waiting in the update register included.
    #[inline]
    pub fn duty_cycle(&self, channel: Channel) -> u16 {
        match self.pending[channel.index()].duty {
            Some(duty) => duty,
            None => self.regs.read_field(Register::Cdty(channel), pac::COUNTER) as u16,
        }
    }

    /// Master clock cycles in one period of the channel.
    ///
    /// The longer of the running and the pending period counts. Zero if the
    /// channel's clock is stopped or not valid.
    pub fn period_cycles(&self, channel: Channel) -> u64 {
        let running = self.regs.read_field(Register::Cprd(channel), pac::COUNTER);
        let ticks = u64::from(running.max(u32::from(self.period(channel))));
        let divider = match self.prescaler(channel) {
            Ok(ChannelClock::Prescaler(p)) => u64::from(p.divider()),
            Ok(ChannelClock::Shared(id)) => match self.clock(id) {
                Ok(c) => u64::from(c.prescaler.divider()) * u64::from(c.divisor),
                Err(_) => 0,
            },
            Err(_) => 0,
        };
        ticks * divider * u64::from(self.alignment(channel).factor())
    }
}

/// Frequency and shared clocks.
impl<R: Registers> Pwm<R> {
    /// Set the channel output frequency using its own prescaler.
    ///
    /// Picks the smallest prescaler for which the period fits, based on the current
    /// alignment. Nothing is written if no setting is found.
    pub fn set_frequency(&mut self, channel: Channel, frequency: u32) -> Result<PeriodResolution> {
        let alignment = self.alignment(channel);
        let r = frequency::resolve_period(crate::clock::SPEED, frequency, alignment)?;
        self.with_disabled(channel, |pwm| {
            pwm.set_period(channel, r.period)?;
            pwm.set_prescaler(channel, r.prescaler.into())
        })?;
        debug!(
            "pwm: {:?} {}Hz -> mck/{} period {}",
            channel,
            frequency,
            r.prescaler.divider(),
            r.period
        );
        Ok(r)
    }

    /// Run a shared clock at `frequency` and select it as the channel clock.
    ///
    /// The channel period is left as is.
    pub fn set_clock_frequency(
        &mut self,
        channel: Channel,
        frequency: u32,
        clock: ClockId,
    ) -> Result<DivisorResolution> {
        let r = frequency::resolve_divisor(crate::clock::SPEED, frequency)?;
        self.with_disabled(channel, |pwm| {
            pwm.set_clock(clock, r.into())?;
            pwm.set_prescaler(channel, ChannelClock::Shared(clock))
        })?;
        Ok(r)
    }

    /// Configure a shared clock.
    ///
    /// Affects every channel using the clock.
    #[inline]
    pub fn set_clock(&mut self, id: ClockId, config: ClockConfig) -> Result<()> {
        clock::set(&mut self.regs, id, config)
    }

    /// Stop a shared clock.
    #[inline]
    pub fn turn_off_clock(&mut self, id: ClockId) -> Result<()> {
        clock::turn_off(&mut self.regs, id)
    }

    #[inline]
    pub fn clock(&self, id: ClockId) -> Result<ClockConfig> {
        clock::read(&self.regs, id)
    }
}
