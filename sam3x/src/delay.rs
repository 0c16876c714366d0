//! Busy-wait delays, counted in core cycles at [SPEED][crate::clock::SPEED].

use crate::clock::SPEED;
use embedded_hal::blocking::delay::{DelayMs, DelayUs};

const CYCLES_PER_MS: u32 = SPEED / 1_000;
const CYCLES_PER_US: u32 = SPEED / 1_000_000;

/// Blocks for at least `ms` milliseconds.
#[inline]
pub fn millis(ms: u32) {
    cortex_m::asm::delay(CYCLES_PER_MS.saturating_mul(ms));
}

/// Blocks for at least `us` microseconds.
#[inline]
pub fn micros(us: u32) {
    cortex_m::asm::delay(CYCLES_PER_US.saturating_mul(us));
}

/// Cycle counting [embedded_hal] delay provider.
///
/// Only valid once the system clock runs at [SPEED][crate::clock::SPEED].
#[derive(Clone, Copy, Debug, Default)]
pub struct Delay;

impl DelayMs<u32> for Delay {
    #[inline]
    fn delay_ms(&mut self, ms: u32) {
        millis(ms);
    }
}

impl DelayMs<u16> for Delay {
    #[inline]
    fn delay_ms(&mut self, ms: u16) {
        millis(u32::from(ms));
    }
}

impl DelayUs<u32> for Delay {
    #[inline]
    fn delay_us(&mut self, us: u32) {
        micros(us);
    }
}

impl DelayUs<u16> for Delay {
    #[inline]
    fn delay_us(&mut self, us: u16) {
        micros(u32::from(us));
    }
}
