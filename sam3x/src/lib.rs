//! Minimal HAL crate for the SAM3X8E microcontroller.
//!
//! Drives the PWM controller from symbolic settings (frequency, alignment, polarity,
//! duty cycle), without direct interaction with registers. The register block is
//! accessed through the [Registers][pwm::Registers] trait, so the driver can run
//! against an in-memory block on the host.

#![cfg_attr(not(test), no_std)]

#[macro_use]
mod log;

pub mod clock;
pub mod delay;
pub mod error;
pub mod field;
pub mod pwm;
pub mod watchdog;

pub use error::{Error, Result};
