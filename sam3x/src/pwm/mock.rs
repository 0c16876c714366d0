//! In-memory PWM register block.
//!
//! Emulates the write-1-to-act `ENA`/`DIS` registers and the `SR` status: a disable
//! only shows up in `SR` after a number of status reads, like the hardware which
//! finishes the running period first.

use super::pac::{Register, Registers};
use core::cell::Cell;

const WORDS: usize = 0x300 / 4;

#[derive(Debug)]
pub struct MockRegisters {
    words: [u32; WORDS],
    status: Cell<u8>,
    pending: Cell<u8>,
    countdown: Cell<u32>,
    disable_latency: u32,
    stuck: bool,
    writes: usize,
}

impl MockRegisters {
    /// Register block in its reset state, disables complete immediately.
    pub fn new() -> Self {
        Self {
            words: [0; WORDS],
            status: Cell::new(0),
            pending: Cell::new(0),
            countdown: Cell::new(0),
            disable_latency: 0,
            stuck: false,
            writes: 0,
        }
    }

    /// Disables take effect after `polls` reads of `SR`.
    pub fn with_disable_latency(mut self, polls: u32) -> Self {
        self.disable_latency = polls;
        self
    }

    /// Disables never take effect.
    pub fn stuck(mut self) -> Self {
        self.stuck = true;
        self
    }

    /// Number of register writes so far.
    pub fn writes(&self) -> usize {
        self.writes
    }

    /// Raw register value, without side effects.
    pub fn peek(&self, register: Register) -> u32 {
        match register {
            Register::Sr => self.status.get() as u32,
            Register::Ena | Register::Dis => 0,
            _ => self.words[register.offset() / 4],
        }
    }

    /// Overwrite a register, without side effects and without counting a write.
    pub fn poke(&mut self, register: Register, value: u32) {
        match register {
            Register::Sr => self.status.set(value as u8),
            Register::Ena | Register::Dis => (),
            _ => self.words[register.offset() / 4] = value,
        }
    }

    fn tick(&self) {
        let pending = self.pending.get();
        if pending == 0 || self.stuck {
            return;
        }
        match self.countdown.get() {
            0 => {
                self.status.set(self.status.get() & !pending);
                self.pending.set(0);
            }
            n => self.countdown.set(n - 1),
        }
    }
}

impl Registers for MockRegisters {
    fn read(&self, register: Register) -> u32 {
        if register == Register::Sr {
            self.tick();
        }
        self.peek(register)
    }

    fn write(&mut self, register: Register, value: u32) {
        self.writes += 1;
        let mask = value as u8;
        match register {
            Register::Ena => {
                self.status.set(self.status.get() | mask);
                self.pending.set(self.pending.get() & !mask);
            }
            Register::Dis => {
                let pending = self.pending.get() | (mask & self.status.get());
                self.pending.set(pending);
                self.countdown.set(self.disable_latency);
                if self.disable_latency == 0 {
                    self.tick();
                }
            }
            Register::Sr => (),
            _ => self.words[register.offset() / 4] = value,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enable_and_delayed_disable() {
        let mut regs = MockRegisters::new().with_disable_latency(2);
        regs.write(Register::Ena, 0b101);
        assert_eq!(regs.read(Register::Sr), 0b101);
        regs.write(Register::Dis, 0b001);
        assert_eq!(regs.read(Register::Sr), 0b101);
        assert_eq!(regs.read(Register::Sr), 0b101);
        assert_eq!(regs.read(Register::Sr), 0b100);
        assert_eq!(regs.writes(), 2);
    }

    #[test]
    fn stuck_disable_never_completes() {
        let mut regs = MockRegisters::new().stuck();
        regs.write(Register::Ena, 1);
        regs.write(Register::Dis, 1);
        for _ in 0..100 {
            assert_eq!(regs.read(Register::Sr), 1);
        }
    }
}
