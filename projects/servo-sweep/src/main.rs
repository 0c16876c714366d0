#![no_main]
#![no_std]

extern crate panic_halt;

use cortex_m_rt::entry;
use cortex_m_semihosting::hprintln;
use embedded_hal::blocking::delay::DelayMs;
use embedded_hal::PwmPin;
use sam3x::{clock, delay, pwm, watchdog};
use sam3x8e::Peripherals as DevicePeripherals;

/// Servo signal: PWMH0 on PC3 (Arduino Due pin 35).
const SERVO: pwm::Channel = pwm::Channel::C0;

/// Status LED dimming: PWMH1 on PC5 (Arduino Due pin 37).
const LED: pwm::Channel = pwm::Channel::C1;

/// Shared clock A ticks every microsecond: 84MHz / 4 / 21.
const SERVO_CLOCK: pwm::ClockConfig = pwm::ClockConfig {
    prescaler: pwm::Prescaler::Div4,
    divisor: 21,
};

/// Servo frame and pulse limits, in microseconds.
const SERVO_FRAME: u16 = 20_000;
const SERVO_MIN: u16 = 1_000;
const SERVO_MAX: u16 = 2_000;
const SERVO_STEP: u16 = 10;

/// LED PWM frequency.
const LED_FREQUENCY: u32 = 20_000;

#[entry]
fn main() -> ! {
    if cfg!(debug_assertions) {
        hprintln!("Hello servo!").unwrap();
    }

    // System setup:
    unsafe {
        watchdog::disable();
        clock::init();
        clock::enable_pwm();
    }

    // Hand PC3 and PC5 over to peripheral B, the PWM outputs.
    let dp = unsafe { DevicePeripherals::steal() };
    dp.PIOC.pio_absr.modify(|_, w| w.p3().set_bit().p5().set_bit());
    dp.PIOC.pio_pdr.write(|w| w.p3().set_bit().p5().set_bit());

    let mut pwm = match pwm::Config::default().make(unsafe { pwm::Mmio::steal() }) {
        Ok(pwm) => pwm,
        Err(e) => halt(e),
    };
    // Start from a known state, then bring up the servo clock.
    if let Err(e) = pwm.reset_peripheral() {
        halt(e);
    }
    let clocks = pwm::ClockSettings {
        clock_a: Some(SERVO_CLOCK),
        clock_b: None,
    };
    if let Err(e) = pwm.init_peripheral(clocks) {
        halt(e);
    }

    // Servo: one microsecond per count, one frame per period.
    let servo = pwm::ChannelConfig {
        channel: SERVO,
        frequency: 1_000_000,
        alignment: pwm::Alignment::Left,
        polarity: pwm::Polarity::Inverted,
        duty_cycle: SERVO_MIN,
        source: pwm::ClockSource::Shared {
            clock: pwm::ClockId::A,
            period: SERVO_FRAME,
        },
    };
    if let Err(e) = servo.make(&mut pwm) {
        halt(e);
    }

    // LED: channel prescaler, center aligned.
    let led = pwm::ChannelConfig {
        channel: LED,
        frequency: LED_FREQUENCY,
        alignment: pwm::Alignment::Center,
        polarity: pwm::Polarity::Inverted,
        duty_cycle: 0,
        source: pwm::ClockSource::Local,
    };
    if let Err(e) = led.make(&mut pwm) {
        halt(e);
    }
    if cfg!(debug_assertions) {
        hprintln!("LED period: {}", pwm.period(LED)).unwrap();
    }

    pwm.enable_channels(SERVO.mask() | LED.mask());

    // Entering main loop: sweep the servo, LED brightness follows.
    let mut delay = delay::Delay;
    let mut pulse = SERVO_MIN;
    let mut rising = true;
    loop {
        pulse = if rising {
            pulse + SERVO_STEP
        } else {
            pulse - SERVO_STEP
        };
        if pulse >= SERVO_MAX || pulse <= SERVO_MIN {
            rising = !rising;
        }

        // Update registers: applied at the next frame.
        pwm.pin(SERVO).set_duty(pulse);

        let mut led_pin = pwm.pin(LED);
        let max = u32::from(led_pin.get_max_duty());
        let level = u32::from(pulse - SERVO_MIN) * max / u32::from(SERVO_MAX - SERVO_MIN);
        led_pin.set_duty(level as u16);

        delay.delay_ms(SERVO_FRAME / 1_000);
    }
}

/// Report a driver error and stop.
fn halt(e: sam3x::Error) -> ! {
    if cfg!(debug_assertions) {
        hprintln!("PWM error: {}", e).unwrap();
    }
    loop {
        delay::millis(1_000);
    }
}
