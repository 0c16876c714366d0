use super::{Channel, Pwm, Registers};

/// Single PWM channel, borrowed from the [driver][Pwm].
///
/// Implements [embedded_hal::PwmPin], with the channel period as maximum duty.
pub struct PwmChannel<'a, R: Registers> {
    pwm: &'a mut Pwm<R>,
    channel: Channel,
}

impl<'a, R: Registers> PwmChannel<'a, R> {
    #[inline]
    pub(crate) fn new(pwm: &'a mut Pwm<R>, channel: Channel) -> Self {
        Self { pwm, channel }
    }

    #[inline]
    pub fn channel(&self) -> Channel {
        self.channel
    }
}

impl<'a, R: Registers> embedded_hal::PwmPin for PwmChannel<'a, R> {
    type Duty = u16;

    #[inline]
    fn disable(&mut self) {
        if let Err(e) = self.pwm.disable(self.channel) {
            warn!("pwm: {}", e);
        }
    }

    #[inline]
    fn enable(&mut self) {
        self.pwm.enable(self.channel);
    }

    #[inline]
    fn get_duty(&self) -> u16 {
        self.pwm.duty_cycle(self.channel)
    }

    #[inline]
    fn get_max_duty(&self) -> u16 {
        self.pwm.period(self.channel)
    }

    /// Duty cycles above the period are clamped.
    #[inline]
    fn set_duty(&mut self, duty: u16) {
        let duty = duty.min(self.get_max_duty());
        if let Err(e) = self.pwm.set_duty_cycle(self.channel, duty) {
            warn!("pwm: {}", e);
        }
    }
}
