//! PWM electromagnet

use gantry_core::traits::Magnet;
use gantry_hal::PwmOutput;

/// Electromagnet behind a PWM-driven MOSFET
pub struct Electromagnet<P> {
    pwm: P,
}

impl<P: PwmOutput> Electromagnet<P> {
    /// Wrap a PWM channel; the magnet starts off
    pub fn new(pwm: P) -> Self {
        let mut magnet = Self { pwm };
        magnet.pwm.off();
        magnet
    }
}

impl<P: PwmOutput> Magnet for Electromagnet<P> {
    fn set_power(&mut self, percent: u8) {
        self.pwm.set_duty_percent(percent.min(100));
    }

    fn power(&self) -> u8 {
        self.pwm.duty_percent()
    }
}
