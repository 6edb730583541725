//! Electromagnet PWM output
//!
//! The magnet driver sits on GPIO26, which is channel A of PWM slice 5.
//! The counter wraps at 255 so a duty level maps 1:1 onto an 8-bit value.

use embassy_rp::peripherals::{PIN_26, PWM_SLICE5};
use embassy_rp::pwm::{Config, Pwm};
use embassy_rp::Peri;
use gantry_hal::pwm::{percent_to_level, PwmOutput};

/// Counter wrap value
pub const PWM_TOP: u16 = 255;

/// Single-channel PWM driving the electromagnet
pub struct MagnetPwm<'d> {
    pwm: Pwm<'d>,
    config: Config,
    percent: u8,
}

impl<'d> MagnetPwm<'d> {
    /// Configure slice 5 channel A and start with the output off
    pub fn new(slice: Peri<'d, PWM_SLICE5>, pin: Peri<'d, PIN_26>) -> Self {
        let mut config = Config::default();
        config.top = PWM_TOP;
        config.compare_a = 0;

        let pwm = Pwm::new_output_a(slice, pin, config.clone());

        Self {
            pwm,
            config,
            percent: 0,
        }
    }
}

impl PwmOutput for MagnetPwm<'_> {
    fn set_duty_percent(&mut self, percent: u8) {
        let percent = percent.min(100);
        self.config.compare_a = percent_to_level(percent, PWM_TOP);
        self.pwm.set_config(&self.config);
        self.percent = percent;
    }

    fn duty_percent(&self) -> u8 {
        self.percent
    }
}
