//! PWM output abstraction
//!
//! The electromagnet is driven through a MOSFET whose gate is fed by a
//! PWM channel. Power is expressed in percent; implementations map it
//! onto their counter resolution.

/// PWM channel with percent duty control
pub trait PwmOutput {
    /// Set the duty cycle in percent (values above 100 are clamped)
    fn set_duty_percent(&mut self, percent: u8);

    /// Current duty cycle in percent
    fn duty_percent(&self) -> u8;

    /// Drive the output fully off
    fn off(&mut self) {
        self.set_duty_percent(0);
    }
}

/// Convert a percentage to a compare level for a counter wrapping at `top`
///
/// Uses integer math so `100%` maps to exactly `top` and `0%` to `0`.
pub fn percent_to_level(percent: u8, top: u16) -> u16 {
    let percent = percent.min(100) as u32;
    (percent * top as u32 / 100) as u16
}
