//! Electromagnet power

/// PWM-controlled electromagnet
pub trait Magnet {
    /// Set power in percent (values above 100 are clamped)
    fn set_power(&mut self, percent: u8);

    /// Current power in percent
    fn power(&self) -> u8;

    /// Release the magnet
    fn off(&mut self) {
        self.set_power(0);
    }
}
