//! GPIO pin abstractions
//!
//! Infallible digital I/O. Step, direction, multiplexer select and LED
//! lines are outputs; end-stops and multiplexer signal lines are inputs.

/// Digital output pin
pub trait OutputPin {
    /// Set the pin high (logic 1)
    fn set_high(&mut self);

    /// Set the pin low (logic 0)
    fn set_low(&mut self);

    /// Set the pin to a specific level
    fn set_state(&mut self, high: bool) {
        if high {
            self.set_high();
        } else {
            self.set_low();
        }
    }

    /// Check if the pin is currently driven high
    fn is_set_high(&self) -> bool;
}

/// Digital input pin
pub trait InputPin {
    /// Check if the pin reads high (logic 1)
    fn is_high(&self) -> bool;

    /// Check if the pin reads low (logic 0)
    fn is_low(&self) -> bool {
        !self.is_high()
    }
}

/// Electrical level at which a signal counts as asserted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ActiveLevel {
    /// Asserted when the line is high
    #[default]
    High,
    /// Asserted when the line is low
    Low,
}

impl ActiveLevel {
    /// Build from an "inverted" config flag
    pub fn from_inverted(inverted: bool) -> Self {
        if inverted {
            ActiveLevel::Low
        } else {
            ActiveLevel::High
        }
    }

    /// Whether a raw line level means "asserted"
    pub fn is_asserted(self, line_high: bool) -> bool {
        match self {
            ActiveLevel::High => line_high,
            ActiveLevel::Low => !line_high,
        }
    }

    /// Line level that asserts (`true`) or deasserts (`false`) the signal
    pub fn line_level(self, asserted: bool) -> bool {
        self.is_asserted(asserted)
    }
}
