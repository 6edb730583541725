//! Mock pins for driver tests

use core::cell::Cell;

use gantry_hal::{InputPin, OutputPin, PwmOutput};

/// Output pin that remembers its level
pub struct MockPin {
    high: bool,
    pub edges: u32,
}

impl MockPin {
    pub fn new() -> Self {
        Self {
            high: false,
            edges: 0,
        }
    }
}

impl OutputPin for MockPin {
    fn set_high(&mut self) {
        if !self.high {
            self.edges += 1;
        }
        self.high = true;
    }

    fn set_low(&mut self) {
        self.high = false;
    }

    fn is_set_high(&self) -> bool {
        self.high
    }
}

/// Output pin mirrored into a shared cell
pub struct SharedPin<'a> {
    pub cell: &'a Cell<bool>,
}

impl OutputPin for SharedPin<'_> {
    fn set_high(&mut self) {
        self.cell.set(true);
    }

    fn set_low(&mut self) {
        self.cell.set(false);
    }

    fn is_set_high(&self) -> bool {
        self.cell.get()
    }
}

/// Input pin with a fixed level
pub struct MockInput {
    pub high: Cell<bool>,
}

impl MockInput {
    pub fn new(high: bool) -> Self {
        Self {
            high: Cell::new(high),
        }
    }
}

impl InputPin for MockInput {
    fn is_high(&self) -> bool {
        self.high.get()
    }
}

/// PWM channel that remembers its duty
pub struct MockPwm {
    pub percent: u8,
}

impl PwmOutput for MockPwm {
    fn set_duty_percent(&mut self, percent: u8) {
        self.percent = percent.min(100);
    }

    fn duty_percent(&self) -> u8 {
        self.percent
    }
}
