//! GPIO wrappers implementing the shared pin traits

use embassy_rp::gpio::{AnyPin, Input, Level, Output, Pull};
use embassy_rp::Peri;
use gantry_hal::gpio::{InputPin, OutputPin};

/// Push-pull output, starts low
pub struct RpOutput<'d> {
    pin: Output<'d>,
}

impl<'d> RpOutput<'d> {
    pub fn new(pin: Peri<'d, AnyPin>) -> Self {
        Self {
            pin: Output::new(pin, Level::Low),
        }
    }
}

impl OutputPin for RpOutput<'_> {
    fn set_high(&mut self) {
        self.pin.set_high();
    }

    fn set_low(&mut self) {
        self.pin.set_low();
    }

    fn is_set_high(&self) -> bool {
        self.pin.is_set_high()
    }
}

/// Digital input
pub struct RpInput<'d> {
    pin: Input<'d>,
}

impl<'d> RpInput<'d> {
    /// Input with the internal pull-up enabled
    pub fn pull_up(pin: Peri<'d, AnyPin>) -> Self {
        Self {
            pin: Input::new(pin, Pull::Up),
        }
    }

    /// Input with no internal pull
    pub fn floating(pin: Peri<'d, AnyPin>) -> Self {
        Self {
            pin: Input::new(pin, Pull::None),
        }
    }
}

impl InputPin for RpInput<'_> {
    fn is_high(&self) -> bool {
        self.pin.is_high()
    }
}
