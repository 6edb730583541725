//! Pins with a configured active level

use gantry_hal::{ActiveLevel, InputPin, OutputPin};

/// Output that is "on" at a configured line level
pub struct LevelOutput<P> {
    pin: P,
    level: ActiveLevel,
}

impl<P: OutputPin> LevelOutput<P> {
    /// Wrap a pin and drive it to the inactive level
    pub fn new(pin: P, level: ActiveLevel) -> Self {
        let mut out = Self { pin, level };
        out.set_active(false);
        out
    }

    pub fn set_active(&mut self, active: bool) {
        self.pin.set_state(self.level.line_level(active));
    }

    pub fn is_active(&self) -> bool {
        self.level.is_asserted(self.pin.is_set_high())
    }

    pub fn pin(&self) -> &P {
        &self.pin
    }
}

/// Input that is "on" at a configured line level
pub struct LevelInput<P> {
    pin: P,
    level: ActiveLevel,
}

impl<P: InputPin> LevelInput<P> {
    pub fn new(pin: P, level: ActiveLevel) -> Self {
        Self { pin, level }
    }

    pub fn is_active(&self) -> bool {
        self.level.is_asserted(self.pin.is_high())
    }
}
