//! End-stop switches

use gantry_core::traits::{Axis, EndStops};
use gantry_hal::InputPin;

use crate::level::LevelInput;

/// One switch per axis
pub struct SwitchEndStops<I> {
    x: LevelInput<I>,
    y: LevelInput<I>,
}

impl<I: InputPin> SwitchEndStops<I> {
    pub fn new(x: LevelInput<I>, y: LevelInput<I>) -> Self {
        Self { x, y }
    }
}

impl<I: InputPin> EndStops for SwitchEndStops<I> {
    fn is_triggered(&mut self, axis: Axis) -> bool {
        match axis {
            Axis::X => self.x.is_active(),
            Axis::Y => self.y.is_active(),
        }
    }
}
