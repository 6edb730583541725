//! End-stop switches

use super::Axis;

/// Homing switches for both axes
pub trait EndStops {
    /// True when the axis end-stop is triggered
    fn is_triggered(&mut self, axis: Axis) -> bool;
}
