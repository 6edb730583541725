//! CoreXY transform
//!
//! Both belt motors move the carriage:
//!
//! ```text
//! a = dx + dy        dx = (a + b) / 2
//! b = dx - dy        dy = (a - b) / 2
//! ```

use super::position::Position;
use super::MotionError;

/// Largest cartesian step delta accepted per axis
///
/// Keeps `dx ± dy` well inside `i32` for any payload.
pub const MAX_TRAVEL_STEPS: i32 = 1 << 24;

/// Motor-space step counts for one move
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StepPlan {
    pub motor_a: i32,
    pub motor_b: i32,
}

impl StepPlan {
    /// Cartesian step deltas to motor steps
    pub const fn forward(dx: i32, dy: i32) -> Self {
        Self {
            motor_a: dx + dy,
            motor_b: dx - dy,
        }
    }

    /// Motor steps back to cartesian step deltas
    pub const fn inverse(&self) -> (i32, i32) {
        (
            (self.motor_a + self.motor_b) / 2,
            (self.motor_a - self.motor_b) / 2,
        )
    }

    /// Number of pulses needed to play this plan
    pub fn pulse_count(&self) -> u32 {
        self.motor_a.unsigned_abs().max(self.motor_b.unsigned_abs())
    }

    pub fn is_empty(&self) -> bool {
        self.motor_a == 0 && self.motor_b == 0
    }
}

/// Millimetre to step conversion
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Kinematics {
    steps_per_mm: f32,
}

impl Kinematics {
    pub const fn new(steps_per_mm: f32) -> Self {
        Self { steps_per_mm }
    }

    pub fn steps_per_mm(&self) -> f32 {
        self.steps_per_mm
    }

    /// Quantize a distance, truncating toward zero
    pub fn to_steps(&self, mm: f32) -> Result<i32, MotionError> {
        let steps = mm * self.steps_per_mm;
        if !steps.is_finite() || steps.abs() >= MAX_TRAVEL_STEPS as f32 {
            return Err(MotionError::OutOfRange);
        }
        Ok(steps as i32)
    }

    /// Motor plan for a straight move between two positions
    pub fn plan(&self, from: Position, to: Position) -> Result<StepPlan, MotionError> {
        let dx = self.to_steps(to.x_mm - from.x_mm)?;
        let dy = self.to_steps(to.y_mm - from.y_mm)?;
        Ok(StepPlan::forward(dx, dy))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_pure_x_moves_both_motors_same_way() {
        let plan = StepPlan::forward(800, 0);
        assert_eq!(plan.motor_a, 800);
        assert_eq!(plan.motor_b, 800);
    }

    #[test]
    fn test_pure_y_moves_motors_opposite() {
        let plan = StepPlan::forward(0, 100);
        assert_eq!(plan.motor_a, 100);
        assert_eq!(plan.motor_b, -100);
        assert_eq!(plan.pulse_count(), 100);
    }

    #[test]
    fn test_truncates_toward_zero() {
        let k = Kinematics::new(80.0);
        assert_eq!(k.to_steps(0.019), Ok(1));
        assert_eq!(k.to_steps(-0.019), Ok(-1));
        assert_eq!(k.to_steps(0.01), Ok(0));
    }

    #[test]
    fn test_plan_between_positions() {
        let k = Kinematics::new(80.0);
        let plan = k
            .plan(Position::new(0.0, 0.0), Position::new(10.0, 0.0))
            .unwrap();
        assert_eq!(plan, StepPlan { motor_a: 800, motor_b: 800 });
    }

    #[test]
    fn test_rejects_huge_or_nan() {
        let k = Kinematics::new(80.0);
        assert_eq!(k.to_steps(1.0e9), Err(MotionError::OutOfRange));
        assert_eq!(k.to_steps(f32::NAN), Err(MotionError::OutOfRange));
    }

    proptest! {
        #[test]
        fn test_inverse_of_forward(dx in -MAX_TRAVEL_STEPS..MAX_TRAVEL_STEPS, dy in -MAX_TRAVEL_STEPS..MAX_TRAVEL_STEPS) {
            prop_assert_eq!(StepPlan::forward(dx, dy).inverse(), (dx, dy));
        }
    }
}
