//! Step/direction driver pair (A4988, DRV8825, TMC in standalone mode)
//!
//! Each driver has a STEP input that advances one microstep per rising
//! edge and a DIR input. Direction inversion is a wiring property and is
//! taken from the pin configuration.

use gantry_core::traits::{Direction, Motor, MotorOutputs};
use gantry_hal::{ActiveLevel, OutputPin};

use crate::level::LevelOutput;

/// Step and direction lines of one driver
pub struct StepDirMotor<P> {
    step: LevelOutput<P>,
    dir: LevelOutput<P>,
}

impl<P: OutputPin> StepDirMotor<P> {
    /// `invert_dir` swaps the meaning of forward and reverse
    pub fn new(step: P, dir: P, invert_dir: bool) -> Self {
        Self {
            step: LevelOutput::new(step, ActiveLevel::High),
            dir: LevelOutput::new(dir, ActiveLevel::from_inverted(invert_dir)),
        }
    }

    fn set_direction(&mut self, direction: Direction) {
        self.dir.set_active(direction.is_high());
    }

    fn set_step(&mut self, high: bool) {
        self.step.set_active(high);
    }
}

/// Both CoreXY motors
pub struct StepDirPair<P> {
    a: StepDirMotor<P>,
    b: StepDirMotor<P>,
}

impl<P: OutputPin> StepDirPair<P> {
    pub fn new(a: StepDirMotor<P>, b: StepDirMotor<P>) -> Self {
        Self { a, b }
    }

    fn motor(&mut self, motor: Motor) -> &mut StepDirMotor<P> {
        match motor {
            Motor::A => &mut self.a,
            Motor::B => &mut self.b,
        }
    }
}

impl<P: OutputPin> MotorOutputs for StepDirPair<P> {
    fn set_direction(&mut self, motor: Motor, direction: Direction) {
        self.motor(motor).set_direction(direction);
    }

    fn set_step(&mut self, motor: Motor, high: bool) {
        self.motor(motor).set_step(high);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockPin;

    fn pair(invert_b: bool) -> StepDirPair<MockPin> {
        StepDirPair::new(
            StepDirMotor::new(MockPin::new(), MockPin::new(), false),
            StepDirMotor::new(MockPin::new(), MockPin::new(), invert_b),
        )
    }

    #[test]
    fn test_direction_lines() {
        let mut p = pair(true);
        p.set_direction(Motor::A, Direction::Forward);
        p.set_direction(Motor::B, Direction::Forward);

        assert!(p.a.dir.pin().is_set_high());
        // Inverted wiring drives the line low for forward
        assert!(!p.b.dir.pin().is_set_high());

        p.set_direction(Motor::B, Direction::Reverse);
        assert!(p.b.dir.pin().is_set_high());
    }

    #[test]
    fn test_step_edges() {
        let mut p = pair(false);
        for _ in 0..3 {
            p.set_step(Motor::A, true);
            p.set_step(Motor::A, false);
        }
        assert_eq!(p.a.step.pin().edges, 3);
        assert_eq!(p.b.step.pin().edges, 0);
        assert!(!p.a.step.pin().is_set_high());
    }
}
