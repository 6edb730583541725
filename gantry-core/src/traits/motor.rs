//! Step/direction motor outputs

/// One of the two CoreXY belt motors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Motor {
    A,
    B,
}

/// Cartesian axis
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Axis {
    X,
    Y,
}

/// Motor rotation direction
///
/// `Forward` drives the direction line high (before any wiring inversion).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
    #[default]
    Forward,
    Reverse,
}

impl Direction {
    /// Direction for a signed step count (zero counts as forward)
    pub fn from_steps(steps: i32) -> Self {
        if steps >= 0 {
            Direction::Forward
        } else {
            Direction::Reverse
        }
    }

    /// Signed unit step
    pub fn sign(self) -> i32 {
        match self {
            Direction::Forward => 1,
            Direction::Reverse => -1,
        }
    }

    /// Logic level for the direction line
    pub fn is_high(self) -> bool {
        matches!(self, Direction::Forward)
    }
}

/// Step and direction lines for both motors
pub trait MotorOutputs {
    /// Set the direction line of a motor
    fn set_direction(&mut self, motor: Motor, direction: Direction);

    /// Drive the step line of a motor
    fn set_step(&mut self, motor: Motor, high: bool);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_from_steps() {
        assert_eq!(Direction::from_steps(5), Direction::Forward);
        assert_eq!(Direction::from_steps(0), Direction::Forward);
        assert_eq!(Direction::from_steps(-1), Direction::Reverse);
        assert_eq!(Direction::Reverse.sign(), -1);
        assert!(Direction::Forward.is_high());
    }
}
