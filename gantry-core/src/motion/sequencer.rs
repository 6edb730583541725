//! Lock-step pulse generation for two motors
//!
//! A Bresenham accumulator spreads the minor motor's steps over the major
//! motor's. Every pulse advances at least one motor; diagonal pulses
//! advance both.

use super::kinematics::StepPlan;
use super::ramp::RampParameters;
use crate::traits::Direction;

/// One pulse of the sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Pulse {
    /// Pulse index within the move
    pub index: u32,
    /// Motor A steps on this pulse
    pub step_a: bool,
    /// Motor B steps on this pulse
    pub step_b: bool,
    /// Wait after the pulse, in microseconds
    pub delay_us: u32,
}

/// Iterator over the pulses of one move
#[derive(Debug, Clone)]
pub struct StepSequencer {
    ramp: RampParameters,
    dir_a: Direction,
    dir_b: Direction,
    da: i64,
    db: i64,
    err: i64,
    index: u32,
    total: u32,
}

impl StepSequencer {
    pub fn new(plan: StepPlan, ramp: RampParameters) -> Self {
        let da = i64::from(plan.motor_a.unsigned_abs());
        let db = i64::from(plan.motor_b.unsigned_abs());
        let err = (if da > db { da } else { -db }) / 2;

        Self {
            ramp,
            dir_a: Direction::from_steps(plan.motor_a),
            dir_b: Direction::from_steps(plan.motor_b),
            da,
            db,
            err,
            index: 0,
            total: plan.pulse_count(),
        }
    }

    pub fn dir_a(&self) -> Direction {
        self.dir_a
    }

    pub fn dir_b(&self) -> Direction {
        self.dir_b
    }

    /// Total pulses in the move
    pub fn total(&self) -> u32 {
        self.total
    }
}

impl Iterator for StepSequencer {
    type Item = Pulse;

    fn next(&mut self) -> Option<Pulse> {
        if self.index >= self.total {
            return None;
        }

        let e2 = self.err;
        let step_a = e2 > -self.da;
        if step_a {
            self.err -= self.db;
        }
        let step_b = e2 < self.db;
        if step_b {
            self.err += self.da;
        }

        let pulse = Pulse {
            index: self.index,
            step_a,
            step_b,
            delay_us: self.ramp.delay_us(self.index, self.total),
        };
        self.index += 1;
        Some(pulse)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = (self.total - self.index) as usize;
        (left, Some(left))
    }
}

impl ExactSizeIterator for StepSequencer {}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn counts(plan: StepPlan) -> (i32, i32, usize) {
        let seq = StepSequencer::new(plan, RampParameters::default());
        let (sa, sb) = (seq.dir_a().sign(), seq.dir_b().sign());
        let mut a = 0;
        let mut b = 0;
        let mut n = 0;
        for pulse in seq {
            a += i32::from(pulse.step_a) * sa;
            b += i32::from(pulse.step_b) * sb;
            n += 1;
        }
        (a, b, n)
    }

    #[test]
    fn test_uneven_line() {
        // dx=5, dy=2
        let plan = StepPlan::forward(5, 2);
        assert_eq!(counts(plan), (7, 3, 7));
    }

    #[test]
    fn test_pure_y_is_all_diagonal() {
        let seq = StepSequencer::new(StepPlan::forward(0, 10), RampParameters::default());
        assert_eq!(seq.dir_a(), Direction::Forward);
        assert_eq!(seq.dir_b(), Direction::Reverse);
        assert!(seq.clone().all(|p| p.step_a && p.step_b));
        assert_eq!(seq.len(), 10);
    }

    #[test]
    fn test_single_motor() {
        let seq = StepSequencer::new(StepPlan { motor_a: 0, motor_b: -3 }, RampParameters::default());
        for pulse in seq {
            assert!(!pulse.step_a);
            assert!(pulse.step_b);
        }
    }

    #[test]
    fn test_empty_plan() {
        let mut seq = StepSequencer::new(StepPlan::default(), RampParameters::default());
        assert_eq!(seq.total(), 0);
        assert!(seq.next().is_none());
    }

    #[test]
    fn test_delays_follow_ramp() {
        let ramp = RampParameters::default();
        let seq = StepSequencer::new(StepPlan::forward(3000, 0), ramp);
        for pulse in seq {
            assert_eq!(pulse.delay_us, ramp.delay_us(pulse.index, 3000));
        }
    }

    proptest! {
        #[test]
        fn test_pulse_accounting(a in -20_000i32..20_000, b in -20_000i32..20_000) {
            let plan = StepPlan { motor_a: a, motor_b: b };
            let (sum_a, sum_b, n) = counts(plan);
            prop_assert_eq!(n as u32, a.unsigned_abs().max(b.unsigned_abs()));
            prop_assert_eq!(sum_a, a);
            prop_assert_eq!(sum_b, b);
        }

        #[test]
        fn test_every_pulse_moves_something(a in -5_000i32..5_000, b in -5_000i32..5_000) {
            let seq = StepSequencer::new(StepPlan { motor_a: a, motor_b: b }, RampParameters::default());
            for pulse in seq {
                prop_assert!(pulse.step_a || pulse.step_b);
            }
        }
    }
}
