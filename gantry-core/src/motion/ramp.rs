//! Trapezoidal step-delay profile
//!
//! Delays are in microseconds between step pulses: `min_delay_us` is the
//! slowest rate (start and end of a move), `max_delay_us` the cruise rate.
//!
//! ```text
//! delay
//!  min ┤╲                    ╱
//!      │ ╲                  ╱
//!  max ┤  ╲________________╱
//!      └──┬────────────────┬──► step index
//!       accel            total - decel
//! ```
//!
//! The deceleration ramp counts the steps still to go after the current
//! one. Where both ramps apply (short moves), the slower delay wins, so the
//! profile of a move is mirror-symmetric when `accel == decel`.

/// Ramp parameter errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RampError {
    /// Cruise delay must be strictly shorter than the start/stop delay
    DelaysNotOrdered,
}

/// Immutable ramp parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RampParameters {
    accel_steps: u32,
    decel_steps: u32,
    min_delay_us: u32,
    max_delay_us: u32,
}

impl Default for RampParameters {
    fn default() -> Self {
        Self {
            accel_steps: 1000,
            decel_steps: 1000,
            min_delay_us: 1200,
            max_delay_us: 100,
        }
    }
}

impl RampParameters {
    /// Validate and build ramp parameters
    pub const fn new(
        accel_steps: u32,
        decel_steps: u32,
        min_delay_us: u32,
        max_delay_us: u32,
    ) -> Result<Self, RampError> {
        if max_delay_us >= min_delay_us {
            return Err(RampError::DelaysNotOrdered);
        }
        Ok(Self {
            accel_steps,
            decel_steps,
            min_delay_us,
            max_delay_us,
        })
    }

    pub fn accel_steps(&self) -> u32 {
        self.accel_steps
    }

    pub fn decel_steps(&self) -> u32 {
        self.decel_steps
    }

    /// Slowest delay (start/stop)
    pub fn min_delay_us(&self) -> u32 {
        self.min_delay_us
    }

    /// Fastest delay (cruise)
    pub fn max_delay_us(&self) -> u32 {
        self.max_delay_us
    }

    /// Delay after step `index` of a `total`-step move
    pub fn delay_us(&self, index: u32, total: u32) -> u32 {
        let mut delay = self.max_delay_us;

        if index < self.accel_steps {
            delay = delay.max(self.interpolate(index, self.accel_steps));
        }

        let remaining = total.saturating_sub(1).saturating_sub(index);
        if remaining < self.decel_steps {
            delay = delay.max(self.interpolate(remaining, self.decel_steps));
        }

        delay.clamp(self.max_delay_us, self.min_delay_us)
    }

    /// `min - (min - max) * pos / len`, for `pos < len`
    fn interpolate(&self, pos: u32, len: u32) -> u32 {
        let span = u64::from(self.min_delay_us - self.max_delay_us);
        let drop = span * u64::from(pos) / u64::from(len);
        // drop < span because pos < len
        self.min_delay_us - drop as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_rejects_unordered_delays() {
        assert_eq!(
            RampParameters::new(10, 10, 100, 100),
            Err(RampError::DelaysNotOrdered)
        );
        assert_eq!(
            RampParameters::new(10, 10, 100, 200),
            Err(RampError::DelaysNotOrdered)
        );
        assert!(RampParameters::new(0, 0, 200, 100).is_ok());
    }

    #[test]
    fn test_long_move_profile() {
        let ramp = RampParameters::default();
        let total = 5000;

        assert_eq!(ramp.delay_us(0, total), 1200);
        assert_eq!(ramp.delay_us(500, total), 650);
        assert_eq!(ramp.delay_us(1000, total), 100);
        assert_eq!(ramp.delay_us(2500, total), 100);
        assert_eq!(ramp.delay_us(total - 1, total), 1200);
        assert_eq!(ramp.delay_us(total - 501, total), 650);
    }

    #[test]
    fn test_short_move_never_cruises() {
        let ramp = RampParameters::default();
        let total = 800;

        for i in 0..total {
            assert!(ramp.delay_us(i, total) > 100);
        }
        // Same timing as a long move at the same index during the first half
        assert_eq!(ramp.delay_us(100, total), ramp.delay_us(100, 10_000));
    }

    #[test]
    fn test_single_step() {
        let ramp = RampParameters::default();
        assert_eq!(ramp.delay_us(0, 1), 1200);
    }

    #[test]
    fn test_zero_length_ramps_cruise() {
        let ramp = RampParameters::new(0, 0, 1200, 100).unwrap();
        assert_eq!(ramp.delay_us(0, 10), 100);
        assert_eq!(ramp.delay_us(9, 10), 100);
    }

    fn ramp_strategy() -> impl Strategy<Value = RampParameters> {
        (0u32..2000, 0u32..2000, 1u32..5000, 1u32..5000).prop_map(|(a, d, x, y)| {
            let (min, max) = if x == y { (x + 1, x) } else { (x.max(y), x.min(y)) };
            RampParameters::new(a, d, min, max).unwrap()
        })
    }

    proptest! {
        #[test]
        fn test_delay_within_bounds(ramp in ramp_strategy(), total in 1u32..10_000, frac in 0.0f64..1.0) {
            let i = ((total as f64) * frac) as u32;
            let i = i.min(total - 1);
            let delay = ramp.delay_us(i, total);
            prop_assert!(delay >= ramp.max_delay_us());
            prop_assert!(delay <= ramp.min_delay_us());
        }

        #[test]
        fn test_symmetric_when_ramps_equal(steps in 0u32..2000, min in 101u32..5000, total in 1u32..6000, frac in 0.0f64..1.0) {
            let ramp = RampParameters::new(steps, steps, min, 100).unwrap();
            let i = (((total as f64) * frac) as u32).min(total - 1);
            prop_assert_eq!(ramp.delay_us(i, total), ramp.delay_us(total - 1 - i, total));
        }

        #[test]
        fn test_accel_non_increasing(total in 2u32..4000) {
            let ramp = RampParameters::default();
            let half = total / 2;
            for i in 1..half {
                prop_assert!(ramp.delay_us(i, total) <= ramp.delay_us(i - 1, total));
            }
        }
    }
}
