//! Homing against the end-stops
//!
//! Each axis is driven in a fixed motor-space direction at the slowest
//! ramp rate until its end-stop triggers. The search is bounded by
//! `max_steps` pulses per axis.

use embedded_hal_async::delay::DelayNs;

use super::MotionError;
use crate::traits::{Axis, Direction, EndStops, Motor, MotorOutputs};

/// Motor directions that move the carriage toward one end-stop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct HomingDirections {
    pub motor_a: Direction,
    pub motor_b: Direction,
}

/// Homing configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct HomingConfig {
    /// Directions for the X search
    pub x: HomingDirections,
    /// Directions for the Y search
    pub y: HomingDirections,
    /// Pause after each end-stop triggers
    pub settle_ms: u32,
    /// Give up after this many pulses on one axis
    pub max_steps: u32,
}

impl Default for HomingConfig {
    fn default() -> Self {
        Self {
            x: HomingDirections {
                motor_a: Direction::Reverse,
                motor_b: Direction::Forward,
            },
            y: HomingDirections {
                motor_a: Direction::Forward,
                motor_b: Direction::Reverse,
            },
            settle_ms: 200,
            max_steps: 60_000,
        }
    }
}

impl HomingConfig {
    pub fn directions(&self, axis: Axis) -> HomingDirections {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
        }
    }
}

/// Drives one axis at a time into its end-stop
#[derive(Debug, Clone, Copy)]
pub struct HomingController {
    config: HomingConfig,
    step_delay_us: u32,
    pulse_width_us: u32,
}

impl HomingController {
    pub fn new(config: HomingConfig, step_delay_us: u32, pulse_width_us: u32) -> Self {
        Self {
            config,
            step_delay_us,
            pulse_width_us,
        }
    }

    pub fn config(&self) -> &HomingConfig {
        &self.config
    }

    /// Search for one end-stop, returning the number of pulses taken
    pub async fn home_axis<M, E, D>(
        &self,
        axis: Axis,
        motors: &mut M,
        endstops: &mut E,
        delay: &mut D,
    ) -> Result<u32, MotionError>
    where
        M: MotorOutputs,
        E: EndStops,
        D: DelayNs,
    {
        let dirs = self.config.directions(axis);
        motors.set_direction(Motor::A, dirs.motor_a);
        motors.set_direction(Motor::B, dirs.motor_b);

        let mut steps = 0u32;
        while !endstops.is_triggered(axis) {
            if steps >= self.config.max_steps {
                return Err(MotionError::HomingTimedOut(axis));
            }

            motors.set_step(Motor::A, true);
            motors.set_step(Motor::B, true);
            delay.delay_us(self.pulse_width_us).await;
            motors.set_step(Motor::A, false);
            motors.set_step(Motor::B, false);
            delay.delay_us(self.step_delay_us).await;

            steps += 1;
        }

        delay.delay_ms(self.config.settle_ms).await;
        Ok(steps)
    }
}
