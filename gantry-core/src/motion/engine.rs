//! Motion engine
//!
//! Owns the motor outputs, end-stops, electromagnet and the carriage
//! position. Everything that moves the carriage goes through here, and the
//! position is only written after a motion or homing completes.

use embedded_hal_async::delay::DelayNs;

use super::homing::HomingController;
use super::kinematics::{Kinematics, StepPlan};
use super::position::Position;
use super::ramp::RampParameters;
use super::sequencer::StepSequencer;
use crate::config::MachineConfig;
use crate::traits::{Axis, EndStops, Magnet, Motor, MotorOutputs};

/// Motion errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MotionError {
    /// Target is not a finite, reachable distance
    OutOfRange,
    /// End-stop never triggered within the homing step limit
    HomingTimedOut(Axis),
}

/// One straight leg of a move
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MotionRequest {
    pub start: Position,
    pub end: Position,
    pub engage_magnet: bool,
}

/// CoreXY motion engine
pub struct MotionEngine<M, E, G, D> {
    motors: M,
    endstops: E,
    magnet: G,
    delay: D,
    ramp: RampParameters,
    kinematics: Kinematics,
    homing: HomingController,
    pulse_width_us: u32,
    carry_power: u8,
    release_after_carry: bool,
    position: Position,
}

impl<M, E, G, D> MotionEngine<M, E, G, D>
where
    M: MotorOutputs,
    E: EndStops,
    G: Magnet,
    D: DelayNs,
{
    pub fn new(motors: M, endstops: E, magnet: G, delay: D, config: &MachineConfig) -> Self {
        let ramp = config.motion.ramp;
        Self {
            motors,
            endstops,
            magnet,
            delay,
            ramp,
            kinematics: Kinematics::new(config.kinematics.steps_per_mm()),
            homing: HomingController::new(
                config.homing,
                ramp.min_delay_us(),
                config.motion.pulse_width_us,
            ),
            pulse_width_us: config.motion.pulse_width_us,
            carry_power: config.magnet.carry_power,
            release_after_carry: config.magnet.release_after_carry,
            position: Position::ORIGIN,
        }
    }

    /// Last completed position
    pub fn position(&self) -> Position {
        self.position
    }

    /// Current electromagnet power
    pub fn magnet_power(&self) -> u8 {
        self.magnet.power()
    }

    /// Run one straight leg
    ///
    /// The magnet is set before any pulse and left as is afterwards.
    pub async fn move_to(&mut self, request: MotionRequest) -> Result<(), MotionError> {
        let plan = self.kinematics.plan(request.start, request.end)?;

        if request.engage_magnet {
            self.magnet.set_power(self.carry_power);
        } else {
            self.magnet.off();
        }

        self.run_plan(plan).await;
        self.position = request.end;
        Ok(())
    }

    /// Carry a piece: travel to `pick` unpowered, then to `drop` with the magnet on
    pub async fn carry(&mut self, pick: Position, drop: Position) -> Result<(), MotionError> {
        // Validate both legs before anything moves
        self.kinematics.plan(self.position, pick)?;
        self.kinematics.plan(pick, drop)?;

        self.move_to(MotionRequest {
            start: self.position,
            end: pick,
            engage_magnet: false,
        })
        .await?;
        self.move_to(MotionRequest {
            start: pick,
            end: drop,
            engage_magnet: true,
        })
        .await?;

        if self.release_after_carry {
            self.magnet.off();
        }
        Ok(())
    }

    /// Home X then Y, then zero the position
    ///
    /// On failure the position keeps its previous value.
    pub async fn home(&mut self) -> Result<(), MotionError> {
        self.magnet.off();

        for axis in [Axis::X, Axis::Y] {
            self.homing
                .home_axis(axis, &mut self.motors, &mut self.endstops, &mut self.delay)
                .await?;
        }

        self.position = Position::ORIGIN;
        Ok(())
    }

    async fn run_plan(&mut self, plan: StepPlan) {
        let sequencer = StepSequencer::new(plan, self.ramp);
        self.motors.set_direction(Motor::A, sequencer.dir_a());
        self.motors.set_direction(Motor::B, sequencer.dir_b());

        for pulse in sequencer {
            if pulse.step_a {
                self.motors.set_step(Motor::A, true);
            }
            if pulse.step_b {
                self.motors.set_step(Motor::B, true);
            }
            self.delay.delay_us(self.pulse_width_us).await;
            self.motors.set_step(Motor::A, false);
            self.motors.set_step(Motor::B, false);
            self.delay.delay_us(pulse.delay_us).await;
        }
    }
}
