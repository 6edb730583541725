//! CoreXY motion
//!
//! A cartesian move is quantized to steps, transformed into belt-motor
//! space, and played out as a lock-step pulse train with a trapezoidal
//! delay profile.
//!
//! ```text
//! Position ──► kinematics ──► StepPlan (a, b) ──► StepSequencer ──► Pulse*
//!                                                     ▲
//!                                               RampProfile
//! ```

pub mod engine;
pub mod homing;
pub mod kinematics;
pub mod position;
pub mod ramp;
pub mod sequencer;

pub use engine::{MotionEngine, MotionError, MotionRequest};
pub use homing::{HomingConfig, HomingController, HomingDirections};
pub use kinematics::{Kinematics, StepPlan, MAX_TRAVEL_STEPS};
pub use position::Position;
pub use ramp::{RampError, RampParameters};
pub use sequencer::{Pulse, StepSequencer};
