//! Hardware abstraction traits
//!
//! These traits define the interface between the core logic and the
//! hardware drivers. Implementations live in `gantry-drivers`; tests use
//! in-memory mocks.

mod endstop;
mod indicator;
mod magnet;
mod motor;
mod mux;

pub use endstop::EndStops;
pub use indicator::TurnIndicator;
pub use magnet::Magnet;
pub use motor::{Axis, Direction, Motor, MotorOutputs};
pub use mux::{MuxBank, MUX_CHANNELS, MUX_COUNT};
