//! Board-agnostic core logic for the chessboard gantry firmware
//!
//! This crate contains all application logic that does not depend on
//! specific hardware implementations:
//!
//! - Hardware abstraction traits (motors, end-stops, magnet, mux, LEDs)
//! - CoreXY motion: ramp profile, transform, step sequencing, homing
//! - Board scanning and turn tracking
//! - Host protocol session state machine
//! - Configuration types and the `machine.toml` parser

#![no_std]
#![deny(unsafe_code)]

pub mod board;
pub mod config;
pub mod motion;
pub mod session;
pub mod traits;

#[cfg(test)]
extern crate std;
