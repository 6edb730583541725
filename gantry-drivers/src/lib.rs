//! Hardware driver implementations
//!
//! This crate provides concrete implementations of the traits defined
//! in gantry-core, written against the `gantry-hal` pin traits:
//!
//! - Step/direction driver pair for the CoreXY motors
//! - End-stop switches
//! - CD74HC4067 multiplexer bank for the square sensors
//! - PWM electromagnet
//! - Turn indicator LEDs

#![no_std]
#![deny(unsafe_code)]

pub mod endstop;
pub mod led;
pub mod level;
pub mod magnet;
pub mod mux;
pub mod stepper;

#[cfg(test)]
extern crate std;

#[cfg(test)]
pub(crate) mod mock;
