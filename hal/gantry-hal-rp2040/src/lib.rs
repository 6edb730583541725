//! RP2040-specific HAL for the gantry firmware
//!
//! This crate provides RP2040 implementations of the shared `gantry-hal`
//! traits, plus RP2040-specific functionality:
//!
//! - Dynamic pin allocation for config-driven setup
//! - GPIO wrappers for step/dir lines, end-stops, and the mux
//! - PWM output for the electromagnet
//! - I2C target configuration

#![no_std]

pub mod gpio;
pub mod i2c;
pub mod pins;
pub mod pwm;

pub use gpio::{RpInput, RpOutput};
pub use pins::{PinBank, PinError, RemainingPeripherals};
pub use pwm::MagnetPwm;
