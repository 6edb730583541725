//! Configuration types and parsing
//!
//! The machine is described by `machine.toml`, which is embedded in the
//! firmware image and parsed at boot without allocation.

pub mod parser;
pub mod types;

pub use crate::motion::{HomingConfig, HomingDirections};
pub use parser::{parse_config, ParseError};
pub use types::*;
