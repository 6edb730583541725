//! Configuration loading
//!
//! `machine.toml` is embedded at compile time and parsed at boot by the
//! allocation-free parser in gantry-core. build.rs has already rejected
//! malformed files, so the fallback below only matters while editing.

use defmt::*;
use gantry_core::config::{parse_config, MachineConfig};

/// Embedded configuration (compiled into firmware)
/// Edit machine.toml and rebuild to customize
const EMBEDDED_CONFIG: &str = include_str!("../../machine.toml");

/// Parse the embedded configuration, falling back to defaults
pub fn load_config() -> MachineConfig {
    match parse_config(EMBEDDED_CONFIG) {
        Ok(config) => {
            info!("Parsed embedded configuration successfully");
            config
        }
        Err(e) => {
            error!("Failed to parse embedded config: {}", e);
            error!("Using built-in defaults");
            MachineConfig::default()
        }
    }
}
