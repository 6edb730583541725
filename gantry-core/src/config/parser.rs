//! Simple TOML parser for machine configuration
//!
//! This is a minimal, allocation-free parser for the subset of TOML that
//! `machine.toml` uses. It does NOT support the full TOML spec.
//!
//! Supported features:
//! - Key = value pairs (string, integer, float, boolean)
//! - [section] headers
//! - Single-line arrays of pin strings: `select = ["gpio14", "gpio15"]`
//! - Comments (# ...)
//!
//! Unknown keys are ignored; unknown sections are an error.

use heapless::Vec;

use super::types::{MachineConfig, MuxWiring, PinConfig, MAX_MUX_LINES};
use super::ConfigError;
use crate::motion::RampParameters;
use crate::traits::Direction;

/// Parse error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParseError {
    /// Invalid section header
    InvalidSection,
    /// Invalid value type
    InvalidValue,
    /// Too many items (exceeded heapless capacity)
    TooManyItems,
    /// Invalid pin string
    InvalidPin,
    /// Ramp delays are not ordered (cruise must be faster than start)
    InvalidRamp,
    /// Values parse but do not fit together
    Inconsistent(ConfigError),
}

/// Current parsing context
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Root,
    Bus,
    Motion,
    Kinematics,
    Homing,
    Pins,
    Mux,
    Magnet,
    Board,
}

/// Ramp values are validated together once the whole file is read
#[derive(Default)]
struct RampFields {
    accel_steps: Option<u32>,
    decel_steps: Option<u32>,
    min_delay_us: Option<u32>,
    max_delay_us: Option<u32>,
}

/// Parse TOML configuration into MachineConfig
pub fn parse_config(input: &str) -> Result<MachineConfig, ParseError> {
    let mut config = MachineConfig::default();
    let mut section = Section::Root;
    let mut ramp = RampFields::default();

    for line in input.lines() {
        let line = line.trim();

        // Skip empty lines and comments
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if line.starts_with('[') && line.ends_with(']') {
            section = parse_section_header(&line[1..line.len() - 1])?;
            continue;
        }

        if let Some((key, value)) = parse_key_value(line) {
            apply_value(section, key, value, &mut config, &mut ramp)?;
        }
    }

    let defaults = config.motion.ramp;
    config.motion.ramp = RampParameters::new(
        ramp.accel_steps.unwrap_or(defaults.accel_steps()),
        ramp.decel_steps.unwrap_or(defaults.decel_steps()),
        ramp.min_delay_us.unwrap_or(defaults.min_delay_us()),
        ramp.max_delay_us.unwrap_or(defaults.max_delay_us()),
    )
    .map_err(|_| ParseError::InvalidRamp)?;

    config.validate().map_err(ParseError::Inconsistent)?;
    Ok(config)
}

/// Parse section header like "motion" or "mux"
fn parse_section_header(header: &str) -> Result<Section, ParseError> {
    match header.trim() {
        "bus" => Ok(Section::Bus),
        "motion" => Ok(Section::Motion),
        "kinematics" => Ok(Section::Kinematics),
        "homing" => Ok(Section::Homing),
        "pins" => Ok(Section::Pins),
        "mux" => Ok(Section::Mux),
        "magnet" => Ok(Section::Magnet),
        "board" => Ok(Section::Board),
        _ => Err(ParseError::InvalidSection),
    }
}

/// Parse "key = value" line
fn parse_key_value(line: &str) -> Option<(&str, &str)> {
    let eq_pos = line.find('=')?;
    let key = line[..eq_pos].trim();
    let value = line[eq_pos + 1..].trim();

    // Remove inline comments
    let value = if let Some(hash_pos) = value.find('#') {
        // Make sure # is not inside a string
        let quote_count = value[..hash_pos].matches('"').count();
        if quote_count % 2 == 0 {
            value[..hash_pos].trim()
        } else {
            value
        }
    } else {
        value
    };

    if key.is_empty() || value.is_empty() {
        return None;
    }

    Some((key, value))
}

/// Parse a string value (removes quotes)
fn parse_string(value: &str) -> &str {
    if value.starts_with('"') && value.ends_with('"') && value.len() >= 2 {
        &value[1..value.len() - 1]
    } else {
        // Allow unquoted strings for simple values
        value
    }
}

/// Parse an integer value, accepting a `0x` prefix
fn parse_int<T: core::str::FromStr + TryFrom<u32>>(value: &str) -> Result<T, ParseError> {
    if let Some(hex) = value.strip_prefix("0x") {
        let raw = u32::from_str_radix(hex, 16).map_err(|_| ParseError::InvalidValue)?;
        return T::try_from(raw).map_err(|_| ParseError::InvalidValue);
    }
    value.parse().map_err(|_| ParseError::InvalidValue)
}

/// Parse a float value
fn parse_float(value: &str) -> Result<f32, ParseError> {
    value.parse().map_err(|_| ParseError::InvalidValue)
}

/// Parse a boolean value
fn parse_bool(value: &str) -> Result<bool, ParseError> {
    match value {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(ParseError::InvalidValue),
    }
}

/// Parse a pin string like "gpio11", "!gpio12", "^gpio4"
fn parse_pin(value: &str) -> Result<PinConfig, ParseError> {
    let mut s = parse_string(value.trim());
    let mut inverted = false;
    let mut pull_up = false;

    // Check for modifiers
    loop {
        if let Some(rest) = s.strip_prefix('!') {
            inverted = true;
            s = rest;
        } else if let Some(rest) = s.strip_prefix('^') {
            pull_up = true;
            s = rest;
        } else {
            break;
        }
    }

    let num = s.strip_prefix("gpio").ok_or(ParseError::InvalidPin)?;
    let pin: u8 = num.parse().map_err(|_| ParseError::InvalidPin)?;

    Ok(PinConfig {
        pin,
        inverted,
        pull_up,
    })
}

/// Parse a pin array like `["gpio14", "!gpio15"]`
fn parse_pin_list(value: &str) -> Result<Vec<PinConfig, MAX_MUX_LINES>, ParseError> {
    let inner = value
        .strip_prefix('[')
        .and_then(|v| v.strip_suffix(']'))
        .ok_or(ParseError::InvalidValue)?;

    let mut pins = Vec::new();
    for item in inner.split(',') {
        let item = item.trim();
        if item.is_empty() {
            continue;
        }
        pins.push(parse_pin(item)?)
            .map_err(|_| ParseError::TooManyItems)?;
    }
    Ok(pins)
}

/// Parse a motor direction
fn parse_direction(value: &str) -> Result<Direction, ParseError> {
    match parse_string(value) {
        "forward" | "+" => Ok(Direction::Forward),
        "reverse" | "-" => Ok(Direction::Reverse),
        _ => Err(ParseError::InvalidValue),
    }
}

/// Parse the mux wiring variant
fn parse_wiring(value: &str) -> Result<MuxWiring, ParseError> {
    match parse_string(value) {
        "separate_sig" => Ok(MuxWiring::SeparateSig),
        "shared_sig" => Ok(MuxWiring::SharedSig),
        _ => Err(ParseError::InvalidValue),
    }
}

fn apply_value(
    section: Section,
    key: &str,
    value: &str,
    config: &mut MachineConfig,
    ramp: &mut RampFields,
) -> Result<(), ParseError> {
    match section {
        Section::Root => {}
        Section::Bus => match key {
            "address" => config.bus.address = parse_int(value)?,
            "payload_timeout_ms" => config.bus.payload_timeout_ms = parse_int(value)?,
            _ => {} // Ignore unknown keys
        },
        Section::Motion => match key {
            "accel_steps" => ramp.accel_steps = Some(parse_int(value)?),
            "decel_steps" => ramp.decel_steps = Some(parse_int(value)?),
            "min_delay_us" => ramp.min_delay_us = Some(parse_int(value)?),
            "max_delay_us" => ramp.max_delay_us = Some(parse_int(value)?),
            "pulse_width_us" => config.motion.pulse_width_us = parse_int(value)?,
            _ => {}
        },
        Section::Kinematics => {
            let k = &mut config.kinematics;
            match key {
                "full_steps_per_rotation" => k.full_steps_per_rotation = parse_int(value)?,
                "microsteps" => k.microsteps = parse_int(value)?,
                "pulley_teeth" => k.pulley_teeth = parse_int(value)?,
                "belt_pitch_mm" => k.belt_pitch_mm = parse_float(value)?,
                _ => {}
            }
        }
        Section::Homing => {
            let h = &mut config.homing;
            match key {
                "x_dir_a" => h.x.motor_a = parse_direction(value)?,
                "x_dir_b" => h.x.motor_b = parse_direction(value)?,
                "y_dir_a" => h.y.motor_a = parse_direction(value)?,
                "y_dir_b" => h.y.motor_b = parse_direction(value)?,
                "settle_ms" => h.settle_ms = parse_int(value)?,
                "max_steps" => h.max_steps = parse_int(value)?,
                _ => {}
            }
        }
        Section::Pins => {
            let p = &mut config.pins;
            match key {
                "step_a" => p.step_a = parse_pin(value)?,
                "dir_a" => p.dir_a = parse_pin(value)?,
                "step_b" => p.step_b = parse_pin(value)?,
                "dir_b" => p.dir_b = parse_pin(value)?,
                "endstop_x" => p.endstop_x = parse_pin(value)?,
                "endstop_y" => p.endstop_y = parse_pin(value)?,
                "led_white" => p.led_white = parse_pin(value)?,
                "led_black" => p.led_black = parse_pin(value)?,
                _ => {}
            }
        }
        Section::Mux => {
            let m = &mut config.mux;
            match key {
                "wiring" => m.wiring = parse_wiring(value)?,
                "select" => {
                    let pins = parse_pin_list(value)?;
                    m.select = pins
                        .as_slice()
                        .try_into()
                        .map_err(|_| ParseError::InvalidValue)?;
                }
                "sig" => m.sig = parse_pin_list(value)?,
                "enable" => m.enable = parse_pin_list(value)?,
                "settle_us" => m.settle_us = parse_int(value)?,
                _ => {}
            }
        }
        Section::Magnet => match key {
            "carry_power" => config.magnet.carry_power = parse_int(value)?,
            "release_after_carry" => config.magnet.release_after_carry = parse_bool(value)?,
            _ => {}
        },
        Section::Board => match key {
            "watch" => config.board.watch = parse_bool(value)?,
            "watch_interval_ms" => config.board.watch_interval_ms = parse_int(value)?,
            "stable_scans" => config.board.stable_scans = parse_int(value)?,
            _ => {}
        },
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_pin() {
        let pin = parse_pin("gpio11").unwrap();
        assert_eq!(pin.pin, 11);
        assert!(!pin.inverted);
        assert!(!pin.pull_up);

        let pin = parse_pin("!gpio12").unwrap();
        assert_eq!(pin.pin, 12);
        assert!(pin.inverted);

        let pin = parse_pin("^gpio4").unwrap();
        assert_eq!(pin.pin, 4);
        assert!(pin.pull_up);

        let pin = parse_pin("\"^!gpio5\"").unwrap();
        assert_eq!(pin.pin, 5);
        assert!(pin.inverted);
        assert!(pin.pull_up);

        assert_eq!(parse_pin("pin5"), Err(ParseError::InvalidPin));
    }

    #[test]
    fn test_parse_pin_list() {
        let pins = parse_pin_list(r#"["gpio14", "!gpio15", "gpio16"]"#).unwrap();
        assert_eq!(pins.len(), 3);
        assert_eq!(pins[1], PinConfig::inverted(15));

        assert_eq!(
            parse_pin_list(r#"["gpio1", "gpio2", "gpio3", "gpio4", "gpio5"]"#),
            Err(ParseError::TooManyItems)
        );
    }

    #[test]
    fn test_parse_int_hex() {
        assert_eq!(parse_int::<u8>("0x42"), Ok(0x42));
        assert_eq!(parse_int::<u8>("66"), Ok(66));
        assert_eq!(parse_int::<u8>("0x142"), Err(ParseError::InvalidValue));
    }

    #[test]
    fn test_inline_comment() {
        let (key, value) = parse_key_value(r#"wiring = "shared_sig" # one SIG line"#).unwrap();
        assert_eq!(key, "wiring");
        assert_eq!(value, "\"shared_sig\"");
    }

    #[test]
    fn test_empty_input_gives_defaults() {
        assert_eq!(parse_config(""), Ok(MachineConfig::default()));
    }

    #[test]
    fn test_shipped_config_matches_defaults() {
        let config = parse_config(include_str!("../../../gantry-firmware/machine.toml")).unwrap();
        assert_eq!(config, MachineConfig::default());
    }

    #[test]
    fn test_separate_sig_wiring() {
        let input = r#"
[mux]
wiring = "separate_sig"
sig = ["^gpio10", "^gpio11", "^gpio12", "^gpio13"]
enable = []
"#;
        let config = parse_config(input).unwrap();
        assert_eq!(config.mux.wiring, MuxWiring::SeparateSig);
        assert_eq!(config.mux.sig.len(), 4);
        assert!(config.mux.enable.is_empty());
    }

    #[test]
    fn test_ramp_validated() {
        let input = "[motion]\nmin_delay_us = 50\n";
        assert_eq!(parse_config(input), Err(ParseError::InvalidRamp));
    }

    #[test]
    fn test_homing_overrides() {
        let input = r#"
[homing]
x_dir_a = "forward"
max_steps = 1234
"#;
        let config = parse_config(input).unwrap();
        assert_eq!(config.homing.x.motor_a, Direction::Forward);
        assert_eq!(config.homing.max_steps, 1234);
        assert_eq!(config.homing.y, MachineConfig::default().homing.y);
    }

    #[test]
    fn test_unknown_section() {
        assert_eq!(parse_config("[heater]\n"), Err(ParseError::InvalidSection));
    }

    #[test]
    fn test_inconsistent_config() {
        let input = "[pins]\nled_black = \"gpio2\"\n";
        assert_eq!(
            parse_config(input),
            Err(ParseError::Inconsistent(ConfigError::DuplicatePin(2)))
        );
    }
}
