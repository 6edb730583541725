//! Build script for gantry-firmware
//!
//! - Sets up linker search paths for memory.x
//! - Validates machine.toml at compile time

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Pins owned by the bus and the magnet PWM
const RESERVED_PINS: [i64; 3] = [0, 1, 26];

fn main() {
    setup_linker();
    validate_config();
}

/// Set up linker search paths for memory.x
fn setup_linker() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

    // Copy memory.x to the output directory
    let memory_x = include_bytes!("memory.x");
    let mut f = File::create(out_dir.join("memory.x")).unwrap();
    f.write_all(memory_x).unwrap();

    // Tell rustc where to find memory.x
    println!("cargo:rustc-link-search={}", out_dir.display());

    println!("cargo:rustc-link-arg-bins=--nmagic");
    println!("cargo:rustc-link-arg-bins=-Tlink.x");
    println!("cargo:rustc-link-arg-bins=-Tlink-rp.x");
    println!("cargo:rustc-link-arg-bins=-Tdefmt.x");

    // Re-run if memory.x changes
    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Validate machine.toml configuration at compile time
fn validate_config() {
    // Re-run if machine.toml changes
    println!("cargo:rerun-if-changed=machine.toml");

    let config_path = Path::new("machine.toml");

    if !config_path.exists() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: machine.toml not found!                                  ║\n\
            ║                                                                  ║\n\
            ║  The firmware requires a machine.toml configuration file.        ║\n\
            ║  Please create one in the gantry-firmware directory.             ║\n\
            ╚══════════════════════════════════════════════════════════════════╝\n"
        );
    }

    let config_content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Failed to read machine.toml                              ║\n\
                ║                                                                  ║\n\
                ║  Error: {:<56} ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                e
            );
        }
    };

    // Parse and validate TOML syntax
    let config: toml::Value = match toml::from_str(&config_content) {
        Ok(value) => value,
        Err(e) => {
            let error_msg = e.to_string();
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Invalid TOML syntax in machine.toml                      ║\n\
                ╠══════════════════════════════════════════════════════════════════╣\n\
                ║                                                                  ║\n\
                {}\n\
                ║                                                                  ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                format_error_lines(&error_msg)
            );
        }
    };

    validate_required_sections(&config);

    validate_bus(&config);
    validate_motion(&config);
    validate_pins(&config);
    validate_mux(&config);

    println!("cargo:warning=machine.toml validated successfully");
}

/// Format error message lines with box drawing
fn format_error_lines(msg: &str) -> String {
    msg.lines()
        .map(|line| {
            let truncated = if line.len() > 64 {
                format!("{}...", &line[..61])
            } else {
                line.to_string()
            };
            format!("║  {:<64} ║", truncated)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Abort the build with a boxed list of problems
fn report(title: &str, errors: &[String]) {
    if errors.is_empty() {
        return;
    }
    panic!(
        "\n\
        ╔══════════════════════════════════════════════════════════════════╗\n\
        ║  ERROR: {:<56} ║\n\
        ╠══════════════════════════════════════════════════════════════════╣\n\
        {}\n\
        ╚══════════════════════════════════════════════════════════════════╝\n",
        title,
        errors
            .iter()
            .map(|e| format!("║  • {:<62} ║", e))
            .collect::<Vec<_>>()
            .join("\n")
    );
}

/// Validate that required sections exist
fn validate_required_sections(config: &toml::Value) {
    let errors: Vec<String> = ["bus", "motion", "pins", "mux"]
        .iter()
        .filter(|section| config.get(*section).is_none())
        .map(|section| format!("Missing [{}] section", section))
        .collect();

    report("Missing required sections in machine.toml", &errors);
}

fn validate_bus(config: &toml::Value) {
    let mut errors = Vec::new();

    if let Some(toml::Value::Integer(addr)) = config.get("bus").and_then(|b| b.get("address")) {
        if !(0x08..=0x77).contains(addr) {
            errors.push(format!("[bus] address 0x{:02x} must be 0x08-0x77", addr));
        }
    }

    report("Invalid bus configuration", &errors);
}

fn validate_motion(config: &toml::Value) {
    let Some(motion) = config.get("motion") else {
        return;
    };
    let mut errors = Vec::new();

    let int = |key: &str| motion.get(key).and_then(|v| v.as_integer());

    for key in ["accel_steps", "decel_steps", "min_delay_us", "max_delay_us"] {
        if let Some(value) = int(key) {
            if value < 0 {
                errors.push(format!("[motion] {} cannot be negative", key));
            }
        }
    }

    // min_delay is the slow start/stop rate, so it must be the longer delay
    if let (Some(min), Some(max)) = (int("min_delay_us"), int("max_delay_us")) {
        if max >= min {
            errors.push(format!(
                "[motion] max_delay_us ({}) must be below min_delay_us ({})",
                max, min
            ));
        }
    }

    report("Invalid motion configuration", &errors);
}

/// Pin number from "gpioN" with optional "!" and "^" prefixes
fn pin_number(value: &toml::Value) -> Option<i64> {
    let s = value.as_str()?;
    let s = s.trim_start_matches(['!', '^']);
    s.strip_prefix("gpio")?.parse().ok()
}

fn check_pin(label: &str, value: &toml::Value, seen: &mut Vec<i64>, errors: &mut Vec<String>) {
    match pin_number(value) {
        Some(pin) if !(0..30).contains(&pin) => {
            errors.push(format!("{} gpio{} does not exist", label, pin));
        }
        Some(pin) if RESERVED_PINS.contains(&pin) => {
            errors.push(format!("{} gpio{} is reserved", label, pin));
        }
        Some(pin) if seen.contains(&pin) => {
            errors.push(format!("{} gpio{} is used twice", label, pin));
        }
        Some(pin) => seen.push(pin),
        None => errors.push(format!("{} is not a pin name", label)),
    }
}

fn validate_pins(config: &toml::Value) {
    let mut errors = Vec::new();
    let mut seen = Vec::new();

    if let Some(toml::Value::Table(pins)) = config.get("pins") {
        for (name, value) in pins {
            check_pin(&format!("[pins] {}", name), value, &mut seen, &mut errors);
        }
    }

    if let Some(toml::Value::Table(mux)) = config.get("mux") {
        for key in ["select", "sig", "enable"] {
            if let Some(toml::Value::Array(list)) = mux.get(key) {
                for value in list {
                    check_pin(&format!("[mux] {}", key), value, &mut seen, &mut errors);
                }
            }
        }
    }

    report("Invalid pin assignment", &errors);
}

fn validate_mux(config: &toml::Value) {
    let Some(mux) = config.get("mux") else {
        return;
    };
    let mut errors = Vec::new();

    let count = |key: &str| {
        mux.get(key)
            .and_then(|v| v.as_array())
            .map(|a| a.len())
            .unwrap_or(0)
    };

    if count("select") != 4 {
        errors.push("[mux] select must list exactly 4 pins".to_string());
    }

    match mux.get("wiring").and_then(|w| w.as_str()) {
        Some("separate_sig") => {
            if count("sig") != 4 {
                errors.push("[mux] separate_sig needs 4 sig pins".to_string());
            }
        }
        Some("shared_sig") | None => {
            if count("sig") != 1 {
                errors.push("[mux] shared_sig needs 1 sig pin".to_string());
            }
            if count("enable") != 4 {
                errors.push("[mux] shared_sig needs 4 enable pins".to_string());
            }
        }
        Some(other) => {
            errors.push(format!("[mux] unknown wiring '{}'", other));
        }
    }

    report("Invalid mux configuration", &errors);
}
