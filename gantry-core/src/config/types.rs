//! Machine configuration types
//!
//! Defaults describe the reference board wiring.

use heapless::Vec;

use crate::motion::{HomingConfig, RampParameters};

/// Number of multiplexers (and SIG/EN lines at most)
pub const MAX_MUX_LINES: usize = 4;

/// Pin configuration with optional inversion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PinConfig {
    /// GPIO pin number (0-29 for RP2040)
    pub pin: u8,
    /// Pin is active-low (inverted)
    pub inverted: bool,
    /// Enable internal pull-up
    pub pull_up: bool,
}

impl PinConfig {
    /// Create a new pin config
    pub const fn new(pin: u8) -> Self {
        Self {
            pin,
            inverted: false,
            pull_up: false,
        }
    }

    /// Create an inverted (active-low) pin
    pub const fn inverted(pin: u8) -> Self {
        Self {
            pin,
            inverted: true,
            pull_up: false,
        }
    }

    /// Create a pin with pull-up enabled
    pub const fn with_pullup(pin: u8) -> Self {
        Self {
            pin,
            inverted: false,
            pull_up: true,
        }
    }
}

/// Host bus settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BusConfig {
    /// 7-bit target address
    pub address: u8,
    /// Window for the move payload after the command byte
    pub payload_timeout_ms: u32,
}

impl Default for BusConfig {
    fn default() -> Self {
        Self {
            address: 0x42,
            payload_timeout_ms: 100,
        }
    }
}

/// Step timing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MotionConfig {
    pub ramp: RampParameters,
    /// Step line high time
    pub pulse_width_us: u32,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            ramp: RampParameters::default(),
            pulse_width_us: 100,
        }
    }
}

/// Belt drive geometry
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct KinematicsConfig {
    /// Full steps per motor rotation (typically 200 for 1.8° motors)
    pub full_steps_per_rotation: u16,
    /// Driver microstep setting
    pub microsteps: u16,
    /// Teeth on the motor pulley
    pub pulley_teeth: u16,
    /// Belt tooth pitch
    pub belt_pitch_mm: f32,
}

impl Default for KinematicsConfig {
    fn default() -> Self {
        Self {
            full_steps_per_rotation: 200,
            microsteps: 16,
            pulley_teeth: 20,
            belt_pitch_mm: 2.0,
        }
    }
}

impl KinematicsConfig {
    /// Steps per millimetre of belt travel
    pub fn steps_per_mm(&self) -> f32 {
        let steps = f32::from(self.full_steps_per_rotation) * f32::from(self.microsteps);
        steps / (f32::from(self.pulley_teeth) * self.belt_pitch_mm)
    }
}

/// Fixed-function pins
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PinsConfig {
    pub step_a: PinConfig,
    pub dir_a: PinConfig,
    pub step_b: PinConfig,
    pub dir_b: PinConfig,
    pub endstop_x: PinConfig,
    pub endstop_y: PinConfig,
    pub led_white: PinConfig,
    pub led_black: PinConfig,
}

impl Default for PinsConfig {
    fn default() -> Self {
        Self {
            step_a: PinConfig::new(2),
            dir_a: PinConfig::new(3),
            step_b: PinConfig::new(4),
            dir_b: PinConfig::new(5),
            endstop_x: PinConfig::with_pullup(6),
            endstop_y: PinConfig::with_pullup(7),
            led_white: PinConfig::new(22),
            led_black: PinConfig::new(9),
        }
    }
}

/// How the four multiplexers are wired
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MuxWiring {
    /// One SIG input per mux, select lines shared, always enabled
    SeparateSig,
    /// One shared SIG input, one enable line per mux
    SharedSig,
}

/// Multiplexer pins
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MuxConfig {
    pub wiring: MuxWiring,
    /// S0..S3 select lines, shared by all muxes
    pub select: [PinConfig; 4],
    /// SIG inputs: four for `SeparateSig`, one for `SharedSig`
    pub sig: Vec<PinConfig, MAX_MUX_LINES>,
    /// Enable lines, `SharedSig` only
    pub enable: Vec<PinConfig, MAX_MUX_LINES>,
    /// Wait after changing the select lines
    pub settle_us: u32,
}

impl Default for MuxConfig {
    fn default() -> Self {
        let mut sig = Vec::new();
        let _ = sig.push(PinConfig::with_pullup(8));

        let mut enable = Vec::new();
        for pin in 18..22 {
            let _ = enable.push(PinConfig::inverted(pin));
        }

        Self {
            wiring: MuxWiring::SharedSig,
            select: [
                PinConfig::new(14),
                PinConfig::new(15),
                PinConfig::new(16),
                PinConfig::new(17),
            ],
            sig,
            enable,
            settle_us: 2,
        }
    }
}

/// Electromagnet behaviour
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MagnetConfig {
    /// Power while carrying a piece, percent
    pub carry_power: u8,
    /// Switch off once the carried move completes
    pub release_after_carry: bool,
}

impl Default for MagnetConfig {
    fn default() -> Self {
        Self {
            carry_power: 100,
            release_after_carry: true,
        }
    }
}

/// Board watch settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BoardConfig {
    /// Rescan the board while idle to follow player moves
    pub watch: bool,
    /// Rescan period
    pub watch_interval_ms: u32,
    /// Consecutive identical scans before a change passes the turn
    pub stable_scans: u8,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            watch: true,
            watch_interval_ms: 250,
            stable_scans: 4,
        }
    }
}

/// Configuration consistency errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Bus address outside the 7-bit non-reserved range
    InvalidAddress,
    /// Number of SIG/EN pins does not match the mux wiring
    MuxPinCount,
    /// Magnet power above 100 %
    PowerOutOfRange,
    /// Belt geometry gives zero or non-finite steps per mm
    InvalidKinematics,
    /// Same GPIO assigned twice
    DuplicatePin(u8),
}

/// Complete machine configuration
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MachineConfig {
    pub bus: BusConfig,
    pub motion: MotionConfig,
    pub kinematics: KinematicsConfig,
    pub homing: HomingConfig,
    pub pins: PinsConfig,
    pub mux: MuxConfig,
    pub magnet: MagnetConfig,
    pub board: BoardConfig,
}

impl MachineConfig {
    /// Check cross-field consistency
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0x08..=0x77).contains(&self.bus.address) {
            return Err(ConfigError::InvalidAddress);
        }

        let (sig, enable) = match self.mux.wiring {
            MuxWiring::SeparateSig => (MAX_MUX_LINES, 0),
            MuxWiring::SharedSig => (1, MAX_MUX_LINES),
        };
        if self.mux.sig.len() != sig || self.mux.enable.len() != enable {
            return Err(ConfigError::MuxPinCount);
        }

        if self.magnet.carry_power > 100 {
            return Err(ConfigError::PowerOutOfRange);
        }

        let spm = self.kinematics.steps_per_mm();
        if !spm.is_finite() || spm <= 0.0 {
            return Err(ConfigError::InvalidKinematics);
        }

        let mut seen = 0u32;
        for pin in self.gpio_pins() {
            let bit = 1u32 << (pin & 31);
            if seen & bit != 0 {
                return Err(ConfigError::DuplicatePin(pin));
            }
            seen |= bit;
        }

        Ok(())
    }

    /// Every configurable GPIO in use
    pub fn gpio_pins(&self) -> impl Iterator<Item = u8> + '_ {
        let p = &self.pins;
        [
            p.step_a, p.dir_a, p.step_b, p.dir_b, p.endstop_x, p.endstop_y, p.led_white,
            p.led_black,
        ]
        .into_iter()
        .chain(self.mux.select)
        .chain(self.mux.sig.iter().copied())
        .chain(self.mux.enable.iter().copied())
        .map(|pin| pin.pin)
    }
}
