//! Driver assembly from the machine configuration
//!
//! Every configurable pin is claimed through the `PinBank`, so a pin listed
//! twice or a reserved pin surfaces as a `SetupError` at boot instead of a
//! second driver silently fighting over the same GPIO.

use embassy_time::Delay;
use heapless::Vec;

use gantry_core::board::BoardScanner;
use gantry_core::config::{MuxConfig, MuxWiring, PinConfig, PinsConfig};
use gantry_core::motion::MotionEngine;
use gantry_drivers::endstop::SwitchEndStops;
use gantry_drivers::led::TurnLeds;
use gantry_drivers::level::{LevelInput, LevelOutput};
use gantry_drivers::magnet::Electromagnet;
use gantry_drivers::mux::{Cd74hc4067Bank, MuxError, SignalLines};
use gantry_drivers::stepper::{StepDirMotor, StepDirPair};
use gantry_hal::ActiveLevel;
use gantry_hal_rp2040::{MagnetPwm, PinBank, PinError, RpInput, RpOutput};

pub type Motors = StepDirPair<RpOutput<'static>>;
pub type Switches = SwitchEndStops<RpInput<'static>>;
pub type MagnetDriver = Electromagnet<MagnetPwm<'static>>;
pub type MuxDriver = Cd74hc4067Bank<RpOutput<'static>, RpInput<'static>, Delay>;

/// Motion engine as wired on the RP2040 board
pub type Engine = MotionEngine<Motors, Switches, MagnetDriver, Delay>;
pub type Scanner = BoardScanner<MuxDriver>;
pub type Leds = TurnLeds<RpOutput<'static>>;

/// Errors while claiming pins and building drivers
#[derive(Debug, Clone, Copy, PartialEq, Eq, defmt::Format)]
pub enum SetupError {
    /// A configured pin could not be claimed
    Pin(u8, PinError),
    /// Mux wiring does not match the configured line count
    Mux(MuxError),
}

fn output(bank: &mut PinBank, cfg: &PinConfig) -> Result<RpOutput<'static>, SetupError> {
    let pin = bank.take(cfg.pin).map_err(|e| SetupError::Pin(cfg.pin, e))?;
    Ok(RpOutput::new(pin))
}

fn input(bank: &mut PinBank, cfg: &PinConfig) -> Result<RpInput<'static>, SetupError> {
    let pin = bank.take(cfg.pin).map_err(|e| SetupError::Pin(cfg.pin, e))?;
    if cfg.pull_up {
        Ok(RpInput::pull_up(pin))
    } else {
        Ok(RpInput::floating(pin))
    }
}

fn level_output(
    bank: &mut PinBank,
    cfg: &PinConfig,
) -> Result<LevelOutput<RpOutput<'static>>, SetupError> {
    Ok(LevelOutput::new(
        output(bank, cfg)?,
        ActiveLevel::from_inverted(cfg.inverted),
    ))
}

fn level_input(
    bank: &mut PinBank,
    cfg: &PinConfig,
) -> Result<LevelInput<RpInput<'static>>, SetupError> {
    Ok(LevelInput::new(
        input(bank, cfg)?,
        ActiveLevel::from_inverted(cfg.inverted),
    ))
}

/// STEP/DIR outputs for both belts
pub fn motors(bank: &mut PinBank, pins: &PinsConfig) -> Result<Motors, SetupError> {
    let a = StepDirMotor::new(
        output(bank, &pins.step_a)?,
        output(bank, &pins.dir_a)?,
        pins.dir_a.inverted,
    );
    let b = StepDirMotor::new(
        output(bank, &pins.step_b)?,
        output(bank, &pins.dir_b)?,
        pins.dir_b.inverted,
    );
    Ok(StepDirPair::new(a, b))
}

pub fn endstops(bank: &mut PinBank, pins: &PinsConfig) -> Result<Switches, SetupError> {
    Ok(SwitchEndStops::new(
        level_input(bank, &pins.endstop_x)?,
        level_input(bank, &pins.endstop_y)?,
    ))
}

pub fn turn_leds(bank: &mut PinBank, pins: &PinsConfig) -> Result<Leds, SetupError> {
    Ok(TurnLeds::new(
        level_output(bank, &pins.led_white)?,
        level_output(bank, &pins.led_black)?,
    ))
}

/// Mux bank wired per `[mux]`
pub fn scanner(bank: &mut PinBank, mux: &MuxConfig) -> Result<Scanner, SetupError> {
    let select = [
        output(bank, &mux.select[0])?,
        output(bank, &mux.select[1])?,
        output(bank, &mux.select[2])?,
        output(bank, &mux.select[3])?,
    ];

    let lines = match mux.wiring {
        MuxWiring::SeparateSig => {
            let mut sig = Vec::new();
            for cfg in &mux.sig {
                sig.push(input(bank, cfg)?)
                    .map_err(|_| SetupError::Mux(MuxError::PinCount))?;
            }
            SignalLines::Separate(sig)
        }
        MuxWiring::SharedSig => {
            let sig_cfg = mux.sig.first().ok_or(SetupError::Mux(MuxError::PinCount))?;
            let sig = input(bank, sig_cfg)?;
            let mut enable = Vec::new();
            for cfg in &mux.enable {
                enable
                    .push(level_output(bank, cfg)?)
                    .map_err(|_| SetupError::Mux(MuxError::PinCount))?;
            }
            SignalLines::Shared { sig, enable }
        }
    };

    let bank = Cd74hc4067Bank::new(select, lines, Delay, mux.settle_us)
        .map_err(SetupError::Mux)?;
    Ok(BoardScanner::new(bank))
}
