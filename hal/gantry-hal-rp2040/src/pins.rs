//! Dynamic pin allocation for config-driven hardware setup
//!
//! Step, direction, end-stop, mux and LED pins come from `machine.toml`, so
//! they are handed out by number at runtime. GPIO0/1 (I2C0) and GPIO26
//! (magnet PWM) are wired to fixed peripherals and cannot be taken.

use embassy_rp::gpio::AnyPin;
use embassy_rp::peripherals::{I2C0, PIN_0, PIN_1, PIN_26, PWM_SLICE5};
use embassy_rp::{Peri, Peripherals};

/// Number of user GPIOs on the RP2040
pub const PIN_COUNT: usize = 30;

/// Pins bound to fixed peripherals
pub const RESERVED_PINS: [u8; 3] = [0, 1, 26];

/// Error when requesting a pin
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PinError {
    /// Pin number out of range (0-29 valid)
    InvalidPin,
    /// Pin already taken
    AlreadyTaken,
    /// Pin reserved for the bus or the magnet
    Reserved,
}

/// Pin bank that holds the free GPIO pins and allows taking them by number
pub struct PinBank {
    pins: [Option<Peri<'static, AnyPin>>; PIN_COUNT],
}

impl PinBank {
    /// Split the peripherals into the pin bank and the fixed-function rest
    pub fn from_peripherals(p: Peripherals) -> (Self, RemainingPeripherals) {
        let bank = Self {
            pins: [
                None,
                None,
                Some(p.PIN_2.into()),
                Some(p.PIN_3.into()),
                Some(p.PIN_4.into()),
                Some(p.PIN_5.into()),
                Some(p.PIN_6.into()),
                Some(p.PIN_7.into()),
                Some(p.PIN_8.into()),
                Some(p.PIN_9.into()),
                Some(p.PIN_10.into()),
                Some(p.PIN_11.into()),
                Some(p.PIN_12.into()),
                Some(p.PIN_13.into()),
                Some(p.PIN_14.into()),
                Some(p.PIN_15.into()),
                Some(p.PIN_16.into()),
                Some(p.PIN_17.into()),
                Some(p.PIN_18.into()),
                Some(p.PIN_19.into()),
                Some(p.PIN_20.into()),
                Some(p.PIN_21.into()),
                Some(p.PIN_22.into()),
                Some(p.PIN_23.into()),
                Some(p.PIN_24.into()),
                Some(p.PIN_25.into()),
                None,
                Some(p.PIN_27.into()),
                Some(p.PIN_28.into()),
                Some(p.PIN_29.into()),
            ],
        };

        let remaining = RemainingPeripherals {
            i2c0: p.I2C0,
            i2c_sda: p.PIN_0,
            i2c_scl: p.PIN_1,
            pwm_slice5: p.PWM_SLICE5,
            magnet_pin: p.PIN_26,
        };

        (bank, remaining)
    }

    /// Take a pin by number
    ///
    /// Fails if the number is out of range, reserved, or already handed out.
    pub fn take(&mut self, pin_num: u8) -> Result<Peri<'static, AnyPin>, PinError> {
        if usize::from(pin_num) >= PIN_COUNT {
            return Err(PinError::InvalidPin);
        }
        if RESERVED_PINS.contains(&pin_num) {
            return Err(PinError::Reserved);
        }
        self.pins[usize::from(pin_num)]
            .take()
            .ok_or(PinError::AlreadyTaken)
    }
}

/// Fixed-function peripherals left over after creating the PinBank
pub struct RemainingPeripherals {
    pub i2c0: Peri<'static, I2C0>,
    pub i2c_sda: Peri<'static, PIN_0>,
    pub i2c_scl: Peri<'static, PIN_1>,
    pub pwm_slice5: Peri<'static, PWM_SLICE5>,
    pub magnet_pin: Peri<'static, PIN_26>,
}
