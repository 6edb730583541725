//! I2C target (peripheral) configuration
//!
//! The bus pins are fixed: SDA on GPIO0 and SCL on GPIO1 of I2C0.

use embassy_rp::i2c_slave;
use gantry_hal::i2c::I2cTargetConfig;

/// Build the embassy target config from the board-level settings
pub fn target_config(cfg: &I2cTargetConfig) -> i2c_slave::Config {
    let mut config = i2c_slave::Config::default();
    config.addr = u16::from(cfg.address);
    config.general_call = false;
    config.sda_pullup = cfg.internal_pullups;
    config.scl_pullup = cfg.internal_pullups;
    config
}

/// Bus fault classification for logging
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BusFault {
    /// Controller aborted the transfer
    Abort,
    /// Write overflowed the receive buffer
    PartialWrite(usize),
    /// Anything else reported by the peripheral
    Other,
}

impl From<i2c_slave::Error> for BusFault {
    fn from(err: i2c_slave::Error) -> Self {
        match err {
            i2c_slave::Error::Abort(_) => BusFault::Abort,
            i2c_slave::Error::PartialWrite(n) => BusFault::PartialWrite(n),
            _ => BusFault::Other,
        }
    }
}
