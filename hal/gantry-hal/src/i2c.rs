//! I2C bus peripheral (target) configuration
//!
//! The gantry answers a host controller at a fixed 7-bit address. The
//! chip HAL turns this into its own slave configuration.

/// Default target address used by the host software
pub const DEFAULT_ADDRESS: u8 = 0x42;

/// Errors validating a target address
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AddressError {
    /// Address does not fit in 7 bits
    OutOfRange,
    /// Address is in a block reserved by the I2C specification
    Reserved,
}

/// I2C target configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct I2cTargetConfig {
    /// 7-bit address the peripheral answers to
    pub address: u8,
    /// Enable the internal pull-ups on SDA/SCL
    pub internal_pullups: bool,
}

impl Default for I2cTargetConfig {
    fn default() -> Self {
        Self {
            address: DEFAULT_ADDRESS,
            internal_pullups: true,
        }
    }
}

impl I2cTargetConfig {
    /// Create a configuration for the given address
    pub fn new(address: u8) -> Result<Self, AddressError> {
        validate_address(address)?;
        Ok(Self {
            address,
            ..Default::default()
        })
    }
}

/// Check that an address is usable by a peripheral
///
/// 0x00-0x07 and 0x78-0x7F are reserved.
pub fn validate_address(address: u8) -> Result<(), AddressError> {
    if address > 0x7F {
        return Err(AddressError::OutOfRange);
    }
    if address < 0x08 || address > 0x77 {
        return Err(AddressError::Reserved);
    }
    Ok(())
}
