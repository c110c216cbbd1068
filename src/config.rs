//! Driver configuration.

use crate::constants::{DEFAULT_ADDRESS, DEFAULT_REFERENCE_VOLTAGE};

/// Address and reference voltage of one MCP4725.
///
/// ```rust
/// # use mcp4725_hal::Config;
/// // A0 pulled high, supplied from 5V.
/// let config = Config::new().with_address(0x61).with_reference_voltage(5.0);
/// assert_eq!(config.address, 0x61);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Config {
    /// 7-bit I2C address of the device.
    pub address: u8,
    /// Voltage corresponding to full scale (code 4095), in volts.
    ///
    /// This is the device's supply voltage (VDD). It is only used to convert
    /// between volts and codes and is never sent to the device. It must be
    /// positive; a zero or negative reference makes voltage conversions
    /// meaningless.
    pub reference_voltage: f32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            address: DEFAULT_ADDRESS,
            reference_voltage: DEFAULT_REFERENCE_VOLTAGE,
        }
    }
}

impl Config {
    /// Configuration with the default address (0x60) and a 3.3V reference.
    pub fn new() -> Self {
        Self::default()
    }

    /// Change the 7-bit I2C address.
    pub fn with_address(mut self, address: u8) -> Self {
        self.address = address;
        self
    }

    /// Change the reference voltage.
    pub fn with_reference_voltage(mut self, reference_voltage: f32) -> Self {
        self.reference_voltage = reference_voltage;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = Config::default();
        assert_eq!(config.address, 0x60);
        assert_eq!(config.reference_voltage, 3.3);
        assert_eq!(Config::new(), config);
    }

    #[test]
    fn builders_change_one_field() {
        let config = Config::new().with_reference_voltage(5.0);
        assert_eq!(config.address, 0x60);
        assert_eq!(config.reference_voltage, 5.0);

        let config = config.with_address(0x62);
        assert_eq!(config.address, 0x62);
        assert_eq!(config.reference_voltage, 5.0);
    }
}
