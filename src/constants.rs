//! Device constants.

/// Default 7-bit I2C address of the MCP4725 (A2 and A1 factory-set to 0, A0 low).
///
/// Parts ordered with other factory address bits answer at 0x62, 0x64, and so on,
/// and pulling A0 high sets the lowest bit.
pub const DEFAULT_ADDRESS: u8 = 0x60;

/// Default reference voltage in volts, used only for voltage conversions.
pub const DEFAULT_REFERENCE_VOLTAGE: f32 = 3.3;

/// Largest raw code accepted by the 12-bit DAC register.
pub const MAX_CODE: u16 = 4095;

/// Largest value accepted by the 8-bit compatibility writes.
pub const MAX_CODE_8BIT: u8 = 255;

/// Number of bytes returned by a read of the device.
///
/// Status byte, two bytes of DAC register, two bytes of EEPROM.
pub const READ_LENGTH: usize = 5;
