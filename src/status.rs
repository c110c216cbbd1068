//! Status and register contents read from the MCP4725.

use bit_field::BitField;

use crate::commands::decode_code;
use crate::constants::READ_LENGTH;

/// Contents of a single 5-byte read from the device.
///
/// Bytes in documentation are numbered 0 through 4 and correspond to figure 6-3
/// in the datasheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Status {
    /// True when no EEPROM write is in progress.
    ///
    /// Bit 7 of byte 0 (RDY/BSY). A write-DAC-and-EEPROM command clears this
    /// until the EEPROM program cycle finishes, so poll it before chaining
    /// EEPROM writes.
    pub ready: bool,
    /// Power-on-reset flag, bit 6 of byte 0.
    ///
    /// Set once the supply has risen above the power-on-reset threshold.
    pub power_on_reset: bool,
    /// Power-down selection of the DAC register, bits 2..1 of byte 0.
    pub power_down: PowerDownMode,
    /// Code in the DAC register, from bytes 1 and 2.
    pub dac_code: u16,
    /// Code stored in EEPROM and restored at power-up, from bytes 3 and 4.
    pub eeprom_code: u16,
}

impl Status {
    pub(crate) fn from_buffer(buf: &[u8; READ_LENGTH]) -> Self {
        Self {
            ready: buf[0].get_bit(7),
            power_on_reset: buf[0].get_bit(6),
            power_down: buf[0].get_bits(1..3).into(),
            dac_code: dac_code(buf),
            eeprom_code: eeprom_code(buf),
        }
    }
}

pub(crate) fn dac_code(buf: &[u8; READ_LENGTH]) -> u16 {
    decode_code(buf[1], buf[2])
}

pub(crate) fn eeprom_code(buf: &[u8; READ_LENGTH]) -> u16 {
    decode_code(buf[3], buf[4])
}

/// Output state selected by the power-down bits.
///
/// In any mode other than [`PowerDownMode::Normal`] the output amplifier is off
/// and the output pin is pulled to ground through the given resistance.
///
/// # Datasheet
///
/// See table 5-2 for the PD1 and PD0 bit values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PowerDownMode {
    /// Output enabled.
    #[default]
    Normal,
    /// Output pulled down through 1 kΩ.
    Resistor1k,
    /// Output pulled down through 100 kΩ.
    Resistor100k,
    /// Output pulled down through 500 kΩ.
    Resistor500k,
}

impl From<u8> for PowerDownMode {
    fn from(value: u8) -> Self {
        assert!(value <= 0b11, "Incorrect use of the from constructor.");
        match value {
            0b00 => Self::Normal,
            0b01 => Self::Resistor1k,
            0b10 => Self::Resistor100k,
            0b11 => Self::Resistor500k,
            _ => unreachable!(),
        }
    }
}

impl From<PowerDownMode> for u8 {
    fn from(value: PowerDownMode) -> Self {
        match value {
            PowerDownMode::Normal => 0b00,
            PowerDownMode::Resistor1k => 0b01,
            PowerDownMode::Resistor100k => 0b10,
            PowerDownMode::Resistor500k => 0b11,
        }
    }
}
