//! Write frames understood by the MCP4725 and its clones.
//!
//! Every write to the device is one of four frame layouts. [`Frame`] holds the
//! register-level meaning of a write and [`Frame::bytes`] produces the exact byte
//! sequence put on the bus.
//!
//! | Frame                    | Byte 0        | Byte 1      | Byte 2          |
//! |--------------------------|---------------|-------------|-----------------|
//! | [`Frame::WriteDac`]          | `0x40`        | `code >> 4` | `(code & 0xF) << 4` |
//! | [`Frame::WriteDacAndEeprom`] | `0x60`        | `code >> 4` | `(code & 0xF) << 4` |
//! | [`Frame::WriteDac8Bit`]      | `0x40`        | `code`      | `0x00`          |
//! | [`Frame::Legacy8Bit`]        | `code`        | `0x00`      |                 |

use bit_field::BitField;

use crate::constants::{MAX_CODE, MAX_CODE_8BIT};
use crate::error::FrameError;

/// Command bits (C2, C1, C0) in the top of the first byte of a 3-byte frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Command {
    /// Write the DAC register only. Volatile.
    ///
    /// See section 6.1.2 of the datasheet.
    WriteDac,
    /// Write the DAC register and the EEPROM. Persists across power cycles.
    ///
    /// See section 6.1.3 of the datasheet.
    WriteDacAndEeprom,
}

impl Command {
    /// Full command byte with the power-down bits cleared.
    pub(crate) const fn byte(self) -> u8 {
        match self {
            Command::WriteDac => 0x40,
            Command::WriteDacAndEeprom => 0x60,
        }
    }

    fn from_byte(byte: u8) -> Option<Self> {
        // C2 C1 C0 are bits 7..5; bits 2..1 carry the power-down selection.
        match byte.get_bits(5..8) {
            0b010 => Some(Command::WriteDac),
            0b011 => Some(Command::WriteDacAndEeprom),
            _ => None,
        }
    }
}

/// A single write to the device.
///
/// Construct frames with [`Frame::write_dac`] and friends, which clamp their input
/// into range. Codes held directly in the variants are clamped again when the
/// frame is encoded, so no frame can put an out-of-range code on the bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Frame {
    /// Fast write of a 12-bit code to the DAC register. EEPROM is untouched.
    WriteDac(u16),
    /// Write of a 12-bit code to both the DAC register and the EEPROM.
    WriteDacAndEeprom(u16),
    /// Non-standard: an 8-bit code placed in the high byte of a fast write.
    ///
    /// For clones that only honour 8 significant bits. A compliant device reads
    /// this as the 12-bit code `code << 4`.
    WriteDac8Bit(u8),
    /// Non-standard: an 8-bit code in a 2-byte frame with no command byte.
    ///
    /// For clones that reject the 3-byte command-prefixed frame entirely.
    Legacy8Bit(u8),
}

impl Frame {
    /// Fast write of `code`, clamped to `0..=4095`.
    pub fn write_dac(code: i32) -> Self {
        Self::WriteDac(clamp_code(code))
    }

    /// DAC and EEPROM write of `code`, clamped to `0..=4095`.
    pub fn write_dac_and_eeprom(code: i32) -> Self {
        Self::WriteDacAndEeprom(clamp_code(code))
    }

    /// 8-bit compatibility fast write of `code`, clamped to `0..=255`.
    pub fn write_dac_8bit(code: i32) -> Self {
        Self::WriteDac8Bit(clamp_code_8bit(code))
    }

    /// 8-bit legacy 2-byte write of `code`, clamped to `0..=255`.
    pub fn legacy_8bit(code: i32) -> Self {
        Self::Legacy8Bit(clamp_code_8bit(code))
    }

    /// Encode the frame into the bytes written to the device.
    pub fn bytes(&self) -> FrameBytes {
        match *self {
            Frame::WriteDac(code) => FrameBytes::twelve_bit(Command::WriteDac, code),
            Frame::WriteDacAndEeprom(code) => {
                FrameBytes::twelve_bit(Command::WriteDacAndEeprom, code)
            }
            Frame::WriteDac8Bit(code) => FrameBytes {
                buf: [Command::WriteDac.byte(), code, 0x00],
                len: 3,
            },
            Frame::Legacy8Bit(code) => FrameBytes {
                buf: [code, 0x00, 0x00],
                len: 2,
            },
        }
    }

    /// Decode a frame as written on the bus.
    ///
    /// A 3-byte fast write always decodes to [`Frame::WriteDac`], since the 8-bit
    /// compatibility frame is indistinguishable from a 12-bit write of `code << 4`.
    /// 2-byte frames decode as [`Frame::Legacy8Bit`].
    ///
    /// # Errors
    ///
    /// [`FrameError::UnexpectedLength`] for frames that are not 2 or 3 bytes long,
    /// and [`FrameError::UnknownCommand`] for 3-byte frames with a command other
    /// than 0x40 or 0x60.
    pub fn parse(bytes: &[u8]) -> Result<Self, FrameError> {
        match *bytes {
            [command, high, low] => match Command::from_byte(command) {
                Some(Command::WriteDac) => Ok(Frame::WriteDac(decode_code(high, low))),
                Some(Command::WriteDacAndEeprom) => {
                    Ok(Frame::WriteDacAndEeprom(decode_code(high, low)))
                }
                None => Err(FrameError::UnknownCommand(command)),
            },
            [code, _] => Ok(Frame::Legacy8Bit(code)),
            _ => Err(FrameError::UnexpectedLength(bytes.len())),
        }
    }

    /// The 12-bit value a compliant DAC register would hold after this write.
    pub fn dac_code(&self) -> u16 {
        match *self {
            Frame::WriteDac(code) | Frame::WriteDacAndEeprom(code) => code.min(MAX_CODE),
            Frame::WriteDac8Bit(code) | Frame::Legacy8Bit(code) => u16::from(code) << 4,
        }
    }
}

/// Encoded frame, 2 or 3 bytes long.
///
/// Dereferences to the byte slice to be written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameBytes {
    buf: [u8; 3],
    len: usize,
}

impl FrameBytes {
    fn twelve_bit(command: Command, code: u16) -> Self {
        let code = code.min(MAX_CODE);
        Self {
            buf: [command.byte(), (code >> 4) as u8, ((code & 0xF) << 4) as u8],
            len: 3,
        }
    }
}

impl core::ops::Deref for FrameBytes {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        &self.buf[..self.len]
    }
}

/// Reassemble a 12-bit code from a high byte and the top nibble of the next byte.
///
/// The mask is redundant given the shifts but keeps the result in range whatever
/// the device returns.
pub(crate) fn decode_code(high: u8, low: u8) -> u16 {
    ((u16::from(high) << 4) | (u16::from(low) >> 4)) & 0xFFF
}

pub(crate) fn clamp_code(code: i32) -> u16 {
    code.clamp(0, i32::from(MAX_CODE)) as u16
}

pub(crate) fn clamp_code_8bit(code: i32) -> u8 {
    code.clamp(0, i32::from(MAX_CODE_8BIT)) as u8
}
