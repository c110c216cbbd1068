/// Problems decoding a frame written to the device.
///
/// Only produced by [`Frame::parse`] and the [`Emulator`]. The driver itself
/// returns the bus error of its `I2C` type unchanged.
///
/// [`Frame::parse`]: crate::commands::Frame::parse
/// [`Emulator`]: crate::emulator::Emulator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FrameError {
    /// A 3-byte frame carried a command other than write-DAC (0x40) or
    /// write-DAC-and-EEPROM (0x60).
    ///
    /// The enclosed `u8` is the first byte of the frame.
    UnknownCommand(u8),
    /// A frame was neither 2 nor 3 bytes long.
    ///
    /// The enclosed `usize` is the length received.
    UnexpectedLength(usize),
}

impl core::fmt::Display for FrameError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            FrameError::UnknownCommand(byte) => write!(f, "unknown command byte {byte:#04x}"),
            FrameError::UnexpectedLength(len) => write!(f, "unexpected frame length {len}"),
        }
    }
}

impl core::error::Error for FrameError {}
