//! Software model of the MCP4725 registers.
//!
//! [`Emulator`] accepts the frames a driver writes and produces the 5-byte read
//! response, keeping the DAC register, EEPROM, and status bits the way the device
//! does. It implements the embedded-hal I2C traits itself, so it can stand in for
//! a bus with a DAC attached:
//!
//! ```rust
//! # use mcp4725_hal::{Mcp4725, emulator::Emulator};
//! let mut dac = Mcp4725::new(Emulator::new());
//! dac.set_value(1234).unwrap();
//! assert_eq!(dac.read_value().unwrap(), 1234);
//! ```
//!
//! The `pico-target` firmware uses the same model to answer as an I2C target.
//!
//! 2-byte writes are modelled on the clone modules that need the legacy
//! compatibility frame: the first byte is taken as the top 8 bits of the code.
//! A genuine MCP4725 decodes 2-byte writes differently (datasheet section 6.1.1).

use bit_field::BitField;
use embedded_hal::i2c::{self, ErrorKind, I2c, NoAcknowledgeSource, Operation, SevenBitAddress};

use crate::commands::Frame;
use crate::constants::{DEFAULT_ADDRESS, MAX_CODE, READ_LENGTH};
use crate::error::FrameError;
use crate::status::PowerDownMode;

/// Register state of one emulated MCP4725.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Emulator {
    address: u8,
    dac_code: u16,
    power_down: PowerDownMode,
    eeprom_code: u16,
    eeprom_power_down: PowerDownMode,
    eeprom_busy: bool,
}

impl Default for Emulator {
    fn default() -> Self {
        Self::new()
    }
}

impl Emulator {
    /// Emulated device at the default address with a blank EEPROM.
    pub fn new() -> Self {
        Self {
            address: DEFAULT_ADDRESS,
            dac_code: 0,
            power_down: PowerDownMode::Normal,
            eeprom_code: 0,
            eeprom_power_down: PowerDownMode::Normal,
            eeprom_busy: false,
        }
    }

    /// Answer at `address` instead of the default 0x60.
    pub fn with_address(mut self, address: u8) -> Self {
        self.address = address;
        self
    }

    /// Start from an EEPROM holding `code`, as if just powered up.
    ///
    /// The DAC register is loaded from the EEPROM. Codes above 4095 are clamped.
    pub fn with_eeprom(mut self, code: u16) -> Self {
        self.eeprom_code = code.min(MAX_CODE);
        self.power_cycle();
        self
    }

    /// 7-bit address the emulated device answers at.
    pub fn address(&self) -> u8 {
        self.address
    }

    /// Current DAC register code.
    pub fn dac_code(&self) -> u16 {
        self.dac_code
    }

    /// Code stored in EEPROM.
    pub fn eeprom_code(&self) -> u16 {
        self.eeprom_code
    }

    /// Current power-down selection.
    pub fn power_down(&self) -> PowerDownMode {
        self.power_down
    }

    /// True while an EEPROM write is in progress.
    pub fn is_eeprom_busy(&self) -> bool {
        self.eeprom_busy
    }

    /// Apply a frame written to the device.
    ///
    /// Returns the decoded frame. A write-DAC-and-EEPROM frame marks the EEPROM
    /// busy until [`Emulator::finish_eeprom_write`] is called.
    ///
    /// # Errors
    ///
    /// Frames that [`Frame::parse`] rejects leave the registers unchanged.
    pub fn receive(&mut self, bytes: &[u8]) -> Result<Frame, FrameError> {
        let frame = Frame::parse(bytes)?;
        self.dac_code = frame.dac_code();
        // Legacy 2-byte frames carry no power-down bits.
        if let [command, _, _] = *bytes {
            self.power_down = command.get_bits(1..3).into();
        }
        if let Frame::WriteDacAndEeprom(code) = frame {
            self.eeprom_code = code;
            self.eeprom_power_down = self.power_down;
            self.eeprom_busy = true;
        }
        Ok(frame)
    }

    /// Complete a pending EEPROM program cycle.
    ///
    /// The device takes up to 50 ms to program its EEPROM; the owner of the
    /// emulator decides when that time has passed.
    pub fn finish_eeprom_write(&mut self) {
        self.eeprom_busy = false;
    }

    /// Remove and restore power: the DAC register reloads from EEPROM.
    pub fn power_cycle(&mut self) {
        self.dac_code = self.eeprom_code;
        self.power_down = self.eeprom_power_down;
        self.eeprom_busy = false;
    }

    /// The 5-byte response to a read.
    ///
    /// Register codes use the same layout as a fast write: high byte, then the
    /// low nibble in the top of the following byte.
    pub fn response(&self) -> [u8; READ_LENGTH] {
        let mut status = 0u8;
        status.set_bit(7, !self.eeprom_busy);
        status.set_bit(6, true);
        status.set_bits(1..3, u8::from(self.power_down));
        [
            status,
            (self.dac_code >> 4) as u8,
            ((self.dac_code & 0xF) << 4) as u8,
            (self.eeprom_code >> 4) as u8,
            ((self.eeprom_code & 0xF) << 4) as u8,
        ]
    }

    fn check_address(&self, address: u8) -> Result<(), ErrorKind> {
        if address == self.address {
            Ok(())
        } else {
            Err(ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address))
        }
    }
}

impl i2c::ErrorType for Emulator {
    type Error = ErrorKind;
}

impl I2c<SevenBitAddress> for Emulator {
    fn transaction(
        &mut self,
        address: u8,
        operations: &mut [Operation<'_>],
    ) -> Result<(), Self::Error> {
        self.check_address(address)?;
        for operation in operations {
            match operation {
                Operation::Write(bytes) => {
                    self.receive(bytes)
                        .map_err(|_| ErrorKind::NoAcknowledge(NoAcknowledgeSource::Data))?;
                }
                Operation::Read(buffer) => {
                    // Reads past the fifth byte repeat the response.
                    let response = self.response();
                    for (byte, value) in buffer.iter_mut().zip(response.iter().cycle()) {
                        *byte = *value;
                    }
                }
            }
        }
        Ok(())
    }
}

#[cfg(feature = "async")]
impl embedded_hal_async::i2c::I2c<SevenBitAddress> for Emulator {
    async fn transaction(
        &mut self,
        address: u8,
        operations: &mut [Operation<'_>],
    ) -> Result<(), Self::Error> {
        I2c::transaction(self, address, operations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_ready_and_blank() {
        let emulator = Emulator::new();
        assert_eq!(emulator.response(), [0b1100_0000, 0, 0, 0, 0]);
        assert!(!emulator.is_eeprom_busy());
    }

    #[test]
    fn fast_write_leaves_eeprom() {
        let mut emulator = Emulator::new().with_eeprom(1024);
        assert_eq!(emulator.receive(&[0x40, 0xBF, 0xF0]), Ok(Frame::WriteDac(3071)));
        assert_eq!(emulator.dac_code(), 3071);
        assert_eq!(emulator.eeprom_code(), 1024);
        assert_eq!(emulator.response(), [0b1100_0000, 0xBF, 0xF0, 0x40, 0x00]);
    }

    #[test]
    fn eeprom_write_is_busy_until_finished() {
        let mut emulator = Emulator::new();
        emulator.receive(&[0x60, 0x40, 0x00]).unwrap();
        assert!(emulator.is_eeprom_busy());
        assert!(!emulator.response()[0].get_bit(7));
        assert_eq!(emulator.eeprom_code(), 1024);

        emulator.finish_eeprom_write();
        assert!(emulator.response()[0].get_bit(7));
    }

    #[test]
    fn power_cycle_restores_eeprom() {
        let mut emulator = Emulator::new();
        emulator.receive(&[0x60, 0x80, 0x00]).unwrap();
        emulator.receive(&[0x40, 0x10, 0x00]).unwrap();
        assert_eq!(emulator.dac_code(), 256);

        emulator.power_cycle();
        assert_eq!(emulator.dac_code(), 2048);
        assert!(!emulator.is_eeprom_busy());
    }

    #[test]
    fn power_down_bits_are_kept() {
        let mut emulator = Emulator::new();
        emulator.receive(&[0x44, 0x00, 0x00]).unwrap();
        assert_eq!(emulator.power_down(), PowerDownMode::Resistor100k);
        assert_eq!(emulator.response()[0].get_bits(1..3), 0b10);
    }

    #[test]
    fn compatibility_frames_set_top_eight_bits() {
        let mut emulator = Emulator::new();
        emulator.receive(&[0x40, 128, 0x00]).unwrap();
        assert_eq!(emulator.dac_code(), 2048);
        assert_eq!(emulator.receive(&[191, 0x00]), Ok(Frame::Legacy8Bit(191)));
        assert_eq!(emulator.dac_code(), 191 << 4);
    }

    #[test]
    fn legacy_frame_keeps_power_down_and_eeprom() {
        let mut emulator = Emulator::new().with_eeprom(700);
        emulator.receive(&[0x42, 0x00, 0x00]).unwrap();
        emulator.receive(&[0x20, 0x00]).unwrap();
        assert_eq!(emulator.dac_code(), 0x200);
        assert_eq!(emulator.power_down(), PowerDownMode::Resistor1k);
        assert_eq!(emulator.eeprom_code(), 700);
        assert!(!emulator.is_eeprom_busy());
    }

    #[test]
    fn bad_frames_change_nothing() {
        let mut emulator = Emulator::new().with_eeprom(100);
        let before = emulator.clone();
        assert_eq!(emulator.receive(&[0x40]), Err(FrameError::UnexpectedLength(1)));
        assert_eq!(emulator.receive(&[0xE0, 1, 2]), Err(FrameError::UnknownCommand(0xE0)));
        assert_eq!(emulator, before);
    }

    #[test]
    fn bus_checks_address() {
        let mut emulator = Emulator::new().with_address(0x61);
        assert_eq!(
            emulator.write(0x60, &[0x40, 0, 0]),
            Err(ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address))
        );
        let mut buf = [0u8; 5];
        I2c::read(&mut emulator, 0x61, &mut buf).unwrap();
        assert_eq!(buf, emulator.response());
    }

    #[test]
    fn bus_rejects_undecodable_write() {
        let mut emulator = Emulator::new();
        assert_eq!(
            I2c::write(&mut emulator, 0x60, &[1, 2, 3, 4]),
            Err(ErrorKind::NoAcknowledge(NoAcknowledgeSource::Data))
        );
    }
}
