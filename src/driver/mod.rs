use embedded_hal::i2c::{I2c, SevenBitAddress};

use crate::analog::{code_to_norm, code_to_voltage, norm_to_code, voltage_to_code};
use crate::commands::Frame;
use crate::config::Config;
use crate::constants::READ_LENGTH;
use crate::status::{self, Status};

#[cfg(feature = "async")]
pub(crate) mod async_i2c;

/// Driver for the MCP4725.
///
/// # Quick start
///
/// Create the driver with [`Mcp4725::new`] for a device at the default address
/// (0x60) supplied from 3.3V, or [`Mcp4725::with_config`] otherwise. The driver
/// takes ownership of anything implementing [`embedded_hal::i2c::I2c`]; pass
/// `&mut i2c` or an `embedded-hal-bus` device to share the bus with other drivers,
/// and use [`Mcp4725::release`] to get the bus back.
///
/// The output can be set as a raw 12-bit code ([`Mcp4725::set_value`]), a voltage
/// ([`Mcp4725::set_voltage`]), or a fraction of full scale
/// ([`Mcp4725::set_value_norm`]). Each has a matching read. Out-of-range inputs
/// saturate instead of producing errors.
///
/// # Bus transactions
///
/// Every method performs exactly one I2C write or one 5-byte I2C read and returns
/// the bus error unchanged if it fails. Nothing is retried and no delays are
/// inserted.
///
/// # Compatibility modes
///
/// [`Mcp4725::set_value_8bit`] and [`Mcp4725::set_value_8bit_legacy`] are not part
/// of the MCP4725 command set. They exist for clone modules that only respond to
/// 8-bit writes, and should only be used with hardware known to need them.
#[derive(Debug)]
pub struct Mcp4725<I2C> {
    /// Underlying bus.
    i2c: I2C,
    /// Address and reference voltage.
    config: Config,
}

impl<I2C> Mcp4725<I2C>
where
    I2C: I2c<SevenBitAddress>,
{
    ////////////////////////////////////////////////////////////////////////////////
    // Constructors
    ////////////////////////////////////////////////////////////////////////////////

    /// Driver for a device at the default address (0x60) with a 3.3V reference.
    ///
    /// No bus traffic is generated.
    pub fn new(i2c: I2C) -> Self {
        Self::with_config(i2c, Config::default())
    }

    /// Driver with the given address and reference voltage.
    ///
    /// The reference voltage must be positive. It is not checked.
    pub fn with_config(i2c: I2C, config: Config) -> Self {
        Self { i2c, config }
    }

    /// Rebuild the driver with a different reference voltage.
    pub fn with_reference_voltage(self, reference_voltage: f32) -> Self {
        let config = self.config.with_reference_voltage(reference_voltage);
        Self::with_config(self.i2c, config)
    }

    /// Destroy the driver and return the bus.
    pub fn release(self) -> I2C {
        self.i2c
    }

    /// Current configuration.
    pub fn config(&self) -> Config {
        self.config
    }

    /// 7-bit I2C address of the device.
    pub fn address(&self) -> u8 {
        self.config.address
    }

    /// Reference voltage used for voltage conversions.
    pub fn reference_voltage(&self) -> f32 {
        self.config.reference_voltage
    }

    ////////////////////////////////////////////////////////////////////////////////
    // Bus access
    ////////////////////////////////////////////////////////////////////////////////

    fn write_frame(&mut self, frame: Frame) -> Result<(), I2C::Error> {
        let bytes = frame.bytes();
        #[cfg(feature = "defmt")]
        defmt::trace!(
            "MCP4725 {=u8:#X}: write {} {=[u8]:#X}",
            self.config.address,
            frame,
            &bytes[..]
        );
        self.i2c.write(self.config.address, &bytes)
    }

    fn read_buffer(&mut self) -> Result<[u8; READ_LENGTH], I2C::Error> {
        let mut buf = [0u8; READ_LENGTH];
        self.i2c.read(self.config.address, &mut buf)?;
        #[cfg(feature = "defmt")]
        defmt::trace!("MCP4725 {=u8:#X}: read {=[u8]:#X}", self.config.address, &buf[..]);
        Ok(buf)
    }

    ////////////////////////////////////////////////////////////////////////////////
    // DAC register
    ////////////////////////////////////////////////////////////////////////////////

    /// Set the output to a raw 12-bit code.
    ///
    /// `code` is clamped to `0..=4095`. This is a fast-mode write (command 0x40):
    /// only the DAC register changes and the EEPROM is untouched.
    ///
    /// # Datasheet
    ///
    /// See section 6.1.2 for the Write DAC Register command.
    pub fn set_value(&mut self, code: i32) -> Result<(), I2C::Error> {
        self.write_frame(Frame::write_dac(code))
    }

    /// Read the raw 12-bit code in the DAC register.
    pub fn read_value(&mut self) -> Result<u16, I2C::Error> {
        Ok(status::dac_code(&self.read_buffer()?))
    }

    /// Set the output to `voltage`, relative to the reference voltage.
    ///
    /// The code is `voltage / reference * 4095` truncated toward zero, so voltages
    /// outside `0.0..=reference` saturate at the ends of the range.
    pub fn set_voltage(&mut self, voltage: f32) -> Result<(), I2C::Error> {
        let code = voltage_to_code(voltage, self.config.reference_voltage);
        self.set_value(code)
    }

    /// Output voltage computed from the DAC register and the reference voltage.
    ///
    /// The MCP4725 cannot measure its output; this is `code / 4095 * reference`.
    pub fn read_voltage(&mut self) -> Result<f32, I2C::Error> {
        let code = self.read_value()?;
        Ok(code_to_voltage(code, self.config.reference_voltage))
    }

    /// Set the output to a fraction of full scale.
    ///
    /// `value` is clamped to `0.0..=1.0` and the code is `value * 4095` truncated
    /// toward zero. NaN sets the output to 0.
    pub fn set_value_norm(&mut self, value: f32) -> Result<(), I2C::Error> {
        self.set_value(norm_to_code(value))
    }

    /// Read the DAC register as a fraction of full scale (`0.0..=1.0`).
    pub fn read_value_norm(&mut self) -> Result<f32, I2C::Error> {
        Ok(code_to_norm(self.read_value()?))
    }

    ////////////////////////////////////////////////////////////////////////////////
    // EEPROM
    ////////////////////////////////////////////////////////////////////////////////

    /// Read the code stored in EEPROM.
    ///
    /// This is the output the device drives immediately after power-up,
    /// regardless of any writes since.
    pub fn read_eeprom(&mut self) -> Result<u16, I2C::Error> {
        Ok(status::eeprom_code(&self.read_buffer()?))
    }

    /// Set the output and store the code in EEPROM as the power-on default.
    ///
    /// `code` is clamped to `0..=4095`.
    ///
    /// <div class="warning">
    ///
    /// Programming the EEPROM takes up to 50 ms, during which the device reports
    /// itself busy. This driver does not wait. Poll [`Status::ready`] with
    /// [`Mcp4725::read_status`] before another EEPROM write.
    ///
    /// </div>
    ///
    /// # Datasheet
    ///
    /// See section 6.1.3 for the Write DAC Register and EEPROM command.
    pub fn set_eeprom_value(&mut self, code: i32) -> Result<(), I2C::Error> {
        self.write_frame(Frame::write_dac_and_eeprom(code))
    }

    /// Read and decode the full status of the device.
    ///
    /// Includes the EEPROM ready flag, power-on-reset flag, and power-down mode
    /// alongside both register codes.
    pub fn read_status(&mut self) -> Result<Status, I2C::Error> {
        Ok(Status::from_buffer(&self.read_buffer()?))
    }

    ////////////////////////////////////////////////////////////////////////////////
    // Compatibility modes
    ////////////////////////////////////////////////////////////////////////////////

    /// Non-standard: set the output with an 8-bit code (`0..=255`).
    ///
    /// Writes `[0x40, code, 0x00]`, placing the code where a compliant device
    /// expects the high byte. Only for clone modules that ignore the low nibble.
    /// A genuine MCP4725 will output `code << 4`.
    pub fn set_value_8bit(&mut self, code: i32) -> Result<(), I2C::Error> {
        self.write_frame(Frame::write_dac_8bit(code))
    }

    /// Non-standard: set the output with an 8-bit code in a 2-byte write.
    ///
    /// Writes `[code, 0x00]` with no command byte. Only for clone modules that
    /// reject the 3-byte write entirely.
    pub fn set_value_8bit_legacy(&mut self, code: i32) -> Result<(), I2C::Error> {
        self.write_frame(Frame::legacy_8bit(code))
    }
}
