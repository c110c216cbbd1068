//! Async driver over `embedded_hal_async` I2C.
use embedded_hal::i2c::SevenBitAddress;
use embedded_hal_async::i2c::I2c;

use crate::analog::{code_to_norm, code_to_voltage, norm_to_code, voltage_to_code};
use crate::commands::Frame;
use crate::config::Config;
use crate::constants::READ_LENGTH;
use crate::status::{self, Status};

/// Async driver for the MCP4725.
///
/// Identical to [`Mcp4725`] except that each method awaits its single bus
/// transaction. See there for the behaviour of each operation.
///
/// [`Mcp4725`]: crate::Mcp4725
#[derive(Debug)]
pub struct Mcp4725Async<I2C> {
    i2c: I2C,
    config: Config,
}

impl<I2C> Mcp4725Async<I2C>
where
    I2C: I2c<SevenBitAddress>,
{
    /// Driver for a device at the default address (0x60) with a 3.3V reference.
    pub fn new(i2c: I2C) -> Self {
        Self::with_config(i2c, Config::default())
    }

    /// Driver with the given address and reference voltage.
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

    async fn write_frame(&mut self, frame: Frame) -> Result<(), I2C::Error> {
        let bytes = frame.bytes();
        #[cfg(feature = "defmt")]
        defmt::trace!(
            "MCP4725 {=u8:#X}: write {} {=[u8]:#X}",
            self.config.address,
            frame,
            &bytes[..]
        );
        self.i2c.write(self.config.address, &bytes).await
    }

    async fn read_buffer(&mut self) -> Result<[u8; READ_LENGTH], I2C::Error> {
        let mut buf = [0u8; READ_LENGTH];
        self.i2c.read(self.config.address, &mut buf).await?;
        #[cfg(feature = "defmt")]
        defmt::trace!("MCP4725 {=u8:#X}: read {=[u8]:#X}", self.config.address, &buf[..]);
        Ok(buf)
    }

    /// Set the output to a raw 12-bit code, clamped to `0..=4095`.
    pub async fn set_value(&mut self, code: i32) -> Result<(), I2C::Error> {
        self.write_frame(Frame::write_dac(code)).await
    }

    /// Read the raw 12-bit code in the DAC register.
    pub async fn read_value(&mut self) -> Result<u16, I2C::Error> {
        Ok(status::dac_code(&self.read_buffer().await?))
    }

    /// Set the output to `voltage`, relative to the reference voltage.
    pub async fn set_voltage(&mut self, voltage: f32) -> Result<(), I2C::Error> {
        let code = voltage_to_code(voltage, self.config.reference_voltage);
        self.set_value(code).await
    }

    /// Output voltage computed from the DAC register and the reference voltage.
    pub async fn read_voltage(&mut self) -> Result<f32, I2C::Error> {
        let code = self.read_value().await?;
        Ok(code_to_voltage(code, self.config.reference_voltage))
    }

    /// Set the output to a fraction of full scale, clamped to `0.0..=1.0`.
    pub async fn set_value_norm(&mut self, value: f32) -> Result<(), I2C::Error> {
        self.set_value(norm_to_code(value)).await
    }

    /// Read the DAC register as a fraction of full scale.
    pub async fn read_value_norm(&mut self) -> Result<f32, I2C::Error> {
        Ok(code_to_norm(self.read_value().await?))
    }

    /// Read the code stored in EEPROM.
    pub async fn read_eeprom(&mut self) -> Result<u16, I2C::Error> {
        Ok(status::eeprom_code(&self.read_buffer().await?))
    }

    /// Set the output and store the code in EEPROM, clamped to `0..=4095`.
    pub async fn set_eeprom_value(&mut self, code: i32) -> Result<(), I2C::Error> {
        self.write_frame(Frame::write_dac_and_eeprom(code)).await
    }

    /// Read and decode the full status of the device.
    pub async fn read_status(&mut self) -> Result<Status, I2C::Error> {
        Ok(Status::from_buffer(&self.read_buffer().await?))
    }

    /// Non-standard: set the output with an 8-bit code (`0..=255`) in a 3-byte write.
    pub async fn set_value_8bit(&mut self, code: i32) -> Result<(), I2C::Error> {
        self.write_frame(Frame::write_dac_8bit(code)).await
    }

    /// Non-standard: set the output with an 8-bit code (`0..=255`) in a 2-byte write.
    pub async fn set_value_8bit_legacy(&mut self, code: i32) -> Result<(), I2C::Error> {
        self.write_frame(Frame::legacy_8bit(code)).await
    }
}
