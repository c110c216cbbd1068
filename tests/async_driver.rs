//! Async driver tests.
//!
//! Run with: cargo test --features async --test async_driver

use embedded_hal::i2c::ErrorKind;
use embedded_hal_mock::eh1::i2c::{Mock as I2cMock, Transaction as I2cTransaction};
use mcp4725_hal::emulator::Emulator;
use mcp4725_hal::{Config, Mcp4725Async};

const ADDRESS: u8 = 0x60;

#[tokio::test]
async fn writes_same_frames_as_blocking_driver() {
    let mut i2c = I2cMock::new(&[
        I2cTransaction::write(ADDRESS, vec![0x40, 0x80, 0x00]),
        I2cTransaction::write(ADDRESS, vec![0x40, 0x5D, 0x10]),
        I2cTransaction::write(ADDRESS, vec![0x40, 0xBF, 0xF0]),
        I2cTransaction::write(ADDRESS, vec![0x60, 0x40, 0x00]),
        I2cTransaction::write(ADDRESS, vec![0x40, 128, 0x00]),
        I2cTransaction::write(ADDRESS, vec![191, 0x00]),
    ]);
    let mut dac = Mcp4725Async::new(i2c.clone());
    dac.set_value(2048).await.unwrap();
    dac.set_voltage(1.2).await.unwrap();
    dac.set_value_norm(0.75).await.unwrap();
    dac.set_eeprom_value(1024).await.unwrap();
    dac.set_value_8bit(128).await.unwrap();
    dac.set_value_8bit_legacy(191).await.unwrap();
    i2c.done();
}

#[tokio::test]
async fn reads_decode_registers() {
    let response = vec![0xC0, 0xBF, 0xF0, 0x40, 0x00];
    let mut i2c = I2cMock::new(&[
        I2cTransaction::read(ADDRESS, response.clone()),
        I2cTransaction::read(ADDRESS, response.clone()),
        I2cTransaction::read(ADDRESS, response.clone()),
        I2cTransaction::read(ADDRESS, response),
    ]);
    let mut dac = Mcp4725Async::new(i2c.clone());
    assert_eq!(dac.read_value().await, Ok(3071));
    assert_eq!(dac.read_eeprom().await, Ok(1024));
    assert!((dac.read_voltage().await.unwrap() - 2.475).abs() < 1e-3);
    assert!(dac.read_status().await.unwrap().ready);
    i2c.done();
}

#[tokio::test]
async fn bus_error_is_returned_unchanged() {
    let mut i2c = I2cMock::new(&[
        I2cTransaction::write(ADDRESS, vec![0x40, 0x00, 0x10]).with_error(ErrorKind::Bus),
        I2cTransaction::read(ADDRESS, vec![0; 5]).with_error(ErrorKind::Overrun),
    ]);
    let mut dac = Mcp4725Async::new(i2c.clone());
    assert_eq!(dac.set_value(1).await, Err(ErrorKind::Bus));
    assert_eq!(dac.read_value_norm().await, Err(ErrorKind::Overrun));
    i2c.done();
}

#[tokio::test]
async fn emulator_tracks_eeprom_busy_flag() {
    let config = Config::new().with_reference_voltage(5.0);
    let mut dac = Mcp4725Async::with_config(Emulator::new(), config);
    dac.set_eeprom_value(4000).await.unwrap();
    assert!(!dac.read_status().await.unwrap().ready);

    let mut emulator = dac.release();
    emulator.finish_eeprom_write();
    emulator.power_cycle();

    let mut dac = Mcp4725Async::with_config(emulator, config);
    let status = dac.read_status().await.unwrap();
    assert!(status.ready);
    assert_eq!(status.dac_code, 4000);
    assert_eq!(dac.read_value_norm().await.unwrap(), 4000.0 / 4095.0);
}

#[tokio::test]
async fn accessors_match_configuration() {
    let config = Config::new().with_address(0x61).with_reference_voltage(5.0);
    let mut i2c = I2cMock::new(&Vec::<I2cTransaction>::new());
    let dac = Mcp4725Async::with_config(i2c.clone(), config);
    assert_eq!(dac.address(), 0x61);
    assert_eq!(dac.reference_voltage(), 5.0);
    assert_eq!(dac.config(), config);
    i2c.done();
}
