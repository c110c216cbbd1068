use embassy_rp::i2c_slave::{self, I2cSlave};
use embassy_rp::peripherals::I2C0;
use embassy_time::{Duration, Instant};
use mcp4725_hal::commands::Frame;
use mcp4725_hal::emulator::Emulator;

/// Typical EEPROM program time from the datasheet (table 1-1).
const EEPROM_WRITE_TIME: Duration = Duration::from_millis(25);

#[embassy_executor::task]
pub(crate) async fn emulate(mut driver: I2cSlave<'static, I2C0>) -> ! {
    defmt::info!("MCP4725 emulation task started");
    let mut emulator = Emulator::new();
    let mut eeprom_write_started: Option<Instant> = None;
    // Longer than any valid frame so oversized writes are seen and rejected.
    let mut receive_buffer = [0_u8; 16];
    loop {
        let res = driver.listen(&mut receive_buffer).await;

        if let Some(started) = eeprom_write_started {
            if started.elapsed() >= EEPROM_WRITE_TIME {
                emulator.finish_eeprom_write();
                eeprom_write_started = None;
                defmt::info!("EEPROM write complete");
            }
        }

        match res {
            Err(e) => defmt::error!("Error from I2C target driver: {:?}", e),
            Ok(i2c_slave::Command::GeneralCall(n)) => general_call(&receive_buffer[..n]),
            Ok(i2c_slave::Command::Read) => read(&mut driver, &emulator).await,
            Ok(i2c_slave::Command::WriteRead(n)) => {
                write(&mut emulator, &mut eeprom_write_started, &receive_buffer[..n]);
                read(&mut driver, &emulator).await;
            }
            Ok(i2c_slave::Command::Write(n)) => {
                write(&mut emulator, &mut eeprom_write_started, &receive_buffer[..n])
            }
        }
    }
}

fn general_call(bytes: &[u8]) {
    // Reset (0x06) and wake-up (0x09) are not emulated.
    defmt::info!("General call ignored: {=[u8]:#X}", bytes);
}

fn write(emulator: &mut Emulator, eeprom_write_started: &mut Option<Instant>, bytes: &[u8]) {
    match emulator.receive(bytes) {
        Ok(frame) => {
            defmt::info!(
                "Write {=[u8]:#X}: {} -> DAC register {}",
                bytes,
                frame,
                emulator.dac_code()
            );
            if let Frame::WriteDacAndEeprom(_) = frame {
                *eeprom_write_started = Some(Instant::now());
            }
        }
        Err(e) => defmt::warn!("Undecodable write {=[u8]:#X}: {}", bytes, e),
    }
}

async fn read(driver: &mut I2cSlave<'static, I2C0>, emulator: &Emulator) {
    let response = emulator.response();
    defmt::info!("Read: responding with {=[u8]:#X}", &response[..]);
    use i2c_slave::ReadStatus::*;
    loop {
        match driver.respond_to_read(&response).await {
            // The controller wants more than 5 bytes; repeat the response.
            Ok(NeedMoreBytes) => continue,
            Ok(Done) | Ok(LeftoverBytes(_)) => break,
            Err(e) => {
                defmt::error!("I2C Read error: {:?}", e);
                break;
            }
        }
    }
}
