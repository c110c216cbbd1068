#![no_std]
#![no_main]

use embassy_executor::Spawner;
use embassy_rp::bind_interrupts;
use embassy_rp::i2c;
use embassy_rp::i2c_slave::{self, I2cSlave};
use embassy_rp::peripherals::I2C0;
use mcp4725_hal::constants::DEFAULT_ADDRESS;
use {defmt_rtt as _, panic_probe as _};

mod tasks;

bind_interrupts!(struct I2cInterrupts {
    I2C0_IRQ => i2c::InterruptHandler<I2C0>;
});

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    let p = embassy_rp::init(Default::default());

    // I2C target initialisation.
    let t_sda = p.PIN_20;
    let t_scl = p.PIN_21;
    let mut target_config = i2c_slave::Config::default();
    target_config.general_call = true;
    target_config.addr = u16::from(DEFAULT_ADDRESS);
    let target_driver = I2cSlave::new(p.I2C0, t_scl, t_sda, I2cInterrupts, target_config);

    defmt::info!("Spawning MCP4725 emulation task.");
    spawner
        .spawn(tasks::i2c::emulate(target_driver))
        .expect("Failed to spawn MCP4725 emulation task.");
}
