//! Gantry - CoreXY Chessboard Robot Firmware
//!
//! Main firmware binary for RP2040-based chessboard gantries. The board is
//! an I2C peripheral: the host sends `H`ome, `M`ove and `B`oard commands
//! and polls a status byte while the motors run.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::bind_interrupts;
use embassy_rp::i2c_slave::I2cSlave;
use embassy_rp::peripherals::I2C0;
use embassy_time::{Delay, Timer};
use {defmt_rtt as _, panic_probe as _};

use gantry_core::motion::MotionEngine;
use gantry_drivers::magnet::Electromagnet;
use gantry_hal::I2cTargetConfig;
use gantry_hal_rp2040::i2c::target_config;
use gantry_hal_rp2040::{MagnetPwm, PinBank};

mod channels;
mod config;
mod hardware;
mod tasks;

bind_interrupts!(struct Irqs {
    I2C0_IRQ => embassy_rp::i2c::InterruptHandler<I2C0>;
});

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Gantry firmware starting...");

    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    let config = config::load_config();
    info!(
        "Config: address=0x{:02x}, {} steps/mm, wiring={}",
        config.bus.address,
        config.kinematics.steps_per_mm(),
        config.mux.wiring
    );

    channels::SESSION.lock(|s| {
        s.borrow_mut()
            .set_payload_timeout_us(u64::from(config.bus.payload_timeout_ms) * 1_000)
    });

    let (mut bank, rest) = PinBank::from_peripherals(p);

    let motors = unwrap!(hardware::motors(&mut bank, &config.pins));
    let endstops = unwrap!(hardware::endstops(&mut bank, &config.pins));
    let leds = unwrap!(hardware::turn_leds(&mut bank, &config.pins));
    let scanner = unwrap!(hardware::scanner(&mut bank, &config.mux));
    info!("GPIO drivers initialized");

    let magnet = Electromagnet::new(MagnetPwm::new(rest.pwm_slice5, rest.magnet_pin));
    let engine = MotionEngine::new(motors, endstops, magnet, Delay, &config);
    info!("Motion engine initialized");

    let bus_config = match I2cTargetConfig::new(config.bus.address) {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("Invalid bus address: {}", e);
            I2cTargetConfig::default()
        }
    };
    let dev = I2cSlave::new(
        rest.i2c0,
        rest.i2c_scl,
        rest.i2c_sda,
        Irqs,
        target_config(&bus_config),
    );
    info!("I2C target listening at 0x{:02x}", bus_config.address);

    // Spawn tasks
    unwrap!(spawner.spawn(tasks::bus_task(dev)));
    unwrap!(spawner.spawn(tasks::motion_task(
        engine,
        scanner,
        leds,
        tasks::WatchSettings::from(&config.board),
    )));

    info!("All tasks spawned, firmware running");

    loop {
        Timer::after_secs(60).await;
        trace!("Main loop heartbeat");
    }
}
