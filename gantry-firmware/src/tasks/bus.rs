//! I2C target task
//!
//! Owns the I2C0 peripheral. Writes are fed to the protocol session and
//! any job it produces is signalled to the motion task; reads are served
//! one byte at a time so a multi-byte read walks the board response.
//!
//! The payload window is checked whenever the bus is touched, which is
//! the only time the host can observe it.

use defmt::*;
use embassy_rp::i2c_slave::{Command as BusCommand, I2cSlave, ReadStatus};
use embassy_rp::peripherals::I2C0;
use embassy_time::Instant;

use gantry_core::session::ErrorKind;
use gantry_hal_rp2040::i2c::BusFault;

use crate::channels::{JOB, SESSION};

/// Receive buffer; comfortably larger than the 17-byte move write
const RX_BUF_LEN: usize = 32;

/// Bus task - serve the host until power off
#[embassy_executor::task]
pub async fn bus_task(mut dev: I2cSlave<'static, I2C0>) {
    info!("Bus task started");

    let mut buf = [0u8; RX_BUF_LEN];

    loop {
        match dev.listen(&mut buf).await {
            Ok(BusCommand::Write(len)) => handle_write(&buf[..len]),
            Ok(BusCommand::Read) => serve_read(&mut dev).await,
            Ok(BusCommand::WriteRead(len)) => {
                handle_write(&buf[..len]);
                serve_read(&mut dev).await;
            }
            Ok(BusCommand::GeneralCall(len)) => {
                debug!("Ignoring general call ({} bytes)", len);
            }
            Err(e) => {
                let fault = BusFault::from(e);
                if let BusFault::PartialWrite(len) = fault {
                    // The session discards everything past a complete command
                    warn!("Write overflowed receive buffer ({} bytes)", len);
                    handle_write(&buf[..len.min(RX_BUF_LEN)]);
                } else {
                    warn!("Bus error: {}", fault);
                }
            }
        }
    }
}

fn now_us() -> u64 {
    Instant::now().as_micros()
}

/// Feed one write transaction to the session
fn handle_write(bytes: &[u8]) {
    let outcome = SESSION.lock(|s| s.borrow_mut().accept_bytes(bytes, now_us()));

    if let Some(cmd) = outcome.accepted {
        debug!("Command accepted: {}", cmd);
    }
    if let Some(byte) = outcome.rejected {
        warn!("Unknown command byte 0x{:02x}", byte);
    }
    if outcome.ignored_busy > 0 {
        warn!("Ignored {} bytes while executing", outcome.ignored_busy);
    }
    if outcome.discarded > 0 {
        debug!("Discarded {} trailing bytes", outcome.discarded);
    }
    match outcome.failed {
        Some(ErrorKind::PayloadTimeout) => warn!("Move payload timed out"),
        Some(kind) => warn!("Command failed: {}", kind),
        None => {}
    }

    if let Some(job) = outcome.job {
        info!("Dispatching {}", job);
        JOB.signal(job);
    }
}

/// Answer a read request byte by byte
async fn serve_read(dev: &mut I2cSlave<'static, I2C0>) {
    loop {
        let byte = SESSION.lock(|s| s.borrow_mut().read_byte(now_us()));
        match dev.respond_to_read(&[byte]).await {
            Ok(ReadStatus::NeedMoreBytes) => continue,
            Ok(ReadStatus::Done) => break,
            Ok(ReadStatus::LeftoverBytes(n)) => {
                trace!("Read ended with {} byte(s) unsent", n);
                break;
            }
            Err(e) => {
                warn!("Read failed: {}", BusFault::from(e));
                break;
            }
        }
    }
}
