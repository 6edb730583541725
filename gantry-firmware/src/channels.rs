//! Shared state between the bus and motion tasks
//!
//! The bus task owns the I2C peripheral and the motion task owns the
//! motors, magnet and sensors. They meet in two places:
//!
//! - `SESSION`: the protocol state machine, locked for each bus event and
//!   for each completion reported by the motion task
//! - `JOB`: latest job handed from the bus task to the motion task

use core::cell::RefCell;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::signal::Signal;

use gantry_core::session::{Job, ProtocolSession, DEFAULT_PAYLOAD_TIMEOUT_US};

/// Protocol session shared by both tasks
///
/// The payload timeout is replaced with the configured value at boot.
pub static SESSION: Mutex<CriticalSectionRawMutex, RefCell<ProtocolSession>> =
    Mutex::new(RefCell::new(ProtocolSession::new(DEFAULT_PAYLOAD_TIMEOUT_US)));

/// Job accepted by the session, waiting for the motion task
///
/// The session refuses new commands while executing, so at most one job
/// is ever pending here.
pub static JOB: Signal<CriticalSectionRawMutex, Job> = Signal::new();
