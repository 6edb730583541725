//! Host bus protocol
//!
//! The gantry is an I2C peripheral. The host writes a single command byte,
//! optionally followed by a payload, and then polls with read requests
//! until the device reports completion.
//!
//! # Protocol Overview
//!
//! ```text
//! ┌─────────┬──────────────────────────────────┬──────────────────────────┐
//! │ COMMAND │ PAYLOAD (host → device)          │ READS (device → host)    │
//! ├─────────┼──────────────────────────────────┼──────────────────────────┤
//! │ 'H'     │ none                             │ 'W' … then 'H'           │
//! │ 'M'     │ 4 × f32 LE: sx, sy, ex, ey (mm)  │ 'W' … then 'M'           │
//! │ 'B'     │ none                             │ 'R' + 64 cells, then 0   │
//! │ other   │ -                                │ 'E'                      │
//! └─────────┴──────────────────────────────────┴──────────────────────────┘
//! ```
//!
//! There are no frames or checksums; each read transaction is answered one
//! byte at a time from the session state.

#![no_std]
#![deny(unsafe_code)]

pub mod command;
pub mod response;
pub mod status;

#[cfg(test)]
extern crate std;

pub use command::{Command, DecodeError, MovePayload, MOVE_PAYLOAD_LEN};
pub use response::{Response, BOARD_CELLS, MAX_RESPONSE_LEN};
pub use status::{STATUS_BOARD, STATUS_ERROR, STATUS_WORKING};
