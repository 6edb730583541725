//! Board occupancy
//!
//! Each square has a sensor behind one of four 16-channel multiplexers.
//! Two rows per mux: channel 0..7 is the first row, 8..15 the second.

pub mod scanner;
pub mod snapshot;
pub mod turn;

pub use scanner::{fold_channel, BoardScanner};
pub use snapshot::{BoardSnapshot, BOARD_SIZE};
pub use turn::{BoardWatch, Turn, TurnTracker, WatchOutcome};
