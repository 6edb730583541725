//! Multiplexer matrix scan

use super::snapshot::{BoardSnapshot, BOARD_SIZE};
use crate::traits::{MuxBank, MUX_CHANNELS, MUX_COUNT};

/// Board square for a mux channel: `(row, col)`
pub const fn fold_channel(mux: u8, channel: u8) -> (usize, usize) {
    let row = mux as usize * 2 + channel as usize / BOARD_SIZE;
    let col = channel as usize % BOARD_SIZE;
    (row, col)
}

/// Reads all four multiplexers into a snapshot
pub struct BoardScanner<X> {
    mux: X,
}

impl<X: MuxBank> BoardScanner<X> {
    pub fn new(mux: X) -> Self {
        Self { mux }
    }

    /// Scan every square; a low sensor line means a piece is present
    pub fn scan(&mut self) -> BoardSnapshot {
        let mut snapshot = BoardSnapshot::empty();
        for mux in 0..MUX_COUNT {
            let levels = self.mux.read_all(mux);
            for channel in 0..MUX_CHANNELS {
                let (row, col) = fold_channel(mux, channel);
                let high = levels & (1 << channel) != 0;
                snapshot.set(row, col, !high);
            }
        }
        snapshot
    }
}
