//! Response buffer served byte-by-byte to read requests

use heapless::Vec;

use crate::status::{STATUS_BOARD, STATUS_DRAINED};

/// Number of board cells in a scan reply
pub const BOARD_CELLS: usize = 64;

/// Largest reply: header plus all board cells
pub const MAX_RESPONSE_LEN: usize = 1 + BOARD_CELLS;

/// Prepared reply and its read cursor
///
/// Reads advance the cursor; once the buffer is exhausted every further
/// read yields `0`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Response {
    bytes: Vec<u8, MAX_RESPONSE_LEN>,
    cursor: usize,
}

impl Response {
    /// Empty response (nothing to drain)
    pub const fn new() -> Self {
        Self {
            bytes: Vec::new(),
            cursor: 0,
        }
    }

    /// Single completion byte
    pub fn ack(byte: u8) -> Self {
        let mut bytes = Vec::new();
        // Capacity is 65, one byte always fits
        let _ = bytes.push(byte);
        Self { bytes, cursor: 0 }
    }

    /// Board scan reply: `'R'` followed by 64 row-major cells
    pub fn board(cells: &[u8; BOARD_CELLS]) -> Self {
        let mut bytes = Vec::new();
        let _ = bytes.push(STATUS_BOARD);
        let _ = bytes.extend_from_slice(cells);
        Self { bytes, cursor: 0 }
    }

    /// Reset to empty
    pub fn clear(&mut self) {
        self.bytes.clear();
        self.cursor = 0;
    }

    /// Serve the next byte and advance the cursor
    pub fn next_byte(&mut self) -> u8 {
        match self.bytes.get(self.cursor) {
            Some(&byte) => {
                self.cursor += 1;
                byte
            }
            None => STATUS_DRAINED,
        }
    }

    /// First byte of the reply, without touching the cursor
    pub fn first(&self) -> Option<u8> {
        self.bytes.first().copied()
    }

    /// Bytes still to be served
    pub fn remaining(&self) -> usize {
        self.bytes.len() - self.cursor
    }

    /// Current cursor position
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Full reply contents
    pub fn as_slice(&self) -> &[u8] {
        &self.bytes
    }
}
