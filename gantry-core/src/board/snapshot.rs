//! 8x8 occupancy grid

use gantry_protocol::BOARD_CELLS;

/// Squares per side
pub const BOARD_SIZE: usize = 8;

/// Occupancy of every square, row-major
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BoardSnapshot {
    cells: [[bool; BOARD_SIZE]; BOARD_SIZE],
}

impl BoardSnapshot {
    /// All squares empty
    pub const fn empty() -> Self {
        Self {
            cells: [[false; BOARD_SIZE]; BOARD_SIZE],
        }
    }

    pub fn is_occupied(&self, row: usize, col: usize) -> bool {
        self.cells[row][col]
    }

    pub fn set(&mut self, row: usize, col: usize, occupied: bool) {
        self.cells[row][col] = occupied;
    }

    /// True if any square differs
    pub fn differs(&self, other: &BoardSnapshot) -> bool {
        self.cells != other.cells
    }

    /// Number of squares that differ
    pub fn changed_squares(&self, other: &BoardSnapshot) -> usize {
        self.cells
            .iter()
            .flatten()
            .zip(other.cells.iter().flatten())
            .filter(|(a, b)| a != b)
            .count()
    }

    pub fn occupied_count(&self) -> usize {
        self.cells.iter().flatten().filter(|&&c| c).count()
    }

    /// Wire form: one byte per square, `1` occupied, `0` empty
    pub fn to_bytes(&self) -> [u8; BOARD_CELLS] {
        let mut out = [0u8; BOARD_CELLS];
        for (byte, &cell) in out.iter_mut().zip(self.cells.iter().flatten()) {
            *byte = u8::from(cell);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_bytes_row_major() {
        let mut snap = BoardSnapshot::empty();
        snap.set(0, 1, true);
        snap.set(7, 7, true);
        snap.set(2, 0, true);

        let bytes = snap.to_bytes();
        assert_eq!(bytes[1], 1);
        assert_eq!(bytes[16], 1);
        assert_eq!(bytes[63], 1);
        assert_eq!(bytes.iter().filter(|&&b| b == 1).count(), 3);
        assert_eq!(snap.occupied_count(), 3);
    }

    #[test]
    fn test_differs() {
        let a = BoardSnapshot::empty();
        let mut b = a;
        assert!(!a.differs(&b));

        b.set(4, 4, true);
        assert!(a.differs(&b));
        assert_eq!(a.changed_squares(&b), 1);
    }
}
