//! Turn indicator

use crate::board::Turn;

/// Shows whose turn it is (one LED per side)
pub trait TurnIndicator {
    fn show(&mut self, turn: Turn);
}
