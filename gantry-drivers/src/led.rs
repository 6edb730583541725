//! Turn indicator LEDs

use gantry_core::board::Turn;
use gantry_core::traits::TurnIndicator;
use gantry_hal::OutputPin;

use crate::level::LevelOutput;

/// One LED per side; exactly one is lit
pub struct TurnLeds<P> {
    white: LevelOutput<P>,
    black: LevelOutput<P>,
}

impl<P: OutputPin> TurnLeds<P> {
    pub fn new(white: LevelOutput<P>, black: LevelOutput<P>) -> Self {
        Self { white, black }
    }
}

impl<P: OutputPin> TurnIndicator for TurnLeds<P> {
    fn show(&mut self, turn: Turn) {
        self.white.set_active(turn == Turn::White);
        self.black.set_active(turn == Turn::Black);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockPin;
    use gantry_hal::ActiveLevel;

    #[test]
    fn test_show_turn() {
        let mut leds = TurnLeds::new(
            LevelOutput::new(MockPin::new(), ActiveLevel::High),
            LevelOutput::new(MockPin::new(), ActiveLevel::High),
        );

        leds.show(Turn::White);
        assert!(leds.white.is_active());
        assert!(!leds.black.is_active());

        leds.show(Turn::Black);
        assert!(!leds.white.is_active());
        assert!(leds.black.is_active());
    }
}
