//! CD74HC4067 16-channel multiplexer bank
//!
//! Four muxes share the S0..S3 select lines. Two wirings exist:
//!
//! - separate SIG: each mux has its own SIG input and is always enabled
//! - shared SIG: all SIG pins are tied together and each mux has its own
//!   active-low EN line, so exactly one mux is enabled per read
//!
//! The select lines need a short settle time before SIG is sampled.

use embedded_hal::delay::DelayNs;
use gantry_core::traits::{MuxBank, MUX_COUNT};
use gantry_hal::{InputPin, OutputPin};
use heapless::Vec;

use crate::level::LevelOutput;

/// Number of select lines (S0..S3)
pub const SELECT_LINES: usize = 4;

const LINES: usize = MUX_COUNT as usize;

/// Mux construction errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MuxError {
    /// Need one SIG (separate) or one EN (shared) line per mux
    PinCount,
}

/// SIG/EN wiring
pub enum SignalLines<O, I> {
    /// One SIG input per mux
    Separate(Vec<I, LINES>),
    /// One SIG input, one enable per mux
    Shared {
        sig: I,
        enable: Vec<LevelOutput<O>, LINES>,
    },
}

/// Bank of four CD74HC4067 multiplexers
pub struct Cd74hc4067Bank<O, I, D> {
    select: [O; SELECT_LINES],
    lines: SignalLines<O, I>,
    delay: D,
    settle_us: u32,
}

impl<O, I, D> Cd74hc4067Bank<O, I, D>
where
    O: OutputPin,
    I: InputPin,
    D: DelayNs,
{
    pub fn new(
        select: [O; SELECT_LINES],
        lines: SignalLines<O, I>,
        delay: D,
        settle_us: u32,
    ) -> Result<Self, MuxError> {
        let count = match &lines {
            SignalLines::Separate(sig) => sig.len(),
            SignalLines::Shared { enable, .. } => enable.len(),
        };
        if count != LINES {
            return Err(MuxError::PinCount);
        }

        let mut bank = Self {
            select,
            lines,
            delay,
            settle_us,
        };
        bank.enable_only(None);
        Ok(bank)
    }

    fn enable_only(&mut self, mux: Option<usize>) {
        if let SignalLines::Shared { enable, .. } = &mut self.lines {
            for (i, en) in enable.iter_mut().enumerate() {
                en.set_active(Some(i) == mux);
            }
        }
    }

    fn select_channel(&mut self, channel: u8) {
        for (bit, pin) in self.select.iter_mut().enumerate() {
            pin.set_state((channel >> bit) & 1 != 0);
        }
    }
}

impl<O, I, D> MuxBank for Cd74hc4067Bank<O, I, D>
where
    O: OutputPin,
    I: InputPin,
    D: DelayNs,
{
    fn read_channel(&mut self, mux: u8, channel: u8) -> bool {
        let mux = usize::from(mux);
        self.enable_only(Some(mux));
        self.select_channel(channel);
        self.delay.delay_us(self.settle_us);

        match &self.lines {
            SignalLines::Separate(sig) => match sig.get(mux) {
                Some(pin) => pin.is_high(),
                // Unknown mux reads as an empty square
                None => true,
            },
            SignalLines::Shared { sig, .. } => sig.is_high(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::SharedPin;
    use core::cell::Cell;
    use gantry_core::board::BoardScanner;
    use gantry_hal::ActiveLevel;

    /// Electrical model of four muxes over a board
    struct World {
        select: [Cell<bool>; 4],
        enable: [Cell<bool>; 4],
        pieces: &'static [(u8, u8)],
    }

    impl World {
        fn new(pieces: &'static [(u8, u8)]) -> Self {
            Self {
                select: Default::default(),
                enable: Default::default(),
                pieces,
            }
        }

        fn channel(&self) -> u8 {
            self.select
                .iter()
                .enumerate()
                .fold(0, |acc, (bit, c)| acc | (u8::from(c.get()) << bit))
        }

        fn level(&self, mux: u8) -> bool {
            !self.pieces.contains(&(mux, self.channel()))
        }
    }

    /// SIG line of one mux, or the shared line (first enabled mux drives it)
    struct Sig<'a> {
        world: &'a World,
        mux: Option<u8>,
    }

    impl InputPin for Sig<'_> {
        fn is_high(&self) -> bool {
            match self.mux {
                Some(m) => self.world.level(m),
                None => {
                    let enabled: std::vec::Vec<u8> = (0..4u8)
                        .filter(|&m| !self.world.enable[m as usize].get())
                        .collect();
                    assert_eq!(enabled.len(), 1, "exactly one mux enabled");
                    self.world.level(enabled[0])
                }
            }
        }
    }

    struct CountingDelay {
        calls: u32,
    }

    impl DelayNs for CountingDelay {
        fn delay_ns(&mut self, _ns: u32) {
            self.calls += 1;
        }

        fn delay_us(&mut self, _us: u32) {
            self.calls += 1;
        }
    }

    fn select(world: &World) -> [SharedPin<'_>; 4] {
        [0, 1, 2, 3].map(|i| SharedPin {
            cell: &world.select[i],
        })
    }

    const PIECES: &[(u8, u8)] = &[(0, 0), (0, 9), (2, 5), (3, 15)];

    #[test]
    fn test_separate_sig() {
        let world = World::new(PIECES);
        let sig: Vec<Sig, 4> = (0..4u8)
            .map(|m| Sig {
                world: &world,
                mux: Some(m),
            })
            .collect();
        let mut bank = Cd74hc4067Bank::new(
            select(&world),
            SignalLines::Separate(sig),
            CountingDelay { calls: 0 },
            2,
        )
        .unwrap();

        assert!(!bank.read_channel(0, 0));
        assert!(bank.read_channel(0, 1));
        assert!(!bank.read_channel(2, 5));
        assert_eq!(bank.read_all(0), !((1 << 0) | (1 << 9)));
        assert_eq!(bank.delay.calls, 3 + 16);
    }

    #[test]
    fn test_shared_sig_enables_one_mux() {
        let world = World::new(PIECES);
        let enable: Vec<LevelOutput<SharedPin>, 4> = (0..4)
            .map(|i| {
                LevelOutput::new(
                    SharedPin {
                        cell: &world.enable[i],
                    },
                    ActiveLevel::Low,
                )
            })
            .collect();

        let mut bank = Cd74hc4067Bank::new(
            select(&world),
            SignalLines::Shared {
                sig: Sig {
                    world: &world,
                    mux: None,
                },
                enable,
            },
            CountingDelay { calls: 0 },
            2,
        )
        .unwrap();
        // All disabled (EN high) after construction
        assert!(world.enable.iter().all(|c| c.get()));

        assert!(!bank.read_channel(3, 15));
        assert!(!world.enable[3].get());
        assert!(bank.read_channel(1, 15));
    }

    #[test]
    fn test_wirings_fold_identically() {
        let world_a = World::new(PIECES);
        let sig: Vec<Sig, 4> = (0..4u8)
            .map(|m| Sig {
                world: &world_a,
                mux: Some(m),
            })
            .collect();
        let separate = Cd74hc4067Bank::new(
            select(&world_a),
            SignalLines::Separate(sig),
            CountingDelay { calls: 0 },
            2,
        )
        .unwrap();

        let world_b = World::new(PIECES);
        let enable: Vec<LevelOutput<SharedPin>, 4> = (0..4)
            .map(|i| {
                LevelOutput::new(
                    SharedPin {
                        cell: &world_b.enable[i],
                    },
                    ActiveLevel::Low,
                )
            })
            .collect();
        let shared = Cd74hc4067Bank::new(
            select(&world_b),
            SignalLines::Shared {
                sig: Sig {
                    world: &world_b,
                    mux: None,
                },
                enable,
            },
            CountingDelay { calls: 0 },
            2,
        )
        .unwrap();

        let a = BoardScanner::new(separate).scan();
        let b = BoardScanner::new(shared).scan();
        assert_eq!(a, b);
        assert_eq!(a.occupied_count(), 4);
        assert!(a.is_occupied(1, 1));
        assert!(a.is_occupied(4, 5));
        assert!(a.is_occupied(7, 7));
    }

    #[test]
    fn test_wrong_pin_count() {
        let world = World::new(PIECES);
        let sig: Vec<Sig, 4> = (0..2u8)
            .map(|m| Sig {
                world: &world,
                mux: Some(m),
            })
            .collect();
        let result = Cd74hc4067Bank::new(
            select(&world),
            SignalLines::<SharedPin, Sig>::Separate(sig),
            CountingDelay { calls: 0 },
            2,
        );
        assert!(matches!(result, Err(MuxError::PinCount)));
    }
}
