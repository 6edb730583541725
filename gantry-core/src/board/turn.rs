//! Turn tracking from board changes
//!
//! No chess rules: any change the robot did not make counts as the side to
//! move having moved.

use super::snapshot::BoardSnapshot;

/// Side to move
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Turn {
    #[default]
    White,
    Black,
}

impl Turn {
    pub fn other(self) -> Self {
        match self {
            Turn::White => Turn::Black,
            Turn::Black => Turn::White,
        }
    }
}

/// Two-state turn tracker
#[derive(Debug, Clone, Copy, Default)]
pub struct TurnTracker {
    turn: Turn,
}

impl TurnTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn turn(&self) -> Turn {
        self.turn
    }

    /// Flip to the other side, returning the new side to move
    pub fn toggle(&mut self) -> Turn {
        self.turn = self.turn.other();
        self.turn
    }
}

/// Result of feeding a fresh scan to the watch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum WatchOutcome {
    /// First scan, stored as the baseline
    Baseline,
    /// Same as the baseline
    Unchanged,
    /// Differs from the baseline but has not been stable long enough
    Settling,
    /// Board changed; the turn passed to the returned side
    PlayerMoved(Turn),
}

/// Baseline snapshot, pending change and the turn tracker
///
/// A change only counts once the same differing snapshot has been seen on
/// `stable_scans` consecutive scans, so a piece held in the air while the
/// player thinks does not pass the turn.
#[derive(Debug, Clone)]
pub struct BoardWatch {
    previous: Option<BoardSnapshot>,
    candidate: Option<(BoardSnapshot, u8)>,
    stable_scans: u8,
    tracker: TurnTracker,
}

impl Default for BoardWatch {
    fn default() -> Self {
        Self::new(1)
    }
}

impl BoardWatch {
    pub fn new(stable_scans: u8) -> Self {
        Self {
            previous: None,
            candidate: None,
            stable_scans: stable_scans.max(1),
            tracker: TurnTracker::new(),
        }
    }

    pub fn turn(&self) -> Turn {
        self.tracker.turn()
    }

    pub fn baseline(&self) -> Option<&BoardSnapshot> {
        self.previous.as_ref()
    }

    /// Compare a scan against the baseline
    pub fn observe(&mut self, current: BoardSnapshot) -> WatchOutcome {
        let Some(prev) = &self.previous else {
            self.previous = Some(current);
            return WatchOutcome::Baseline;
        };

        if !prev.differs(&current) {
            self.candidate = None;
            return WatchOutcome::Unchanged;
        }

        let seen = match self.candidate {
            Some((snap, count)) if snap == current => count.saturating_add(1),
            _ => 1,
        };

        if seen >= self.stable_scans {
            self.previous = Some(current);
            self.candidate = None;
            WatchOutcome::PlayerMoved(self.tracker.toggle())
        } else {
            self.candidate = Some((current, seen));
            WatchOutcome::Settling
        }
    }

    /// Adopt a scan without touching the turn (robot-made changes)
    pub fn rebaseline(&mut self, current: BoardSnapshot) {
        self.previous = Some(current);
        self.candidate = None;
    }
}
