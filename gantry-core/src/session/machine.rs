//! Session states, failures and jobs

use gantry_protocol::{Command, MovePayload};

use crate::motion::{MotionError, Position};

/// Why a command failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ErrorKind {
    /// Move payload did not arrive in time
    PayloadTimeout,
    /// Command byte not recognized
    UnknownCommand,
    /// Move payload contained a non-finite coordinate
    InvalidPayload,
    /// Move target outside the representable range
    OutOfRange,
    /// An end-stop never triggered
    HomingTimedOut,
}

impl From<MotionError> for ErrorKind {
    fn from(err: MotionError) -> Self {
        match err {
            MotionError::OutOfRange => ErrorKind::OutOfRange,
            MotionError::HomingTimedOut(_) => ErrorKind::HomingTimedOut,
        }
    }
}

/// Session state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SessionState {
    /// No active command
    #[default]
    Idle,
    /// `'M'` received, collecting the 16-byte payload
    AwaitingPayload,
    /// Action handed to the motion task
    Executing,
    /// Response ready
    Completed,
    /// Action or payload failed
    Failed(ErrorKind),
}

impl SessionState {
    /// True while an action is running
    pub fn is_busy(&self) -> bool {
        matches!(self, SessionState::Executing)
    }

    /// True if a byte in this state starts a new command
    pub fn accepts_command(&self) -> bool {
        matches!(
            self,
            SessionState::Idle | SessionState::Completed | SessionState::Failed(_)
        )
    }
}

/// Work for the motion task
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Job {
    /// Home both axes
    Home,
    /// Travel to `pick`, then carry the piece to `drop`
    Carry { pick: Position, drop: Position },
    /// Scan the board
    ScanBoard,
}

impl Job {
    /// Job for a move payload
    pub fn carry(payload: &MovePayload) -> Self {
        Job::Carry {
            pick: Position::new(payload.start_x, payload.start_y),
            drop: Position::new(payload.end_x, payload.end_y),
        }
    }

    /// Command this job answers
    pub fn command(&self) -> Command {
        match self {
            Job::Home => Command::Home,
            Job::Carry { .. } => Command::Move,
            Job::ScanBoard => Command::Board,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::Axis;

    #[test]
    fn test_accepts_command() {
        assert!(SessionState::Idle.accepts_command());
        assert!(SessionState::Completed.accepts_command());
        assert!(SessionState::Failed(ErrorKind::PayloadTimeout).accepts_command());
        assert!(!SessionState::Executing.accepts_command());
        assert!(!SessionState::AwaitingPayload.accepts_command());
    }

    #[test]
    fn test_motion_error_mapping() {
        assert_eq!(
            ErrorKind::from(MotionError::HomingTimedOut(Axis::Y)),
            ErrorKind::HomingTimedOut
        );
        assert_eq!(ErrorKind::from(MotionError::OutOfRange), ErrorKind::OutOfRange);
    }

    #[test]
    fn test_carry_job() {
        let payload = MovePayload {
            start_x: 1.0,
            start_y: 2.0,
            end_x: 3.0,
            end_y: 4.0,
        };
        assert_eq!(
            Job::carry(&payload),
            Job::Carry {
                pick: Position::new(1.0, 2.0),
                drop: Position::new(3.0, 4.0),
            }
        );
        assert_eq!(Job::carry(&payload).command(), Command::Move);
    }
}
