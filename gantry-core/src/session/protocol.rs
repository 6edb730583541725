//! Protocol session
//!
//! Owned by the bus task behind a critical-section mutex. Every method is
//! short, allocation-free and never blocks, so it can be called between
//! bus events and from the motion task.

use gantry_protocol::{
    Command, MovePayload, Response, MOVE_PAYLOAD_LEN, STATUS_ERROR, STATUS_WORKING,
};

use super::machine::{ErrorKind, Job, SessionState};
use crate::board::BoardSnapshot;

/// Default payload window after an `'M'` command byte
pub const DEFAULT_PAYLOAD_TIMEOUT_US: u64 = 100_000;

/// What a write transaction did to the session
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct WriteOutcome {
    /// Command byte accepted by this write
    pub accepted: Option<Command>,
    /// Job ready to hand to the motion task
    pub job: Option<Job>,
    /// Unrecognized command byte
    pub rejected: Option<u8>,
    /// Bytes ignored because a command was executing
    pub ignored_busy: usize,
    /// Surplus bytes after a complete command
    pub discarded: usize,
    /// Failure caused by this write
    pub failed: Option<ErrorKind>,
}

/// Command/response session
#[derive(Debug, Clone)]
pub struct ProtocolSession {
    state: SessionState,
    last_command: Option<Command>,
    payload: [u8; MOVE_PAYLOAD_LEN],
    received: usize,
    response: Response,
    accepted_at_us: u64,
    payload_timeout_us: u64,
}

impl Default for ProtocolSession {
    fn default() -> Self {
        Self::new(DEFAULT_PAYLOAD_TIMEOUT_US)
    }
}

impl ProtocolSession {
    pub const fn new(payload_timeout_us: u64) -> Self {
        Self {
            state: SessionState::Idle,
            last_command: None,
            payload: [0; MOVE_PAYLOAD_LEN],
            received: 0,
            response: Response::new(),
            accepted_at_us: 0,
            payload_timeout_us,
        }
    }

    pub fn set_payload_timeout_us(&mut self, timeout_us: u64) {
        self.payload_timeout_us = timeout_us;
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn last_command(&self) -> Option<Command> {
        self.last_command
    }

    /// Payload bytes collected so far
    pub fn payload_received(&self) -> usize {
        self.received
    }

    /// When the pending payload window closes, if one is open
    pub fn payload_deadline_us(&self) -> Option<u64> {
        match self.state {
            SessionState::AwaitingPayload => {
                Some(self.accepted_at_us.saturating_add(self.payload_timeout_us))
            }
            _ => None,
        }
    }

    /// Expire the payload window; returns true if it just timed out
    pub fn poll(&mut self, now_us: u64) -> bool {
        match self.payload_deadline_us() {
            Some(deadline) if now_us > deadline => {
                self.state = SessionState::Failed(ErrorKind::PayloadTimeout);
                true
            }
            _ => false,
        }
    }

    /// Feed the bytes of one write transaction
    ///
    /// Outside a payload, the first byte is the command. Bytes after a
    /// complete command are discarded.
    pub fn accept_bytes(&mut self, bytes: &[u8], now_us: u64) -> WriteOutcome {
        let mut outcome = WriteOutcome::default();
        if self.poll(now_us) {
            outcome.failed = Some(ErrorKind::PayloadTimeout);
        }

        let mut rest = bytes.iter().copied();
        while let Some(byte) = rest.next() {
            match self.state {
                SessionState::Executing => {
                    outcome.ignored_busy += 1 + rest.len();
                    break;
                }
                SessionState::AwaitingPayload => {
                    self.payload[self.received] = byte;
                    self.received += 1;
                    if self.received == MOVE_PAYLOAD_LEN {
                        self.finish_payload(&mut outcome);
                        outcome.discarded += rest.len();
                        break;
                    }
                }
                SessionState::Idle | SessionState::Completed | SessionState::Failed(_) => {
                    self.start_command(byte, now_us, &mut outcome);
                    if self.state != SessionState::AwaitingPayload {
                        outcome.discarded += rest.len();
                        break;
                    }
                }
            }
        }

        outcome
    }

    /// Byte to serve for a read request
    pub fn read_byte(&mut self, now_us: u64) -> u8 {
        self.poll(now_us);

        match self.state {
            SessionState::Executing => STATUS_WORKING,
            SessionState::Completed => match self.last_command {
                Some(Command::Board) => self.response.next_byte(),
                Some(_) => self.response.first().unwrap_or(STATUS_ERROR),
                None => STATUS_ERROR,
            },
            SessionState::Idle | SessionState::AwaitingPayload | SessionState::Failed(_) => {
                STATUS_ERROR
            }
        }
    }

    /// Finish a home or move command
    ///
    /// Returns false if no action was executing.
    pub fn complete_action(&mut self) -> bool {
        match (self.state, self.last_command) {
            (SessionState::Executing, Some(cmd)) if cmd != Command::Board => {
                self.response = Response::ack(cmd.as_byte());
                self.state = SessionState::Completed;
                true
            }
            _ => false,
        }
    }

    /// Finish a board scan with its result
    pub fn complete_scan(&mut self, snapshot: &BoardSnapshot) -> bool {
        match (self.state, self.last_command) {
            (SessionState::Executing, Some(Command::Board)) => {
                self.response = Response::board(&snapshot.to_bytes());
                self.state = SessionState::Completed;
                true
            }
            _ => false,
        }
    }

    /// Mark the executing action as failed
    pub fn fail(&mut self, kind: ErrorKind) -> bool {
        if self.state.is_busy() {
            self.state = SessionState::Failed(kind);
            true
        } else {
            false
        }
    }

    fn start_command(&mut self, byte: u8, now_us: u64, outcome: &mut WriteOutcome) {
        self.payload = [0; MOVE_PAYLOAD_LEN];
        self.received = 0;
        self.response.clear();

        let Some(command) = Command::from_byte(byte) else {
            self.last_command = None;
            self.state = SessionState::Idle;
            outcome.rejected = Some(byte);
            outcome.failed = Some(ErrorKind::UnknownCommand);
            return;
        };

        self.last_command = Some(command);
        outcome.accepted = Some(command);

        match command {
            Command::Move => {
                self.accepted_at_us = now_us;
                self.state = SessionState::AwaitingPayload;
            }
            Command::Home => {
                self.state = SessionState::Executing;
                outcome.job = Some(Job::Home);
            }
            Command::Board => {
                self.state = SessionState::Executing;
                outcome.job = Some(Job::ScanBoard);
            }
        }
    }

    fn finish_payload(&mut self, outcome: &mut WriteOutcome) {
        match MovePayload::decode(&self.payload) {
            Ok(payload) => {
                self.state = SessionState::Executing;
                outcome.job = Some(Job::carry(&payload));
            }
            Err(_) => {
                self.state = SessionState::Failed(ErrorKind::InvalidPayload);
                outcome.failed = Some(ErrorKind::InvalidPayload);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::motion::Position;
    use gantry_protocol::STATUS_BOARD;
    use std::vec::Vec;

    fn move_bytes(sx: f32, sy: f32, ex: f32, ey: f32) -> Vec<u8> {
        let payload = MovePayload {
            start_x: sx,
            start_y: sy,
            end_x: ex,
            end_y: ey,
        };
        let mut bytes = Vec::from([b'M']);
        bytes.extend_from_slice(&payload.encode());
        bytes
    }

    #[test]
    fn test_read_without_command() {
        let mut s = ProtocolSession::default();
        assert_eq!(s.read_byte(0), b'E');
        assert_eq!(s.state(), SessionState::Idle);
    }

    #[test]
    fn test_home_lifecycle() {
        let mut s = ProtocolSession::default();
        let out = s.accept_bytes(b"H", 0);
        assert_eq!(out.job, Some(Job::Home));
        assert_eq!(out.accepted, Some(Command::Home));

        assert_eq!(s.read_byte(10), b'W');
        assert_eq!(s.read_byte(20), b'W');

        assert!(s.complete_action());
        for t in 0..5 {
            assert_eq!(s.read_byte(1_000_000 + t), b'H');
        }

        // A new command replaces the completion byte
        s.accept_bytes(b"B", 2_000_000);
        assert_eq!(s.read_byte(2_000_001), b'W');
    }

    #[test]
    fn test_move_in_one_write() {
        let mut s = ProtocolSession::default();
        let out = s.accept_bytes(&move_bytes(0.0, 0.0, 10.0, 0.0), 0);

        assert_eq!(
            out.job,
            Some(Job::Carry {
                pick: Position::new(0.0, 0.0),
                drop: Position::new(10.0, 0.0),
            })
        );
        assert_eq!(s.state(), SessionState::Executing);
        assert_eq!(s.read_byte(5), b'W');

        s.complete_action();
        assert_eq!(s.read_byte(6), b'M');
        assert_eq!(s.read_byte(7), b'M');
    }

    #[test]
    fn test_move_payload_split_across_writes() {
        let mut s = ProtocolSession::default();
        let bytes = move_bytes(1.0, 2.0, 3.0, 4.0);

        assert!(s.accept_bytes(&bytes[..5], 0).job.is_none());
        assert_eq!(s.state(), SessionState::AwaitingPayload);
        assert_eq!(s.payload_received(), 4);
        // Incomplete payload reads as error
        assert_eq!(s.read_byte(1_000), b'E');

        let out = s.accept_bytes(&bytes[5..], 50_000);
        assert!(matches!(out.job, Some(Job::Carry { .. })));
        assert_eq!(s.read_byte(50_001), b'W');
    }

    #[test]
    fn test_payload_timeout() {
        let mut s = ProtocolSession::default();
        let bytes = move_bytes(1.0, 2.0, 3.0, 4.0);
        s.accept_bytes(&bytes[..9], 0);

        assert_eq!(s.payload_deadline_us(), Some(100_000));
        assert!(!s.poll(100_000));
        assert_eq!(s.read_byte(100_001), b'E');
        assert_eq!(s.state(), SessionState::Failed(ErrorKind::PayloadTimeout));
        assert_eq!(s.payload_deadline_us(), None);
    }

    #[test]
    fn test_late_payload_is_not_executed() {
        let mut s = ProtocolSession::default();
        let bytes = move_bytes(1.0, 2.0, 3.0, 4.0);
        s.accept_bytes(&bytes[..9], 0);

        let out = s.accept_bytes(&bytes[9..], 150_000);
        assert_eq!(out.failed, Some(ErrorKind::UnknownCommand));
        assert!(out.job.is_none());
        assert_eq!(s.read_byte(150_001), b'E');
    }

    #[test]
    fn test_board_response() {
        let mut s = ProtocolSession::default();
        s.accept_bytes(b"B", 0);
        assert_eq!(s.read_byte(1), b'W');

        let mut snap = BoardSnapshot::empty();
        snap.set(0, 0, true);
        snap.set(7, 7, true);
        assert!(s.complete_scan(&snap));

        assert_eq!(s.read_byte(2), STATUS_BOARD);
        let grid: Vec<u8> = (0..64).map(|i| s.read_byte(3 + i)).collect();
        assert_eq!(grid[0], 1);
        assert_eq!(grid[63], 1);
        assert_eq!(grid.iter().filter(|&&b| b == 1).count(), 2);
        // 66th read and beyond
        assert_eq!(s.read_byte(100), 0);
        assert_eq!(s.read_byte(101), 0);
    }

    #[test]
    fn test_unknown_command_resets() {
        let mut s = ProtocolSession::default();
        s.accept_bytes(b"H", 0);
        s.complete_action();
        assert_eq!(s.last_command(), Some(Command::Home));

        let out = s.accept_bytes(b"X", 10);
        assert_eq!(out.rejected, Some(b'X'));
        assert_eq!(s.last_command(), None);
        assert_eq!(s.state(), SessionState::Idle);
        assert_eq!(s.read_byte(11), b'E');
    }

    #[test]
    fn test_command_while_executing_is_ignored() {
        let mut s = ProtocolSession::default();
        s.accept_bytes(b"H", 0);

        let out = s.accept_bytes(b"B", 10);
        assert_eq!(out.ignored_busy, 1);
        assert!(out.job.is_none());
        assert_eq!(s.last_command(), Some(Command::Home));
        assert_eq!(s.read_byte(11), b'W');
    }

    #[test]
    fn test_leftover_bytes_discarded() {
        let mut s = ProtocolSession::default();
        let out = s.accept_bytes(b"HMB", 0);
        assert_eq!(out.job, Some(Job::Home));
        assert_eq!(out.discarded, 2);

        let mut bytes = move_bytes(0.0, 0.0, 1.0, 1.0);
        s.complete_action();
        bytes.extend_from_slice(&[0xAA, 0xBB]);
        let out = s.accept_bytes(&bytes, 10);
        assert!(out.job.is_some());
        assert_eq!(out.discarded, 2);
    }

    #[test]
    fn test_invalid_payload_fails() {
        let mut s = ProtocolSession::default();
        let out = s.accept_bytes(&move_bytes(f32::NAN, 0.0, 1.0, 1.0), 0);
        assert_eq!(out.failed, Some(ErrorKind::InvalidPayload));
        assert_eq!(s.read_byte(1), b'E');
    }

    #[test]
    fn test_action_failure_reports_error() {
        let mut s = ProtocolSession::default();
        s.accept_bytes(b"H", 0);
        assert!(s.fail(ErrorKind::HomingTimedOut));
        assert_eq!(s.read_byte(1), b'E');
        assert!(!s.complete_action());

        // Recovers on the next command
        s.accept_bytes(b"H", 2);
        assert_eq!(s.read_byte(3), b'W');
    }

    #[test]
    fn test_completion_needs_matching_command() {
        let mut s = ProtocolSession::default();
        s.accept_bytes(b"B", 0);
        assert!(!s.complete_action());
        assert!(s.complete_scan(&BoardSnapshot::empty()));

        s.accept_bytes(b"H", 1);
        assert!(!s.complete_scan(&BoardSnapshot::empty()));
    }
}
