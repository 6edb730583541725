//! Command bytes and the move payload
//!
//! Commands are single ASCII letters. Only `'M'` carries a payload: four
//! IEEE-754 little-endian floats in millimetres.

/// Home both axes
pub const CMD_HOME: u8 = b'H';

/// Move a piece from start to end
pub const CMD_MOVE: u8 = b'M';

/// Scan the board occupancy
pub const CMD_BOARD: u8 = b'B';

/// Payload length of a move command
pub const MOVE_PAYLOAD_LEN: usize = 16;

/// Host command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Command {
    /// Home both axes against their end-stops
    Home,
    /// Two-leg move: current position to start, then start to end with the magnet on
    Move,
    /// Scan the 8x8 board
    Board,
}

impl Command {
    /// Parse a command byte
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            CMD_HOME => Some(Command::Home),
            CMD_MOVE => Some(Command::Move),
            CMD_BOARD => Some(Command::Board),
            _ => None,
        }
    }

    /// Wire byte for this command
    pub fn as_byte(self) -> u8 {
        match self {
            Command::Home => CMD_HOME,
            Command::Move => CMD_MOVE,
            Command::Board => CMD_BOARD,
        }
    }

    /// Number of payload bytes that follow the command byte
    pub fn payload_len(self) -> usize {
        match self {
            Command::Move => MOVE_PAYLOAD_LEN,
            Command::Home | Command::Board => 0,
        }
    }
}

/// Payload decode errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DecodeError {
    /// Fewer than 16 bytes were supplied
    Incomplete,
    /// A coordinate is NaN or infinite
    NotFinite,
}

/// Decoded move payload (millimetres)
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MovePayload {
    pub start_x: f32,
    pub start_y: f32,
    pub end_x: f32,
    pub end_y: f32,
}

impl MovePayload {
    /// Decode from the 16 payload bytes
    pub fn decode(bytes: &[u8]) -> Result<Self, DecodeError> {
        if bytes.len() < MOVE_PAYLOAD_LEN {
            return Err(DecodeError::Incomplete);
        }

        let payload = Self {
            start_x: read_f32(bytes, 0),
            start_y: read_f32(bytes, 4),
            end_x: read_f32(bytes, 8),
            end_y: read_f32(bytes, 12),
        };

        if [payload.start_x, payload.start_y, payload.end_x, payload.end_y]
            .iter()
            .any(|v| !v.is_finite())
        {
            return Err(DecodeError::NotFinite);
        }

        Ok(payload)
    }

    /// Encode into the wire layout
    pub fn encode(&self) -> [u8; MOVE_PAYLOAD_LEN] {
        let mut out = [0u8; MOVE_PAYLOAD_LEN];
        out[0..4].copy_from_slice(&self.start_x.to_le_bytes());
        out[4..8].copy_from_slice(&self.start_y.to_le_bytes());
        out[8..12].copy_from_slice(&self.end_x.to_le_bytes());
        out[12..16].copy_from_slice(&self.end_y.to_le_bytes());
        out
    }
}

fn read_f32(bytes: &[u8], offset: usize) -> f32 {
    let mut raw = [0u8; 4];
    raw.copy_from_slice(&bytes[offset..offset + 4]);
    f32::from_le_bytes(raw)
}
