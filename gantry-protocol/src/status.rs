//! Status bytes served to read requests

/// Command accepted and still executing
pub const STATUS_WORKING: u8 = b'W';

/// No command active, unknown command, or the last command failed
pub const STATUS_ERROR: u8 = b'E';

/// Header byte that precedes the 64 board cells of a scan reply
pub const STATUS_BOARD: u8 = b'R';

/// Byte served once a response buffer has been fully drained
pub const STATUS_DRAINED: u8 = 0;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_bytes_distinct_from_commands() {
        use crate::command::Command;

        for status in [STATUS_WORKING, STATUS_ERROR, STATUS_BOARD] {
            assert!(Command::from_byte(status).is_none());
        }
    }
}
