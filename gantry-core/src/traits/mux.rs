//! Multiplexer scan primitive

/// Number of multiplexers under the board
pub const MUX_COUNT: u8 = 4;

/// Channels per multiplexer
pub const MUX_CHANNELS: u8 = 16;

/// Bank of 16-channel analog multiplexers reading the square sensors
pub trait MuxBank {
    /// Raw line level of one channel (true = high)
    ///
    /// The implementation selects the channel and waits for the line to
    /// settle before sampling.
    fn read_channel(&mut self, mux: u8, channel: u8) -> bool;

    /// Read all channels of one multiplexer into a bitmask (bit n = channel n high)
    fn read_all(&mut self, mux: u8) -> u16 {
        let mut mask = 0u16;
        for channel in 0..MUX_CHANNELS {
            if self.read_channel(mux, channel) {
                mask |= 1 << channel;
            }
        }
        mask
    }
}
