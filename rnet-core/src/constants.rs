//! Protocol constants

/// Start-of-message marker
pub const START_OF_MESSAGE: u8 = 0xF0;

/// End-of-message marker
pub const END_OF_MESSAGE: u8 = 0xF7;

/// Mask applied to the running sum when computing a checksum
pub const CHECKSUM_MASK: u8 = 0x7F;

/// Largest value a data byte may carry (RNET data bytes are 7-bit)
pub const MAX_DATA_BYTE: u8 = 0x7F;

/// Signature position that matches any byte
///
/// Never appears in real RNET data, which is limited to 7 bits.
pub const WILDCARD: u8 = 0xFF;

/// Keypad id used by external automation systems
pub const DEFAULT_KEYPAD: u8 = 0x70;

/// Minimum spacing between two transmissions (milliseconds)
pub const DEFAULT_MIN_DELAY_MS: u64 = 100;

/// Sleep between two read attempts (milliseconds)
pub const DEFAULT_POLL_DELAY_MS: u64 = 100;

/// Read attempts when a specific response is expected
pub const DEFAULT_READ_ATTEMPTS: usize = 10;

/// Read attempts when only draining the socket after a command
pub const DEFAULT_DRAIN_ATTEMPTS: usize = 1;

/// Bytes required from a candidate start before it may match
pub const DEFAULT_MIN_TRAILING: usize = 24;

/// Default connection timeout (seconds)
pub const DEFAULT_CONNECT_TIMEOUT: u64 = 5;

/// Zone info response layout
pub mod zone_info {
    /// Offset of the power byte; source and volume follow it
    pub const PAYLOAD_OFFSET: usize = 20;

    /// Offset of the power flag
    pub const POWER: usize = PAYLOAD_OFFSET;

    /// Offset of the 0-based source index
    pub const SOURCE: usize = PAYLOAD_OFFSET + 1;

    /// Offset of the volume, in device units (0-50)
    pub const VOLUME: usize = PAYLOAD_OFFSET + 2;
}

/// Event ids carried by the "event" commands
pub mod events {
    /// Set volume of a zone
    pub const VOLUME: u8 = 0x21;

    /// All zones on or off
    pub const ALL_ON_OFF: u8 = 0x22;

    /// Zone on or off
    pub const POWER: u8 = 0x23;

    /// Select zone source
    pub const SOURCE: u8 = 0x3E;

    /// Keypad key press
    pub const KEY_PRESS: u8 = 0x40;

    /// Key code of the mute button
    pub const KEY_MUTE: u8 = 0x0D;
}
