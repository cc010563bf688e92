//! Protocol error types.

use thiserror::Error;

/// Errors that can occur when encoding or decoding LoRaMESH frames.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    /// Address does not fit the active revision's address width.
    #[error("address {address} out of range: maximum for this revision is {max}")]
    AddressOutOfRange {
        /// The rejected address.
        address: u16,
        /// Largest address the revision accepts.
        max: u16,
    },

    /// Payload is too large for a single frame.
    #[error("payload too large: must be under {max} bytes, got {actual}")]
    PayloadTooLarge {
        /// Maximum payload size (exclusive bound).
        max: usize,
        /// Actual payload length.
        actual: usize,
    },

    /// Frame is too short to be valid.
    #[error("frame too short: expected at least {expected} bytes, got {actual}")]
    FrameTooShort {
        /// Expected minimum length.
        expected: usize,
        /// Actual length received.
        actual: usize,
    },

    /// Transmitted CRC disagrees with the one computed over the frame.
    #[error("checksum mismatch: computed 0x{computed:04X}, frame carries 0x{received:04X}")]
    ChecksumMismatch {
        /// CRC computed over the received bytes.
        computed: u16,
        /// CRC carried in the frame trailer.
        received: u16,
    },

    /// Radio parameters outside the ranges the module accepts.
    #[error("invalid radio parameters: {0}")]
    InvalidRadioParams(String),
}
