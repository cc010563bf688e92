//! Frame encoding/decoding utilities.
//!
//! A LoRaMESH frame carries no length field and no terminator:
//!
//! ```text
//! +---------+---------+---------+-------------------+--------+--------+
//! | addr_lo | addr_hi | command | payload[0..n]     | crc_lo | crc_hi |
//! +---------+---------+---------+-------------------+--------+--------+
//! ```
//!
//! The CRC-16 is computed over every byte that precedes it and appended
//! little-endian. The high address byte is masked to the revision's address
//! width before transmission.

use bytes::BufMut;

use crate::constants::*;
use crate::crc::crc16;
use crate::error::ProtocolError;
use crate::types::Revision;

/// A decoded frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// Source (on receive) or destination (on send) module address.
    pub address: u16,
    /// Command code this frame carries or answers.
    pub command: u8,
    /// Command-specific payload, possibly empty.
    pub payload: Vec<u8>,
}

/// Encoder/decoder for LoRaMESH frames under a given module revision.
///
/// The codec is stateless apart from the revision parameters; it neither
/// reads nor writes any transport.
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameCodec {
    revision: Revision,
}

impl FrameCodec {
    /// Create a codec for the given module revision.
    pub fn new(revision: Revision) -> Self {
        FrameCodec { revision }
    }

    /// The revision this codec encodes for.
    pub fn revision(&self) -> Revision {
        self.revision
    }

    /// Encode a frame for transmission.
    ///
    /// Fails with [`ProtocolError::AddressOutOfRange`] if `address` exceeds
    /// the revision's address width, and with
    /// [`ProtocolError::PayloadTooLarge`] if the payload length is not
    /// strictly below the revision's maximum. An empty payload is valid.
    pub fn encode(
        &self,
        address: u16,
        command: u8,
        payload: &[u8],
    ) -> Result<Vec<u8>, ProtocolError> {
        let width = self.revision.address_width;
        if address > width.max_address() {
            return Err(ProtocolError::AddressOutOfRange {
                address,
                max: width.max_address(),
            });
        }
        if payload.len() >= self.revision.max_payload {
            return Err(ProtocolError::PayloadTooLarge {
                max: self.revision.max_payload,
                actual: payload.len(),
            });
        }

        let masked = address & width.mask();
        let mut buf = Vec::with_capacity(FRAME_OVERHEAD + payload.len());
        buf.put_u16_le(masked);
        buf.push(command);
        buf.extend_from_slice(payload);

        let crc = crc16(&buf);
        buf.put_u16_le(crc);

        Ok(buf)
    }

    /// Decode and validate a received byte buffer.
    ///
    /// Fails with [`ProtocolError::FrameTooShort`] below the 5-byte minimum
    /// and with [`ProtocolError::ChecksumMismatch`] if the trailing CRC does
    /// not match the one recomputed over the frame body.
    pub fn decode(&self, buffer: &[u8]) -> Result<Frame, ProtocolError> {
        if buffer.len() < MIN_FRAME_SIZE {
            return Err(ProtocolError::FrameTooShort {
                expected: MIN_FRAME_SIZE,
                actual: buffer.len(),
            });
        }

        let body = &buffer[..buffer.len() - 2];
        let received = u16::from_le_bytes([buffer[buffer.len() - 2], buffer[buffer.len() - 1]]);
        let computed = crc16(body);
        if computed != received {
            log::trace!(
                "discarding {}-byte frame: crc computed 0x{:04X}, received 0x{:04X}",
                buffer.len(),
                computed,
                received
            );
            return Err(ProtocolError::ChecksumMismatch { computed, received });
        }

        let address =
            u16::from_le_bytes([buffer[0], buffer[1]]) & self.revision.address_width.mask();
        let command = buffer[2];
        let payload = body[3..].to_vec();

        Ok(Frame {
            address,
            command,
            payload,
        })
    }
}
