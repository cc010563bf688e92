//! Link-layer error types.

use loramesh_protocol::ProtocolError;
use thiserror::Error;

/// Errors that can occur during a link transaction.
///
/// Every variant is terminal for the transaction that produced it: the
/// session never retries internally (except the explicitly bounded
/// [`crate::LinkSession::connect`]), so the caller decides what to do next.
#[derive(Error, Debug)]
pub enum LinkError {
    /// Frame encoding or decoding failed.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// No response arrived before the overall deadline.
    #[error("timed out after {deadline} ticks waiting for a response")]
    Timeout {
        /// Deadline budget that was exhausted, in polling ticks.
        deadline: u32,
    },

    /// The response answers a different command than the one sent.
    ///
    /// The link is half-duplex and broadcast-capable, so a frame correlated
    /// to the wrong command must never be accepted as a response.
    #[error("unexpected response: sent command 0x{sent:02X}, got 0x{received:02X}")]
    UnexpectedResponse {
        /// Command code of the request.
        sent: u8,
        /// Command code carried by the response.
        received: u8,
    },

    /// The module acknowledged a radio configuration but echoed different
    /// parameter values than the ones requested.
    #[error("module applied different radio parameters: requested {requested:?}, echoed {echoed:?}")]
    ParameterMismatch {
        /// Parameter bytes sent (power, bandwidth, SF, CR).
        requested: [u8; 4],
        /// Parameter bytes the module echoed back.
        echoed: [u8; 4],
    },

    /// The response frame validated but its payload does not have the shape
    /// the command's reply is documented to have.
    #[error("malformed response to command 0x{command:02X}: {reason}")]
    MalformedResponse {
        /// Command code the response answered.
        command: u8,
        /// What was wrong with the payload.
        reason: String,
    },

    /// The underlying transport failed.
    #[error("transport I/O error: {0}")]
    Io(#[from] std::io::Error),
}
