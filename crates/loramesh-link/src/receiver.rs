//! Timing-based frame receiver.
//!
//! LoRaMESH frames carry no length field and no terminator, so the only
//! frame-end signal is silence: once the module has finished answering it
//! stops transmitting, and the gap between its last byte and whatever comes
//! next is far longer than the gap between bytes of the same frame. The
//! receiver models this with two independent countdown budgets evaluated
//! once per polling tick:
//!
//! - the **inter-byte window**, reset to its full value every time a byte
//!   arrives and counted down only while at least one byte has accumulated;
//! - the **overall deadline**, counted down on every tick regardless of
//!   data arrival.
//!
//! The loop ends when the inter-byte window runs out (frame boundary) or
//! when the deadline runs out with nothing received (timeout). Frames are
//! short and the link is point-to-point, which is what makes the silence
//! heuristic reliable in practice.

use std::time::Duration;

use bytes::{BufMut, BytesMut};

use crate::error::LinkError;
use crate::transport::Transport;

/// Timing parameters for the frame receiver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReceiverConfig {
    /// Inter-byte silence window, in polling ticks.
    pub inter_byte_window: u32,
    /// Sleep between transport polls. One tick of both budgets elapses per
    /// poll; a zero tick polls as fast as possible (used by tests to run
    /// the budget arithmetic without wall-clock delays).
    pub tick: Duration,
}

impl Default for ReceiverConfig {
    fn default() -> Self {
        ReceiverConfig {
            inter_byte_window: 500,
            tick: Duration::from_millis(1),
        }
    }
}

/// Accumulates one frame's worth of bytes from a [`Transport`].
///
/// The receiver only finds the frame boundary; it hands the raw bytes back
/// without validating them. Short or corrupted accumulations are rejected by
/// the frame codec afterwards, and no resynchronization is attempted; the
/// whole transaction is the unit of retry.
#[derive(Debug, Default)]
pub struct FrameReceiver {
    config: ReceiverConfig,
    buffer: BytesMut,
}

impl FrameReceiver {
    /// Create a receiver with the given timing parameters.
    pub fn new(config: ReceiverConfig) -> Self {
        FrameReceiver {
            config,
            buffer: BytesMut::new(),
        }
    }

    /// Wait for one frame, for at most `deadline` polling ticks.
    ///
    /// Returns the accumulated bytes once the inter-byte window expires, or
    /// [`LinkError::Timeout`] if the deadline elapses with no data at all.
    /// A deadline that expires mid-frame does not cut the frame off: as long
    /// as bytes keep arriving within the inter-byte window, accumulation
    /// continues until the module goes quiet.
    pub fn receive<T: Transport>(
        &mut self,
        transport: &mut T,
        deadline: u32,
    ) -> Result<Vec<u8>, LinkError> {
        self.buffer.clear();
        let mut inter_byte = self.config.inter_byte_window;
        let mut remaining = deadline;

        while (remaining > 0 || !self.buffer.is_empty()) && inter_byte > 0 {
            if transport.bytes_available()? > 0 {
                self.buffer.put_u8(transport.read_byte()?);
                inter_byte = self.config.inter_byte_window;
            }
            if !self.buffer.is_empty() {
                inter_byte -= 1;
            }
            remaining = remaining.saturating_sub(1);

            if !self.config.tick.is_zero() {
                std::thread::sleep(self.config.tick);
            }
        }

        if self.buffer.is_empty() {
            log::debug!("receive deadline of {} ticks expired with no data", deadline);
            return Err(LinkError::Timeout { deadline });
        }

        let frame = self.buffer.split().to_vec();
        log::trace!("frame boundary after {} bytes", frame.len());
        Ok(frame)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::ScriptedTransport;

    fn fast_config() -> ReceiverConfig {
        ReceiverConfig {
            inter_byte_window: 500,
            tick: Duration::ZERO,
        }
    }

    #[test]
    fn test_assembles_frame_with_small_gaps() {
        let frame = [0x31, 0x00, 0xE2, 0x10, 0x20, 0xAB, 0xCD];
        // First byte after 10 polls, then one byte every 3 polls.
        let mut transport = ScriptedTransport::new();
        for (i, &byte) in frame.iter().enumerate() {
            transport.schedule_byte(10 + 3 * i as u64, byte);
        }

        let mut receiver = FrameReceiver::new(fast_config());
        let received = receiver.receive(&mut transport, 5000).unwrap();
        assert_eq!(received, frame);
    }

    #[test]
    fn test_silence_yields_timeout() {
        let mut transport = ScriptedTransport::new();
        let mut receiver = FrameReceiver::new(fast_config());

        let err = receiver.receive(&mut transport, 5000).unwrap_err();
        assert!(matches!(err, LinkError::Timeout { deadline: 5000 }));
    }

    #[test]
    fn test_gap_beyond_window_splits_frame() {
        let mut transport = ScriptedTransport::new();
        transport.schedule_byte(1, 0x31);
        transport.schedule_byte(2, 0x00);
        // Next byte arrives long after the 500-tick window: it must not be
        // folded into the first accumulation.
        transport.schedule_byte(2000, 0xE2);

        let mut receiver = FrameReceiver::new(fast_config());
        let received = receiver.receive(&mut transport, 5000).unwrap();
        assert_eq!(received, vec![0x31, 0x00]);
    }

    #[test]
    fn test_frame_straddling_deadline_still_completes() {
        // Bytes start arriving just before the deadline expires; the
        // in-progress frame keeps the loop alive past it.
        let frame = [0x01, 0x00, 0xD6, 0x55, 0x66];
        let mut transport = ScriptedTransport::new();
        for (i, &byte) in frame.iter().enumerate() {
            transport.schedule_byte(95 + 2 * i as u64, byte);
        }

        let mut receiver = FrameReceiver::new(fast_config());
        let received = receiver.receive(&mut transport, 100).unwrap();
        assert_eq!(received, frame);
    }

    #[test]
    fn test_single_byte_noise_is_returned_not_timeout() {
        // One stray byte is a frame boundary, not a timeout; the codec is
        // responsible for rejecting it as too short.
        let mut transport = ScriptedTransport::new();
        transport.schedule_byte(5, 0xFF);

        let mut receiver = FrameReceiver::new(fast_config());
        let received = receiver.receive(&mut transport, 5000).unwrap();
        assert_eq!(received, vec![0xFF]);
    }
}
