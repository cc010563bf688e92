//! In-process transport doubles.
//!
//! Two implementations of [`Transport`] back the test suite and examples:
//!
//! - [`ScriptedTransport`] delivers a hand-written byte schedule, for
//!   exercising the frame receiver's timing behavior in isolation.
//! - [`SimulatedModule`] emulates a LoRaMESH module end to end: it decodes
//!   each transmitted frame and schedules a framed response, with knobs for
//!   silence, CRC corruption, wrong-command replies and parameter drift.
//!
//! Both count time in transport polls: one call to
//! [`Transport::bytes_available`] is one tick, which lines up with the frame
//! receiver polling exactly once per tick. Tests run with a zero-duration
//! tick and stay fully deterministic.

use std::collections::VecDeque;
use std::io;

use loramesh_protocol::{
    FrameCodec, Revision, CMD_LOCAL_READ, CMD_LORA_PARAMETER, CMD_WRITE_CONFIG,
    CMD_WRITE_PASSWORD,
};

use crate::session::Identity;
use crate::transport::Transport;

/// A transport that delivers bytes at scheduled poll counts.
#[derive(Debug, Default)]
pub struct ScriptedTransport {
    /// (poll count at which the byte becomes available, byte), in order.
    schedule: VecDeque<(u64, u8)>,
    polls: u64,
    written: Vec<u8>,
}

impl ScriptedTransport {
    /// Create an empty scripted transport.
    pub fn new() -> Self {
        ScriptedTransport::default()
    }

    /// Make `byte` available once `at_poll` polls have happened.
    pub fn schedule_byte(&mut self, at_poll: u64, byte: u8) {
        self.schedule.push_back((at_poll, byte));
    }

    /// Everything written to the transport so far.
    pub fn written(&self) -> &[u8] {
        &self.written
    }
}

impl Transport for ScriptedTransport {
    fn bytes_available(&mut self) -> io::Result<usize> {
        self.polls += 1;
        let due = self
            .schedule
            .iter()
            .take_while(|&&(at, _)| at <= self.polls)
            .count();
        Ok(due)
    }

    fn read_byte(&mut self) -> io::Result<u8> {
        match self.schedule.front() {
            Some(&(at, byte)) if at <= self.polls => {
                self.schedule.pop_front();
                Ok(byte)
            }
            _ => Err(io::Error::new(
                io::ErrorKind::WouldBlock,
                "no byte available at this poll",
            )),
        }
    }

    fn write_all(&mut self, buf: &[u8]) -> io::Result<()> {
        self.written.extend_from_slice(buf);
        Ok(())
    }
}

/// Fault injection knobs for [`SimulatedModule`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ModuleFaults {
    /// Never answer anything.
    pub silent: bool,
    /// Flip a bit in the response after framing, invalidating its CRC.
    pub corrupt_crc: bool,
    /// Answer with this command code instead of the one received.
    pub command_override: Option<u8>,
    /// Apply (and echo) a different value for one radio parameter byte.
    pub drift_radio_params: bool,
}

/// An emulated LoRaMESH module behind the transport interface.
///
/// Requests are decoded as soon as they are written; the response is framed
/// immediately but delivered byte by byte on later polls, `latency` polls
/// after the write and `byte_gap` polls apart, so the session's receive path
/// sees realistic pacing.
#[derive(Debug)]
pub struct SimulatedModule {
    codec: FrameCodec,
    identity: Identity,
    /// Polls between the request and the first response byte.
    pub latency: u64,
    /// Polls between consecutive response bytes.
    pub byte_gap: u64,
    /// Fault injection configuration.
    pub faults: ModuleFaults,
    schedule: VecDeque<(u64, u8)>,
    polls: u64,
    requests: Vec<(u16, u8, Vec<u8>)>,
}

impl SimulatedModule {
    /// Create a module with the given identity and the default revision.
    pub fn new(address: u16, network: u16, unique_id: u32) -> Self {
        SimulatedModule::with_revision(address, network, unique_id, Revision::default())
    }

    /// Create a module with an explicit wire-format revision.
    pub fn with_revision(address: u16, network: u16, unique_id: u32, revision: Revision) -> Self {
        SimulatedModule {
            codec: FrameCodec::new(revision),
            identity: Identity {
                address,
                network,
                unique_id,
            },
            latency: 10,
            byte_gap: 2,
            faults: ModuleFaults::default(),
            schedule: VecDeque::new(),
            polls: 0,
            requests: Vec::new(),
        }
    }

    /// The module's current identity.
    pub fn identity(&self) -> Identity {
        self.identity
    }

    /// Decoded requests the module has seen, as (address, command, payload).
    pub fn requests(&self) -> &[(u16, u8, Vec<u8>)] {
        &self.requests
    }

    /// Make stale bytes available immediately, as if left over from an
    /// earlier, abandoned transaction.
    pub fn preload_stale(&mut self, bytes: &[u8]) {
        for &byte in bytes {
            self.schedule.push_back((0, byte));
        }
    }

    fn respond(&mut self, command: u8, payload: &[u8]) {
        let command = self.faults.command_override.unwrap_or(command);
        let mut wire = match self.codec.encode(self.identity.address, command, payload) {
            Ok(wire) => wire,
            // An unencodable response means the simulated module stays quiet.
            Err(_) => return,
        };
        if self.faults.corrupt_crc {
            wire[2] ^= 0x01;
        }

        let start = self.polls + self.latency;
        for (i, &byte) in wire.iter().enumerate() {
            self.schedule.push_back((start + self.byte_gap * i as u64, byte));
        }
    }

    fn handle_request(&mut self, address: u16, command: u8, payload: Vec<u8>) {
        let response: Vec<u8> = match command {
            CMD_LOCAL_READ => {
                let mut reply = Vec::with_capacity(6);
                reply.extend_from_slice(&self.identity.network.to_le_bytes());
                reply.extend_from_slice(&self.identity.unique_id.to_le_bytes());
                reply
            }
            CMD_LORA_PARAMETER => {
                let mut reply = payload.clone();
                if self.faults.drift_radio_params && reply.len() >= 5 {
                    // Module "rounds" the spreading factor to something else.
                    reply[3] = reply[3].wrapping_add(1);
                }
                reply
            }
            CMD_WRITE_CONFIG if payload.len() >= 6 => {
                self.identity.address = address;
                self.identity.network = u16::from_le_bytes([payload[0], payload[1]]);
                self.identity.unique_id =
                    u32::from_le_bytes([payload[2], payload[3], payload[4], payload[5]]);
                payload.clone()
            }
            CMD_WRITE_PASSWORD if payload.len() >= 3 => {
                self.identity.network = u16::from_le_bytes([payload[1], payload[2]]);
                payload.clone()
            }
            // Configuration commands acknowledge by echoing the payload.
            _ => payload.clone(),
        };

        self.requests.push((address, command, payload));
        if !self.faults.silent {
            self.respond(command, &response);
        }
    }
}

impl Transport for SimulatedModule {
    fn bytes_available(&mut self) -> io::Result<usize> {
        self.polls += 1;
        let due = self
            .schedule
            .iter()
            .take_while(|&&(at, _)| at <= self.polls)
            .count();
        Ok(due)
    }

    fn read_byte(&mut self) -> io::Result<u8> {
        match self.schedule.front() {
            Some(&(at, byte)) if at <= self.polls => {
                self.schedule.pop_front();
                Ok(byte)
            }
            _ => Err(io::Error::new(
                io::ErrorKind::WouldBlock,
                "no byte available at this poll",
            )),
        }
    }

    fn write_all(&mut self, buf: &[u8]) -> io::Result<()> {
        match self.codec.decode(buf) {
            Ok(frame) => self.handle_request(frame.address, frame.command, frame.payload),
            Err(err) => log::warn!("simulated module received an invalid frame: {}", err),
        }
        Ok(())
    }
}
