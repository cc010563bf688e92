//! Blocking request/response session.
//!
//! A [`LinkSession`] owns one transport exclusively. Every operation is one
//! transaction: encode → transmit → discard stale input → receive → decode →
//! match the response command against the one sent. Nothing is retried
//! internally except the explicitly bounded [`LinkSession::connect`]
//! bootstrap, and no state is shared across transactions other than the
//! cached identity of the locally connected module.

use loramesh_protocol::{
    FrameCodec, PowerClass, ProtocolError, RadioParams, Revision, RxWindow, CMD_CLASS_POWER,
    CMD_LOCAL_READ, CMD_LORA_PARAMETER, CMD_SEND_TRANSPARENT, CMD_WRITE_CONFIG,
    CMD_WRITE_PASSWORD,
};

use crate::error::LinkError;
use crate::receiver::{FrameReceiver, ReceiverConfig};
use crate::transport::Transport;

/// Identity of the locally connected module.
///
/// Cached after the last successful identity read and refreshed only by
/// identity-changing transactions, after their own success.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Identity {
    /// Module address on the mesh.
    pub address: u16,
    /// Network id the module belongs to.
    pub network: u16,
    /// Factory-assigned unique id.
    pub unique_id: u32,
}

/// Configuration for a link session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionConfig {
    /// Wire-format parameters of the connected module revision.
    pub revision: Revision,
    /// Timing of the frame receiver.
    pub receiver: ReceiverConfig,
    /// Overall per-transaction response deadline, in polling ticks.
    pub response_deadline: u32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        SessionConfig {
            revision: Revision::default(),
            receiver: ReceiverConfig::default(),
            response_deadline: 5000,
        }
    }
}

impl SessionConfig {
    /// Default configuration with a zero polling tick.
    ///
    /// Budgets still count ticks, but no wall-clock sleep happens between
    /// polls. Intended for tests and simulated transports.
    pub fn fast() -> Self {
        let mut config = SessionConfig::default();
        config.receiver.tick = std::time::Duration::ZERO;
        config
    }
}

/// A blocking link session to a LoRaMESH module.
///
/// Single-threaded by design: one session per transport, no reentrancy, one
/// transaction in flight at a time.
pub struct LinkSession<T> {
    transport: T,
    codec: FrameCodec,
    receiver: FrameReceiver,
    config: SessionConfig,
    identity: Option<Identity>,
}

impl<T: Transport> LinkSession<T> {
    /// Create a session over an owned transport.
    pub fn new(transport: T, config: SessionConfig) -> Self {
        LinkSession {
            transport,
            codec: FrameCodec::new(config.revision),
            receiver: FrameReceiver::new(config.receiver),
            config,
            identity: None,
        }
    }

    /// Identity cached by the last successful identity transaction.
    pub fn identity(&self) -> Option<Identity> {
        self.identity
    }

    /// Give the transport back, consuming the session.
    pub fn into_transport(self) -> T {
        self.transport
    }

    /// Execute one request/response transaction.
    ///
    /// Returns the responding module's address and the response payload.
    /// A response whose command code differs from the one sent fails with
    /// [`LinkError::UnexpectedResponse`] rather than being accepted.
    pub fn request(
        &mut self,
        address: u16,
        command: u8,
        payload: &[u8],
    ) -> Result<(u16, Vec<u8>), LinkError> {
        let wire = self.codec.encode(address, command, payload)?;

        log::debug!(
            "request: dest={} cmd=0x{:02X} payload={}B",
            address,
            command,
            payload.len()
        );
        self.transport.write_all(&wire)?;

        // Stale bytes from a previous, abandoned transaction must not be
        // correlated with this one.
        self.transport.discard_input()?;

        let raw = self
            .receiver
            .receive(&mut self.transport, self.config.response_deadline)?;
        let frame = self.codec.decode(&raw)?;

        if frame.command != command {
            log::warn!(
                "response command 0x{:02X} does not answer request 0x{:02X}",
                frame.command,
                command
            );
            return Err(LinkError::UnexpectedResponse {
                sent: command,
                received: frame.command,
            });
        }

        log::debug!(
            "response: src={} cmd=0x{:02X} payload={}B",
            frame.address,
            frame.command,
            frame.payload.len()
        );
        Ok((frame.address, frame.payload))
    }

    /// Read the identity of the locally connected module and cache it.
    ///
    /// Sent to address 0 with three dummy payload bytes; the reply carries
    /// the network id and unique id, and its source address is the module's
    /// own address.
    pub fn local_read(&mut self) -> Result<Identity, LinkError> {
        let (address, payload) = self.request(0, CMD_LOCAL_READ, &[0x00, 0x00, 0x00])?;

        if payload.len() < 6 {
            return Err(LinkError::MalformedResponse {
                command: CMD_LOCAL_READ,
                reason: format!("identity payload needs 6 bytes, got {}", payload.len()),
            });
        }

        let network = u16::from_le_bytes([payload[0], payload[1]]);
        let unique_id = u32::from_le_bytes([payload[2], payload[3], payload[4], payload[5]]);

        let identity = Identity {
            address,
            network,
            unique_id,
        };
        self.identity = Some(identity);
        Ok(identity)
    }

    /// Bootstrap the session by reading the local identity, with a bounded
    /// number of attempts.
    ///
    /// Hardware needs a moment after power-up before the command port
    /// answers, so the first reads routinely time out. The bound keeps a
    /// dead module from blocking the caller forever; the last error is
    /// surfaced once it is exhausted.
    pub fn connect(&mut self, attempts: u32) -> Result<Identity, LinkError> {
        let mut last = LinkError::Timeout {
            deadline: self.config.response_deadline,
        };
        for attempt in 1..=attempts.max(1) {
            match self.local_read() {
                Ok(identity) => {
                    log::debug!(
                        "connected on attempt {}: address={} network={} unique_id=0x{:08X}",
                        attempt,
                        identity.address,
                        identity.network,
                        identity.unique_id
                    );
                    return Ok(identity);
                }
                Err(err) => {
                    log::debug!("bootstrap attempt {} failed: {}", attempt, err);
                    last = err;
                }
            }
        }
        Err(last)
    }

    /// Store a new address, network id and unique id on a module.
    ///
    /// Updates the cached identity on success.
    pub fn store_address(
        &mut self,
        address: u16,
        network: u16,
        unique_id: u32,
    ) -> Result<(), LinkError> {
        self.check_network(network)?;

        let mut payload = [0u8; 11];
        payload[0..2].copy_from_slice(&network.to_le_bytes());
        payload[2..6].copy_from_slice(&unique_id.to_le_bytes());

        self.request(address, CMD_WRITE_CONFIG, &payload)?;

        self.identity = Some(Identity {
            address,
            network,
            unique_id,
        });
        Ok(())
    }

    /// Store a new network id on the locally connected module.
    ///
    /// Updates the cached network id on success.
    pub fn store_network(&mut self, network: u16) -> Result<(), LinkError> {
        self.check_network(network)?;

        let payload = [
            0x04,
            (network & 0xFF) as u8,
            (network >> 8) as u8,
            0x00,
            0x00,
        ];
        self.request(0, CMD_WRITE_PASSWORD, &payload)?;

        if let Some(identity) = self.identity.as_mut() {
            identity.network = network;
        }
        Ok(())
    }

    /// Configure the LoRa radio parameters of a module.
    ///
    /// The module answers by echoing the parameters it actually applied;
    /// if they differ from the requested ones the operation fails with
    /// [`LinkError::ParameterMismatch`]; an acknowledged command is not
    /// the same as an applied one.
    pub fn config_radio(&mut self, address: u16, params: RadioParams) -> Result<(), LinkError> {
        params.validate().map_err(LinkError::from)?;

        let requested = params.to_bytes();
        let mut payload = [0u8; 5];
        payload[0] = 0x01; // write, as opposed to read-back
        payload[1..5].copy_from_slice(&requested);

        let (_, response) = self.request(address, CMD_LORA_PARAMETER, &payload)?;

        if response.len() < 5 {
            return Err(LinkError::MalformedResponse {
                command: CMD_LORA_PARAMETER,
                reason: format!("parameter echo needs 5 bytes, got {}", response.len()),
            });
        }
        let echoed = [response[1], response[2], response[3], response[4]];
        if echoed != requested {
            return Err(LinkError::ParameterMismatch { requested, echoed });
        }
        Ok(())
    }

    /// Set the energy economy class of a module.
    ///
    /// `window` is only honored by the module in class A.
    pub fn set_low_power(
        &mut self,
        address: u16,
        class: PowerClass,
        window: RxWindow,
    ) -> Result<(), LinkError> {
        let payload = [0x00, class as u8, window as u8, 0x00];
        self.request(address, CMD_CLASS_POWER, &payload)?;
        Ok(())
    }

    /// Forward raw bytes to a remote module's transparent serial port.
    ///
    /// Returns the response payload.
    pub fn send_transparent(&mut self, address: u16, data: &[u8]) -> Result<Vec<u8>, LinkError> {
        let (_, payload) = self.request(address, CMD_SEND_TRANSPARENT, data)?;
        Ok(payload)
    }

    // Network ids share the address value space and the same revision bound.
    fn check_network(&self, network: u16) -> Result<(), LinkError> {
        let max = self.config.revision.address_width.max_address();
        if network > max {
            return Err(ProtocolError::AddressOutOfRange {
                address: network,
                max,
            }
            .into());
        }
        Ok(())
    }
}
