//! Protocol constants
//!
//! Command codes and sizing limits for the LoRaMESH serial command protocol.
//! Command codes are opaque one-byte tags; the module echoes the code of the
//! command it is answering, which is how responses are correlated.

// ============================================================================
// Command Codes
// ============================================================================

/// Set the energy economy class (A/B/C) and receive window.
pub const CMD_CLASS_POWER: u8 = 0xC1;
/// Configure a GPIO pin (mode, pull) and get or set its value.
pub const CMD_GPIO_CONFIG: u8 = 0xC2;
/// Store the module's address and network id. Documented as "write config".
pub const CMD_WRITE_CONFIG: u8 = 0xCA;
/// Documented as "write password"; in practice stores the network id.
pub const CMD_WRITE_PASSWORD: u8 = 0xCD;
/// Trace the hops from a module back to the master.
pub const CMD_TRACEROUTE: u8 = 0xD2;
/// Read id, network and unique id of a module reachable over the mesh.
pub const CMD_REMOTE_READ: u8 = 0xD4;
/// Read the RSSI between the module and a neighbour.
pub const CMD_READ_RSSI: u8 = 0xD5;
/// Get or set the LoRa radio parameters (power, bandwidth, SF, CR).
pub const CMD_LORA_PARAMETER: u8 = 0xD6;
/// Read the noise floor on the current channel.
pub const CMD_READ_NOISE: u8 = 0xD8;
/// Read id, network and unique id of the locally connected module.
pub const CMD_LOCAL_READ: u8 = 0xE2;
/// Get diagnosis information from the module.
pub const CMD_DIAGNOSIS: u8 = 0xE7;
/// Forward a payload to a remote module's transparent serial port.
pub const CMD_SEND_TRANSPARENT: u8 = 0x28;

// ============================================================================
// Frame sizing
// ============================================================================

/// Frame overhead in bytes: 2 address + 1 command + 2 CRC.
pub const FRAME_OVERHEAD: usize = 5;

/// Minimum length of a valid frame (empty payload).
pub const MIN_FRAME_SIZE: usize = FRAME_OVERHEAD;

/// Default maximum payload size accepted by the frame encoder.
///
/// Payloads must be strictly smaller than this. Revisions can override it
/// via [`crate::Revision`].
pub const DEFAULT_MAX_PAYLOAD: usize = 232;
