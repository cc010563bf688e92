//! CRC-16 checksum used by the LoRaMESH wire format.
//!
//! This is a reflected (LSB-first) CRC-16 with polynomial `0xA001`, but with
//! the module-specific seed `0xC181` instead of the conventional `0xFFFF` or
//! `0x0000`. The seed is part of the wire format: deployed modules will
//! reject frames computed with any other value, so it is deliberately not a
//! parameter.

/// Seed the module initializes its CRC accumulator with.
const CRC_SEED: u16 = 0xC181;

/// Reflected CRC-16 polynomial.
const CRC_POLY: u16 = 0xA001;

/// Compute the LoRaMESH CRC-16 over `data`.
///
/// Deterministic and pure; the checksum itself is never included in its own
/// computation.
pub fn crc16(data: &[u8]) -> u16 {
    let mut crc = CRC_SEED;
    for &byte in data {
        crc ^= byte as u16;
        for _ in 0..8 {
            let lsb_set = crc & 1 != 0;
            crc >>= 1;
            if lsb_set {
                crc ^= CRC_POLY;
            }
        }
    }
    crc
}
