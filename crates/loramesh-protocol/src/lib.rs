//! LoRaMESH Serial Command Protocol
//!
//! This crate provides types and utilities for the command protocol spoken by
//! Radioenge LoRaMESH radio modules over their serial command port. Every
//! exchange is a single frame addressed to a module:
//!
//! ```text
//! +---------+---------+---------+-------------------+--------+--------+
//! | addr_lo | addr_hi | command | payload[0..n]     | crc_lo | crc_hi |
//! +---------+---------+---------+-------------------+--------+--------+
//! ```
//!
//! There is no length field and no terminator byte: the receiving side infers
//! the frame boundary from inter-byte silence (see the `loramesh-link` crate).
//! The trailing CRC-16 uses a module-specific seed and covers every byte that
//! precedes it.
//!
//! # Example
//!
//! ```rust
//! use loramesh_protocol::{FrameCodec, Revision, CMD_LOCAL_READ};
//!
//! let codec = FrameCodec::new(Revision::default());
//! let wire = codec.encode(0, CMD_LOCAL_READ, &[0x00, 0x00, 0x00]).unwrap();
//! let frame = codec.decode(&wire).unwrap();
//! assert_eq!(frame.command, CMD_LOCAL_READ);
//! ```

mod constants;
mod crc;
mod error;
mod frame;
mod types;

pub use constants::*;
pub use crc::*;
pub use error::*;
pub use frame::*;
pub use types::*;
