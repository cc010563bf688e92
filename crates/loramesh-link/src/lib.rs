//! Blocking link layer for LoRaMESH radio modules.
//!
//! This crate turns the wire format from `loramesh-protocol` into a working
//! request/response driver:
//!
//! - [`Transport`]: the four serial operations the driver needs, so real
//!   ports and test doubles are interchangeable.
//! - [`FrameReceiver`]: recovers frame boundaries from an undelimited byte
//!   stream using inter-byte silence and an overall deadline.
//! - [`LinkSession`]: the single blocking request/response primitive plus
//!   payload builders for the module's configuration commands.
//! - [`sim`]: an in-process module emulation used by the tests and examples.
//!
//! The model is strictly single-threaded: one session owns one transport,
//! and each transaction runs send → flush → receive to completion before the
//! next one starts.
//!
//! # Example
//!
//! ```rust
//! use loramesh_link::{LinkSession, SessionConfig};
//! use loramesh_link::sim::SimulatedModule;
//!
//! let module = SimulatedModule::new(49, 121, 0xDEADBEEF);
//! let mut session = LinkSession::new(module, SessionConfig::fast());
//! let identity = session.connect(3).unwrap();
//! assert_eq!(identity.address, 49);
//! ```

mod error;
mod receiver;
mod session;
mod transport;

pub mod sim;

pub use error::*;
pub use receiver::*;
pub use session::*;
pub use transport::*;
