//! Byte-oriented transport abstraction.
//!
//! The driver is agnostic to how the serial channel is opened or configured;
//! it only needs the four operations below. Implement this trait for a real
//! serial port handle, or use the doubles in [`crate::sim`] for tests.

use std::io;

/// A half-duplex, byte-oriented serial channel.
///
/// All operations are fallible with [`io::Error`]; the session maps those
/// into [`crate::LinkError::Io`].
pub trait Transport {
    /// Number of bytes ready to be read without blocking.
    ///
    /// The frame receiver calls this once per polling tick.
    fn bytes_available(&mut self) -> io::Result<usize>;

    /// Read one byte. Only called after [`Transport::bytes_available`]
    /// reported at least one byte.
    fn read_byte(&mut self) -> io::Result<u8>;

    /// Write the whole buffer to the channel.
    fn write_all(&mut self, buf: &[u8]) -> io::Result<()>;

    /// Drop everything currently buffered in the receive direction.
    ///
    /// The session calls this after transmitting a request so that stale
    /// bytes from an abandoned transaction cannot be mistaken for the reply.
    fn discard_input(&mut self) -> io::Result<()> {
        while self.bytes_available()? > 0 {
            self.read_byte()?;
        }
        Ok(())
    }
}
