//! A transport abstraction for byte-stream protocols
//!
//! This module provides the small set of traits the HTTP layer needs from a
//! transport: a connected stream that can be read, written and closed, and a
//! connector that produces such streams on demand. Concrete plaintext and TLS
//! transports are provided behind the `std` and `tls` features; anything else
//! (an embedded TCP stack, a test double) only has to implement the traits.
//!

#![deny(unsafe_code)]

use core::time::Duration;

/// Common error types for network operations
pub mod error;

/// Application layer protocols built on the transport traits
pub mod application;

/// Plaintext TCP transport
#[cfg(feature = "std")]
pub mod tcp;

/// TLS transport
#[cfg(feature = "tls")]
pub mod tls;

/// Re-exports of common traits
pub mod prelude {
    pub use super::{Close, Connect, Connection, Read, Write};
}

// Core synchronous traits
/// A readable byte stream.
pub trait Read {
    /// Associated error type
    type Error: core::fmt::Debug;
    /// Read data from the connection. `Ok(0)` means the stream is exhausted.
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error>;
}

/// A writable byte stream.
pub trait Write {
    /// Associated error type
    type Error: core::fmt::Debug;
    /// Write data to the connection
    fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error>;
    /// Flush the write buffer
    fn flush(&mut self) -> Result<(), Self::Error>;
}

/// A stream that can be released.
pub trait Close {
    /// Associated error type
    type Error: core::fmt::Debug;
    /// Close the connection
    fn close(self) -> Result<(), Self::Error>;
}

/// A synchronous connection
pub trait Connection: Read + Write + Close {}

/// Timeouts handed to a connector for every connection it opens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    /// Maximum time allowed to establish the connection.
    pub connect: Duration,
    /// Maximum time a single read may block waiting for the peer.
    pub response: Duration,
}

impl Timeouts {
    /// Default connection-establishment timeout.
    pub const DEFAULT_CONNECT: Duration = Duration::from_secs(30);
    /// Default response-read timeout.
    pub const DEFAULT_RESPONSE: Duration = Duration::from_secs(60);
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            connect: Self::DEFAULT_CONNECT,
            response: Self::DEFAULT_RESPONSE,
        }
    }
}

/// The destination of a connection attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Remote<'a> {
    /// Host name or address literal.
    pub host: &'a str,
    /// Destination port.
    pub port: u16,
    /// Timeouts to apply to the opened connection.
    pub timeouts: Timeouts,
}

/// A synchronous connector (client)
pub trait Connect {
    /// Associated connection type
    type Connection: Connection;
    /// Associated error type
    type Error: core::fmt::Debug;
    /// Open a connection
    fn connect(&mut self, remote: &Remote<'_>) -> Result<Self::Connection, Self::Error>;
}

/// Reading from a byte slice consumes it from the front, like `std::io::Read`.
impl Read for &[u8] {
    type Error = core::convert::Infallible;

    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        let n = buf.len().min(self.len());
        let (head, tail) = self.split_at(n);
        buf[..n].copy_from_slice(head);
        *self = tail;
        Ok(n)
    }
}

/// Writing to a vector appends to it.
impl Write for alloc::vec::Vec<u8> {
    type Error = core::convert::Infallible;

    fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
        self.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}
