//! Common error types for network operations

/// A common error type for network operations.
///
/// This enum defines a set of common errors that can occur when working with
/// a transport. It is designed to be simple and portable for `no_std`
/// environments, and is the error type of the bundled TCP and TLS transports.
#[derive(Debug, PartialEq, Eq, Clone, Copy, thiserror::Error)]
pub enum Error {
    /// An operation was attempted on a connection that is not open.
    #[error("connection is not open")]
    NotOpen,
    /// An error occurred during a write operation.
    #[error("write failed")]
    WriteError,
    /// An error occurred during a read operation.
    #[error("read failed")]
    ReadError,
    /// A connection attempt was refused.
    #[error("connection refused")]
    ConnectionRefused,
    /// A timeout occurred.
    #[error("operation timed out")]
    Timeout,
    /// The connection was closed.
    #[error("connection closed by peer")]
    ConnectionClosed,
    /// An invalid address was provided.
    #[error("invalid address")]
    InvalidAddress,
    /// A protocol-specific error occurred.
    #[error("protocol error")]
    ProtocolError,
}

#[cfg(feature = "std")]
impl Error {
    /// Classify an I/O error, falling back to `otherwise` for kinds without a
    /// dedicated variant.
    pub fn from_io(err: &std::io::Error, otherwise: Error) -> Self {
        use std::io::ErrorKind;

        match err.kind() {
            ErrorKind::WouldBlock | ErrorKind::TimedOut => Error::Timeout,
            ErrorKind::ConnectionRefused => Error::ConnectionRefused,
            ErrorKind::ConnectionReset
            | ErrorKind::ConnectionAborted
            | ErrorKind::BrokenPipe
            | ErrorKind::UnexpectedEof => Error::ConnectionClosed,
            ErrorKind::NotConnected => Error::NotOpen,
            ErrorKind::InvalidInput | ErrorKind::AddrNotAvailable => Error::InvalidAddress,
            _ => otherwise,
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Error {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Error::NotOpen => defmt::write!(f, "NotOpen"),
            Error::WriteError => defmt::write!(f, "WriteError"),
            Error::ReadError => defmt::write!(f, "ReadError"),
            Error::ConnectionRefused => defmt::write!(f, "ConnectionRefused"),
            Error::Timeout => defmt::write!(f, "Timeout"),
            Error::ConnectionClosed => defmt::write!(f, "ConnectionClosed"),
            Error::InvalidAddress => defmt::write!(f, "InvalidAddress"),
            Error::ProtocolError => defmt::write!(f, "ProtocolError"),
        }
    }
}
