use std::io::{Read as _, Write as _};
use std::net::{Shutdown, TcpStream, ToSocketAddrs};

use tracing::trace;

use super::error::Error;
use super::{Close, Connect, Connection, Read, Remote, Write};

/// Opens plaintext TCP connections.
#[derive(Debug, Clone, Copy, Default)]
pub struct TcpConnector;

/// A connected plaintext TCP stream.
#[derive(Debug)]
pub struct TcpConnection {
    stream: TcpStream,
}

impl TcpConnection {
    /// Wrap an already connected stream.
    pub fn new(stream: TcpStream) -> Self {
        Self { stream }
    }
}

/// Resolve `remote` and connect to the first address that accepts, applying
/// the connect timeout per attempt and the response timeout to reads and
/// writes on the resulting stream.
pub(crate) fn open_stream(remote: &Remote<'_>) -> Result<TcpStream, Error> {
    let addrs = (remote.host, remote.port)
        .to_socket_addrs()
        .map_err(|_| Error::InvalidAddress)?;

    let mut last = Error::InvalidAddress;
    for addr in addrs {
        match TcpStream::connect_timeout(&addr, remote.timeouts.connect) {
            Ok(stream) => {
                stream
                    .set_read_timeout(Some(remote.timeouts.response))
                    .map_err(|e| Error::from_io(&e, Error::ProtocolError))?;
                stream
                    .set_write_timeout(Some(remote.timeouts.response))
                    .map_err(|e| Error::from_io(&e, Error::ProtocolError))?;
                trace!(%addr, "tcp connected");
                return Ok(stream);
            }
            Err(e) => {
                trace!(%addr, error = %e, "tcp connect attempt failed");
                last = Error::from_io(&e, Error::ConnectionRefused);
            }
        }
    }
    Err(last)
}

impl Connect for TcpConnector {
    type Connection = TcpConnection;
    type Error = Error;

    fn connect(&mut self, remote: &Remote<'_>) -> Result<Self::Connection, Self::Error> {
        open_stream(remote).map(TcpConnection::new)
    }
}

impl Read for TcpConnection {
    type Error = Error;

    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        self.stream
            .read(buf)
            .map_err(|e| Error::from_io(&e, Error::ReadError))
    }
}

impl Write for TcpConnection {
    type Error = Error;

    fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
        self.stream
            .write(buf)
            .map_err(|e| Error::from_io(&e, Error::WriteError))
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        self.stream
            .flush()
            .map_err(|e| Error::from_io(&e, Error::WriteError))
    }
}

impl Close for TcpConnection {
    type Error = Error;

    fn close(self) -> Result<(), Self::Error> {
        match self.stream.shutdown(Shutdown::Both) {
            Ok(()) => Ok(()),
            // The peer already hung up; the socket is released on drop either way.
            Err(e) if e.kind() == std::io::ErrorKind::NotConnected => Ok(()),
            Err(e) => Err(Error::from_io(&e, Error::ProtocolError)),
        }
    }
}

impl Connection for TcpConnection {}
