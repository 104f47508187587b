use std::io::{ErrorKind, Read as _, Write as _};
use std::net::{Shutdown, TcpStream};
use std::sync::Arc;

use rustls::pki_types::ServerName;
use rustls::{ClientConfig, ClientConnection, RootCertStore, StreamOwned};
use tracing::trace;

use super::error::Error;
use super::tcp::open_stream;
use super::{Close, Connect, Connection, Read, Remote, Write};

/// Opens TLS connections on top of TCP.
///
/// Certificates are verified against the bundled webpki root store unless a
/// custom [`ClientConfig`] is supplied with [`TlsConnector::with_config`].
#[derive(Debug, Clone)]
pub struct TlsConnector {
    config: Arc<ClientConfig>,
}

impl TlsConnector {
    /// A connector trusting the webpki root certificates.
    pub fn new() -> Self {
        let mut roots = RootCertStore::empty();
        roots.extend(webpki_roots::TLS_SERVER_ROOTS.iter().cloned());

        let config = ClientConfig::builder()
            .with_root_certificates(roots)
            .with_no_client_auth();
        Self::with_config(Arc::new(config))
    }

    /// A connector using a caller-built rustls configuration.
    pub fn with_config(config: Arc<ClientConfig>) -> Self {
        Self { config }
    }
}

impl Default for TlsConnector {
    fn default() -> Self {
        Self::new()
    }
}

/// A TLS session over a TCP stream.
pub struct TlsConnection {
    stream: StreamOwned<ClientConnection, TcpStream>,
}

impl core::fmt::Debug for TlsConnection {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("TlsConnection")
            .field("peer", &self.stream.sock.peer_addr().ok())
            .finish_non_exhaustive()
    }
}

impl Connect for TlsConnector {
    type Connection = TlsConnection;
    type Error = Error;

    fn connect(&mut self, remote: &Remote<'_>) -> Result<Self::Connection, Self::Error> {
        let server_name =
            ServerName::try_from(remote.host.to_owned()).map_err(|_| Error::InvalidAddress)?;
        let session = ClientConnection::new(Arc::clone(&self.config), server_name)
            .map_err(|_| Error::ProtocolError)?;
        let tcp = open_stream(remote)?;
        trace!(host = remote.host, "tls session created");

        Ok(TlsConnection {
            stream: StreamOwned::new(session, tcp),
        })
    }
}

impl Read for TlsConnection {
    type Error = Error;

    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        match self.stream.read(buf) {
            Ok(n) => Ok(n),
            // Many servers drop the socket without sending close_notify.
            Err(e) if e.kind() == ErrorKind::UnexpectedEof => Ok(0),
            Err(e) => Err(Error::from_io(&e, Error::ReadError)),
        }
    }
}

impl Write for TlsConnection {
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

impl Close for TlsConnection {
    type Error = Error;

    fn close(mut self) -> Result<(), Self::Error> {
        self.stream.conn.send_close_notify();
        // Best effort: the peer may already be gone.
        let _ = self.stream.flush();
        match self.stream.sock.shutdown(Shutdown::Both) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotConnected => Ok(()),
            Err(e) => Err(Error::from_io(&e, Error::ProtocolError)),
        }
    }
}

impl Connection for TlsConnection {}
