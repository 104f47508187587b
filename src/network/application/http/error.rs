//! Errors surfaced by the HTTP client.
//!
//! Only two classes of failure reach the caller: configuration mistakes, which
//! are rejected before any network activity, and transport failures, which
//! abort the exchange in progress. Framing anomalies in a response (malformed
//! header lines, missing or bogus `Content-Length`, short bodies) are absorbed
//! by the response reader and never show up here.

use alloc::format;
use alloc::string::String;
use core::fmt;

/// The step of an exchange during which a transport failure happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Acquiring a connection from the connector.
    Connect,
    /// Writing the request.
    Write,
    /// Reading the response.
    Read,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Stage::Connect => "connect",
            Stage::Write => "write",
            Stage::Read => "read",
        })
    }
}

/// Errors returned by [`Client`](super::Client) and the wire functions.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// The header is managed by the client and cannot be set by the caller.
    #[error("{0} header cannot be set")]
    ReservedHeader(String),

    /// The header name is empty or the name or value would break framing.
    #[error("invalid header: {0}")]
    InvalidHeader(String),

    /// A timeout of zero was configured.
    #[error("timeout must be positive")]
    InvalidTimeout,

    /// A configuration document could not be used.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The transport failed; the exchange was aborted.
    #[error("{stage} failed: {detail}")]
    Transport {
        /// Where the exchange was when the transport failed.
        stage: Stage,
        /// Debug rendering of the transport's own error.
        detail: String,
    },
}

impl Error {
    pub(crate) fn transport<E: fmt::Debug>(stage: Stage, cause: &E) -> Self {
        Self::Transport {
            stage,
            detail: format!("{cause:?}"),
        }
    }

    /// Whether the error was raised by configuration, before any I/O.
    pub fn is_config(&self) -> bool {
        !self.is_transport()
    }

    /// Whether the error aborted an exchange on the transport.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport { .. })
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Error {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Error::ReservedHeader(name) => defmt::write!(f, "ReservedHeader({=str})", name.as_str()),
            Error::InvalidHeader(name) => defmt::write!(f, "InvalidHeader({=str})", name.as_str()),
            Error::InvalidTimeout => defmt::write!(f, "InvalidTimeout"),
            Error::InvalidConfig(reason) => defmt::write!(f, "InvalidConfig({=str})", reason.as_str()),
            Error::Transport { stage, detail } => match stage {
                Stage::Connect => defmt::write!(f, "Transport(connect, {=str})", detail.as_str()),
                Stage::Write => defmt::write!(f, "Transport(write, {=str})", detail.as_str()),
                Stage::Read => defmt::write!(f, "Transport(read, {=str})", detail.as_str()),
            },
        }
    }
}
