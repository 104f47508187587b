use alloc::string::{String, ToString};
use core::time::Duration;

use serde::Deserialize;

use super::error::Error;
use crate::network::Timeouts;

/// User agent sent when none is configured.
pub const DEFAULT_USER_AGENT: &str = concat!("sockhttp/", env!("CARGO_PKG_VERSION"));

fn default_port() -> u16 {
    80
}

fn default_connect_timeout_ms() -> u32 {
    Timeouts::DEFAULT_CONNECT.as_millis() as u32
}

fn default_response_timeout_ms() -> u32 {
    Timeouts::DEFAULT_RESPONSE.as_millis() as u32
}

/// Destination and tuning of a [`Client`](super::Client).
///
/// Deserializable so it can be loaded from a configuration document; see
/// [`Config::from_json`]. Omitted fields take their defaults.
///
/// ```rust
/// use sockhttp::network::application::http::Config;
///
/// let config = Config::from_json(r#"{"host":"example.com","response_timeout_ms":5000}"#).unwrap();
/// assert_eq!(config.port, 80);
/// assert_eq!(config.timeouts().unwrap().response.as_secs(), 5);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Config {
    /// Destination host, also sent as the `Host` header.
    pub host: String,
    /// Destination port.
    #[serde(default = "default_port")]
    pub port: u16,
    /// `User-Agent` header value; [`DEFAULT_USER_AGENT`] when absent.
    #[serde(default)]
    pub user_agent: Option<String>,
    /// Connection-establishment timeout in milliseconds.
    #[serde(default = "default_connect_timeout_ms")]
    pub connect_timeout_ms: u32,
    /// Response-read timeout in milliseconds.
    #[serde(default = "default_response_timeout_ms")]
    pub response_timeout_ms: u32,
}

impl Config {
    /// A configuration with default user agent and timeouts.
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            user_agent: None,
            connect_timeout_ms: default_connect_timeout_ms(),
            response_timeout_ms: default_response_timeout_ms(),
        }
    }

    /// Parse a JSON document and validate it.
    pub fn from_json(json: &str) -> Result<Self, Error> {
        let (config, _): (Self, usize) =
            serde_json_core::from_str(json).map_err(|e| Error::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check the fields a connection cannot do without.
    ///
    /// The host must be non-empty and free of whitespace and control
    /// characters; the user agent must not contain CR or LF; both timeouts
    /// must be positive.
    pub fn validate(&self) -> Result<(), Error> {
        if self.host.trim().is_empty() {
            return Err(Error::InvalidConfig("host is empty".into()));
        }
        // the host is written verbatim into the `Host` header
        if self
            .host
            .bytes()
            .any(|b| b.is_ascii_whitespace() || b.is_ascii_control())
        {
            return Err(Error::InvalidHeader("host".into()));
        }
        if self
            .user_agent
            .as_deref()
            .is_some_and(|ua| ua.bytes().any(|b| b == b'\r' || b == b'\n'))
        {
            return Err(Error::InvalidHeader("user-agent".into()));
        }
        self.timeouts().map(|_| ())
    }

    /// The configured timeouts; zero is rejected.
    pub fn timeouts(&self) -> Result<Timeouts, Error> {
        Ok(Timeouts {
            connect: positive_millis(self.connect_timeout_ms)?,
            response: positive_millis(self.response_timeout_ms)?,
        })
    }

    /// The user agent to send.
    pub fn user_agent(&self) -> &str {
        self.user_agent.as_deref().unwrap_or(DEFAULT_USER_AGENT)
    }
}

fn positive_millis(ms: u32) -> Result<Duration, Error> {
    if ms == 0 {
        return Err(Error::InvalidTimeout);
    }
    Ok(Duration::from_millis(u64::from(ms)))
}
