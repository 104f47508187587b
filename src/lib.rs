//! # sockhttp - HTTP/1.1 over a raw byte stream
//!
//! A small HTTP/1.1 client that frames requests and deframes responses by
//! itself, directly on top of a connected byte stream. No HTTP library sits
//! underneath: the request line, headers and bodies are written byte for byte,
//! and response bodies are extracted strictly according to `Content-Length`.
//!
//! ## Features
//!
//! - GET requests with a raw query string or url-encoded fields
//! - POST requests with url-encoded fields, a raw body, or `multipart/form-data`
//!   fields and file attachments
//! - Persistent custom request headers
//! - Last status line and response headers readable after every exchange
//! - Pluggable transports: plaintext TCP, TLS (rustls), or any type
//!   implementing the [`network::Connect`] trait
//!
//! ## Usage
//!
//! ```rust,no_run
//! use sockhttp::network::application::http::Client;
//!
//! # fn main() -> Result<(), sockhttp::network::application::http::Error> {
//! let mut client = Client::http("example.com")?;
//! client.set_header("Accept", "text/html")?;
//!
//! let body = client.get("index.html")?;
//! println!("{} ({} bytes)", client.status().unwrap_or_default(), body.len());
//! # Ok(())
//! # }
//! ```
//!
//! ### Custom transports
//!
//! ```rust
//! use sockhttp::network::application::http::Client;
//! use sockhttp::network::{Close, Connect, Connection, Read, Remote, Write};
//!
//! struct Canned(&'static [u8]);
//!
//! impl Read for Canned {
//!     type Error = ();
//!     fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
//!         let n = buf.len().min(self.0.len());
//!         buf[..n].copy_from_slice(&self.0[..n]);
//!         self.0 = &self.0[n..];
//!         Ok(n)
//!     }
//! }
//! impl Write for Canned {
//!     type Error = ();
//!     fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> { Ok(buf.len()) }
//!     fn flush(&mut self) -> Result<(), Self::Error> { Ok(()) }
//! }
//! impl Close for Canned {
//!     type Error = ();
//!     fn close(self) -> Result<(), Self::Error> { Ok(()) }
//! }
//! impl Connection for Canned {}
//!
//! struct CannedNetwork;
//!
//! impl Connect for CannedNetwork {
//!     type Connection = Canned;
//!     type Error = ();
//!     fn connect(&mut self, _remote: &Remote<'_>) -> Result<Canned, ()> {
//!         Ok(Canned(b"HTTP/1.1 200 OK\r\nContent-Length: 2\r\n\r\nOK"))
//!     }
//! }
//!
//! let mut client = Client::new(CannedNetwork, "example.com", 80).unwrap();
//! assert_eq!(client.get("").unwrap(), b"OK");
//! assert_eq!(client.status(), Some("HTTP/1.1 200 OK"));
//! ```
//!
//! ## Optional Features
//!
//! - `std`: Plaintext TCP transport and clock-seeded multipart boundaries (default)
//! - `tls`: TLS transport backed by rustls and the webpki root store (default)
//! - `defmt`: Enable defmt formatting of error types for embedded debugging

#![cfg_attr(not(feature = "std"), no_std)]
#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

extern crate alloc;

/// Transport abstraction and the HTTP/1.1 wire protocol built on top of it.
///
/// The transport traits describe a connected byte stream; the
/// [`application::http`](network::application::http) module frames requests
/// onto it and deframes responses from it.
pub mod network;
