//! HTTP/1.1 client over any [`Connect`](crate::network::Connect) transport.
//!
//! Each exchange is one request on one connection: the [`Client`] asks its
//! connector for a fresh connection, writes the request, deframes the
//! response by `Content-Length` and closes the connection.
//!
//! The wire pieces are usable on their own:
//!
//! - [`encode`] - query string and form percent-encoding
//! - [`line`] - CRLF line reading
//! - [`multipart`] - `multipart/form-data` bodies
//! - [`request`] - request head and body framing
//! - [`response`] - the response reader
//!
//! # Usage
//!
//! ```rust
//! use sockhttp::network::application::http::{Headers, Request, read_response, write_request};
//!
//! let mut wire = Vec::new();
//! write_request(&mut wire, &Request::get("status"), "device.local", "probe/1", &Headers::new()).unwrap();
//! assert!(wire.starts_with(b"GET /status HTTP/1.1\r\n"));
//!
//! let mut reply: &[u8] = b"HTTP/1.1 200 OK\r\nContent-Length: 2\r\n\r\nup";
//! let response = read_response(&mut reply).unwrap();
//! assert_eq!(response.status_code(), Some(200));
//! assert_eq!(response.body, b"up");
//! ```

mod client;
mod config;
pub mod encode;
mod error;
pub mod headers;
pub mod line;
pub mod multipart;
pub mod request;
pub mod response;

pub use client::Client;
pub use config::{Config, DEFAULT_USER_AGENT};
pub use encode::{encode_query, percent_encode};
pub use error::{Error, Stage};
pub use headers::Headers;
pub use line::read_line;
pub use multipart::{Boundary, Form, InputFile};
pub use request::{Body, Method, Request, encode_head, write_request};
pub use response::{Response, read_response};
