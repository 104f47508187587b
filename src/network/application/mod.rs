//! # Application Layer Network Protocols
//!
//! This module contains application layer (OSI Layer 7) protocols built on the
//! core network traits. Each protocol works with any type implementing
//! [`Connect`](crate::network::Connect) and its
//! [`Connection`](crate::network::Connection).
//!
//! ## Available Protocols
//!
//! - **[`http`]**: HTTP/1.1 client with url-encoded and multipart/form-data bodies
//!
//! ## Usage Pattern
//!
//! 1. Pick or implement a connector for your transport layer
//! 2. Wrap it with the protocol client
//! 3. Use protocol-specific methods for communication

/// HTTP/1.1 client implementation.
///
/// Frames GET and POST requests directly onto a byte stream and deframes the
/// responses using `Content-Length`.
pub mod http;
