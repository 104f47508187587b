//! Request framing.
//!
//! The head is written in a fixed order so that the bytes on the wire are
//! predictable: request line, `User-Agent`, `Host`, then `Content-Type` and
//! `Content-Length` for requests with a body, then the custom headers in name
//! order, then the blank line.

use alloc::borrow::Cow;
use alloc::string::ToString;
use alloc::vec::Vec;

use super::error::{Error, Stage};
use super::headers::Headers;
use crate::network::Write;

/// Content type of url-encoded bodies.
pub const FORM_URLENCODED: &str = "application/x-www-form-urlencoded";

/// HTTP request method.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    /// `GET`
    Get,
    /// `POST`
    Post,
}

impl Method {
    /// The method token as written on the request line.
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
        }
    }
}

impl core::fmt::Display for Method {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A request body together with its content type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Body<'a> {
    /// Value of the `Content-Type` header.
    pub content_type: Cow<'a, str>,
    /// Exact bytes sent after the head.
    pub content: Cow<'a, [u8]>,
}

impl<'a> Body<'a> {
    /// An `application/x-www-form-urlencoded` body.
    pub fn form_urlencoded(data: impl Into<Cow<'a, str>>) -> Self {
        let content = match data.into() {
            Cow::Borrowed(s) => Cow::Borrowed(s.as_bytes()),
            Cow::Owned(s) => Cow::Owned(s.into_bytes()),
        };
        Self {
            content_type: Cow::Borrowed(FORM_URLENCODED),
            content,
        }
    }
}

/// A single request, built per call and discarded afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request<'a> {
    /// Request method.
    pub method: Method,
    /// Path without the leading `/`, already percent-encoded. Written as is.
    pub path: &'a str,
    /// Query string, with or without a leading `?`, already encoded.
    pub query: Option<&'a str>,
    /// Body; `Content-Type` and `Content-Length` are sent only when present.
    pub body: Option<Body<'a>>,
}

impl<'a> Request<'a> {
    /// A body-less `GET`.
    pub fn get(path: &'a str) -> Self {
        Self {
            method: Method::Get,
            path,
            query: None,
            body: None,
        }
    }

    /// A `POST` carrying `body`.
    pub fn post(path: &'a str, body: Body<'a>) -> Self {
        Self {
            method: Method::Post,
            path,
            query: None,
            body: Some(body),
        }
    }

    /// Attach a query string. An empty query is dropped.
    pub fn with_query(mut self, query: &'a str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        self.query = (!query.is_empty()).then_some(query);
        self
    }
}

fn header(out: &mut Vec<u8>, name: &str, value: &str) {
    out.extend_from_slice(name.as_bytes());
    out.extend_from_slice(b": ");
    out.extend_from_slice(value.as_bytes());
    out.extend_from_slice(b"\r\n");
}

/// Serialize the request line and headers, including the blank line that
/// ends the head.
pub fn encode_head(request: &Request<'_>, host: &str, user_agent: &str, custom: &Headers) -> Vec<u8> {
    let mut out = Vec::with_capacity(128 + request.path.len());

    out.extend_from_slice(request.method.as_str().as_bytes());
    out.extend_from_slice(b" /");
    out.extend_from_slice(request.path.as_bytes());
    if let Some(query) = request.query {
        let query = query.strip_prefix('?').unwrap_or(query);
        out.push(b'?');
        out.extend_from_slice(query.as_bytes());
    }
    out.extend_from_slice(b" HTTP/1.1\r\n");

    header(&mut out, "User-Agent", user_agent);
    header(&mut out, "Host", host);

    if let Some(body) = &request.body {
        header(&mut out, "Content-Type", &body.content_type);
        header(&mut out, "Content-Length", &body.content.len().to_string());
    }

    for (name, value) in custom {
        header(&mut out, name, value);
    }

    out.extend_from_slice(b"\r\n");
    out
}

fn write_all<W: Write + ?Sized>(writer: &mut W, mut buf: &[u8]) -> Result<(), Error> {
    while !buf.is_empty() {
        match writer.write(buf) {
            Ok(0) => return Err(Error::transport(Stage::Write, &"connection accepted no bytes")),
            Ok(n) => buf = &buf[n..],
            Err(e) => return Err(Error::transport(Stage::Write, &e)),
        }
    }
    Ok(())
}

/// Write the full request, head then body, and flush.
pub fn write_request<W: Write + ?Sized>(
    writer: &mut W,
    request: &Request<'_>,
    host: &str,
    user_agent: &str,
    custom: &Headers,
) -> Result<(), Error> {
    write_all(writer, &encode_head(request, host, user_agent, custom))?;
    if let Some(body) = &request.body {
        write_all(writer, &body.content)?;
    }
    writer
        .flush()
        .map_err(|e| Error::transport(Stage::Write, &e))
}
