//! Response deframing.
//!
//! A response is consumed in three phases: the status line, the header block
//! up to the first empty line, and a body framed strictly by
//! `Content-Length`. Nothing in the response itself is treated as fatal:
//! malformed header lines are skipped, an absent, unparsable or non-positive
//! length yields an empty body, and a stream that ends early yields the bytes
//! that did arrive. Only transport errors abort.

use alloc::string::String;
use alloc::vec::Vec;

use tracing::trace;

use super::error::{Error, Stage};
use super::headers::Headers;
use super::line::read_line;
use crate::network::Read;

/// Body bytes are read in chunks of at most this size.
const CHUNK_SIZE: usize = 1024;
/// Upper bound on the buffer reserved up front from a declared length.
const MAX_PREALLOCATION: usize = 64 * 1024;

/// A deframed response.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Response {
    /// Status line as received, e.g. `HTTP/1.1 200 OK`.
    pub status: String,
    /// Response headers, names lower-cased.
    pub headers: Headers,
    /// Body bytes; may be shorter than the declared `Content-Length`.
    pub body: Vec<u8>,
}

impl Response {
    /// The numeric status code, if the status line carries one.
    pub fn status_code(&self) -> Option<u16> {
        status_code(&self.status)
    }

    /// The declared body length, if it is a positive integer.
    pub fn content_length(&self) -> Option<u64> {
        declared_length(&self.headers)
    }
}

/// Extract the status code from a status line such as `HTTP/1.1 404 Not Found`.
pub fn status_code(status_line: &str) -> Option<u16> {
    let mut parts = status_line.split_ascii_whitespace();
    parts.next()?;
    let code = parts.next()?;
    if code.len() != 3 {
        return None;
    }
    code.parse().ok()
}

fn declared_length(headers: &Headers) -> Option<u64> {
    let value = headers.get("content-length")?;
    match value.parse::<i64>() {
        Ok(length) if length > 0 => Some(length as u64),
        Ok(length) => {
            trace!(length, "non-positive content-length, body treated as empty");
            None
        }
        Err(_) => {
            trace!(value, "unparsable content-length, body treated as empty");
            None
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    StatusLine,
    Headers,
    Body,
    Done,
}

/// Read a complete response from `reader`.
///
/// Bytes after the declared body are left unread.
pub fn read_response<R: Read + ?Sized>(reader: &mut R) -> Result<Response, Error> {
    let mut response = Response::default();
    let mut state = State::StatusLine;

    while state != State::Done {
        state = match state {
            State::StatusLine => {
                response.status = read_line(reader)?;
                State::Headers
            }
            State::Headers => {
                let line = read_line(reader)?;
                if line.is_empty() {
                    State::Body
                } else {
                    match line.split_once(':') {
                        Some((name, value)) => response.headers.insert(name.trim(), value.trim()),
                        None => trace!(line = line.as_str(), "discarding malformed header line"),
                    }
                    State::Headers
                }
            }
            State::Body => {
                match declared_length(&response.headers) {
                    Some(length) => response.body = read_body(reader, length)?,
                    None if !response.headers.contains("content-length") => {
                        trace!("no content-length, body treated as empty");
                    }
                    None => {}
                }
                State::Done
            }
            State::Done => State::Done,
        };
    }

    Ok(response)
}

fn read_body<R: Read + ?Sized>(reader: &mut R, length: u64) -> Result<Vec<u8>, Error> {
    let capacity = usize::try_from(length).map_or(MAX_PREALLOCATION, |l| l.min(MAX_PREALLOCATION));
    let mut body = Vec::with_capacity(capacity);
    let mut chunk = [0u8; CHUNK_SIZE];
    let mut remaining = length;

    while remaining > 0 {
        let want = usize::try_from(remaining).map_or(CHUNK_SIZE, |r| r.min(CHUNK_SIZE));
        let n = reader
            .read(&mut chunk[..want])
            .map_err(|e| Error::transport(Stage::Read, &e))?;
        if n == 0 {
            trace!(declared = length, received = body.len(), "stream ended before declared length");
            break;
        }
        body.extend_from_slice(&chunk[..n]);
        remaining -= n as u64;
    }

    Ok(body)
}
