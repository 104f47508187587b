//! `multipart/form-data` bodies.
//!
//! A [`Form`] collects plain text fields and file attachments; [`encode`]
//! renders it with a [`Boundary`]. Text fields are written before files, each
//! group in insertion order. Field names and file names are percent-encoded,
//! values and file contents are copied verbatim.

use alloc::vec::Vec;
use core::fmt::{self, Write as _};

use super::encode::percent_encode;

/// RFC 2046 caps boundaries at 70 characters.
const BOUNDARY_CAPACITY: usize = 70;
const BOUNDARY_PREFIX: &str = "------------------------boundary-";

/// A multipart delimiter token.
///
/// Derived from a 64-bit seed; with the `std` feature [`Boundary::generate`]
/// seeds it from the wall clock mixed with a process-wide counter. This makes
/// a collision with form content vanishingly unlikely but not impossible.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Boundary(heapless::String<BOUNDARY_CAPACITY>);

impl Boundary {
    /// A boundary derived from `seed`.
    pub fn from_seed(seed: u64) -> Self {
        let mut token = heapless::String::new();
        // prefix + 16 hex digits always fits the capacity
        let written = write!(token, "{BOUNDARY_PREFIX}{seed:016x}");
        debug_assert!(written.is_ok());
        Self(token)
    }

    /// A fresh boundary seeded from the current time and a counter.
    #[cfg(feature = "std")]
    pub fn generate() -> Self {
        use std::sync::atomic::{AtomicU64, Ordering};
        use std::time::{SystemTime, UNIX_EPOCH};

        static COUNTER: AtomicU64 = AtomicU64::new(0);

        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or_default();
        let count = COUNTER.fetch_add(1, Ordering::Relaxed);
        Self::from_seed(nanos ^ count.wrapping_mul(0x9E37_79B9_7F4A_7C15))
    }

    /// The token as a string.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// The `Content-Type` value announcing this boundary.
    pub fn content_type(&self) -> alloc::string::String {
        alloc::format!("multipart/form-data; boundary={}", self.as_str())
    }
}

impl fmt::Display for Boundary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl AsRef<str> for Boundary {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

/// A file attachment. The content is borrowed and only read during encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputFile<'a> {
    /// File name reported to the server; need not match any local file.
    pub file_name: &'a str,
    /// MIME type of the content, e.g. `image/png`.
    pub content_type: &'a str,
    /// Raw file bytes.
    pub content: &'a [u8],
}

impl<'a> InputFile<'a> {
    /// Describe a file attachment.
    pub fn new(file_name: &'a str, content_type: &'a str, content: &'a [u8]) -> Self {
        Self {
            file_name,
            content_type,
            content,
        }
    }
}

/// Fields and files of a multipart form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Form<'a> {
    fields: Vec<(&'a str, &'a str)>,
    files: Vec<(&'a str, InputFile<'a>)>,
}

impl<'a> Form<'a> {
    /// An empty form.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a plain text field.
    pub fn text(mut self, name: &'a str, value: &'a str) -> Self {
        self.fields.push((name, value));
        self
    }

    /// Add a file field.
    pub fn file(mut self, name: &'a str, file: InputFile<'a>) -> Self {
        self.files.push((name, file));
        self
    }

    /// Add every `(name, value)` pair as a text field.
    pub fn texts<I>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        self.fields.extend(fields);
        self
    }

    /// Text fields in insertion order.
    pub fn fields(&self) -> &[(&'a str, &'a str)] {
        &self.fields
    }

    /// File fields in insertion order.
    pub fn files(&self) -> &[(&'a str, InputFile<'a>)] {
        &self.files
    }

    /// Whether the form has neither fields nor files.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty() && self.files.is_empty()
    }
}

fn delimiter(out: &mut Vec<u8>, boundary: &Boundary) {
    out.extend_from_slice(b"--");
    out.extend_from_slice(boundary.as_str().as_bytes());
    out.extend_from_slice(b"\r\n");
}

/// Render `form` as a complete `multipart/form-data` body.
pub fn encode(boundary: &Boundary, form: &Form<'_>) -> Vec<u8> {
    let content_len: usize = form.fields.iter().map(|(_, v)| v.len()).sum::<usize>()
        + form.files.iter().map(|(_, f)| f.content.len()).sum::<usize>();
    let mut out = Vec::with_capacity(content_len + 160 * (form.fields.len() + form.files.len()) + 80);

    for (name, value) in &form.fields {
        delimiter(&mut out, boundary);
        out.extend_from_slice(b"Content-Disposition: form-data; name=\"");
        out.extend_from_slice(percent_encode(name).as_bytes());
        out.extend_from_slice(b"\"\r\n");
        out.extend_from_slice(b"Content-type: text/plain; charset=utf-8\r\n\r\n");
        out.extend_from_slice(value.as_bytes());
        out.extend_from_slice(b"\r\n");
    }

    for (name, file) in &form.files {
        delimiter(&mut out, boundary);
        out.extend_from_slice(b"Content-Disposition: form-data; name=\"");
        out.extend_from_slice(percent_encode(name).as_bytes());
        out.extend_from_slice(b"\"; filename=\"");
        out.extend_from_slice(percent_encode(file.file_name).as_bytes());
        out.extend_from_slice(b"\"\r\n");
        out.extend_from_slice(b"Content-Type: ");
        out.extend_from_slice(file.content_type.as_bytes());
        out.extend_from_slice(b"\r\n\r\n");
        out.extend_from_slice(file.content);
        out.extend_from_slice(b"\r\n");
    }

    out.extend_from_slice(b"--");
    out.extend_from_slice(boundary.as_str().as_bytes());
    out.extend_from_slice(b"--\r\n");
    out
}
