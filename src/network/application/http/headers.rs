//! Header storage and caller header validation.
//!
//! Names are kept lower-cased, so lookups ignore case. The same [`Headers`]
//! type holds both the persistent custom request headers and the headers of
//! the last response.

use alloc::borrow::ToOwned;
use alloc::collections::BTreeMap;
use alloc::collections::btree_map;
use alloc::string::String;

use super::error::Error;

/// Header names the client writes itself and callers may not override.
pub const RESERVED: [&str; 4] = ["host", "content-length", "content-type", "user-agent"];

/// Whether `name` is one of the [`RESERVED`] headers, ignoring ASCII case and
/// surrounding whitespace.
pub fn is_reserved(name: &str) -> bool {
    let name = name.trim();
    RESERVED.iter().any(|r| r.eq_ignore_ascii_case(name))
}

/// Header fields keyed by lower-cased name, one value per name.
///
/// Iteration is in name order, which keeps serialized requests stable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers {
    fields: BTreeMap<String, String>,
}

impl Headers {
    /// An empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `value` under the lower-cased `name`, replacing any earlier value.
    pub fn insert(&mut self, name: &str, value: &str) {
        self.fields
            .insert(name.to_ascii_lowercase(), value.to_owned());
    }

    /// The value stored for `name`, looked up case-insensitively.
    pub fn get(&self, name: &str) -> Option<&str> {
        if name.bytes().any(|b| b.is_ascii_uppercase()) {
            self.fields
                .get(&name.to_ascii_lowercase())
                .map(String::as_str)
        } else {
            self.fields.get(name).map(String::as_str)
        }
    }

    /// Remove `name`, returning its value if it was present.
    pub fn remove(&mut self, name: &str) -> Option<String> {
        self.fields.remove(&name.to_ascii_lowercase())
    }

    /// Whether `name` is present.
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether there are no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Fields as `(name, value)` pairs in name order.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            inner: self.fields.iter(),
        }
    }
}

/// Iterator over the fields of [`Headers`].
#[derive(Debug, Clone)]
pub struct Iter<'a> {
    inner: btree_map::Iter<'a, String, String>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = (&'a str, &'a str);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<'a> IntoIterator for &'a Headers {
    type Item = (&'a str, &'a str);
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Validate a caller-supplied header and return its normalized name and value.
///
/// The name is trimmed and lower-cased, the value trimmed. Reserved names,
/// empty names, and anything that would break the header line (a `:` or
/// whitespace in the name, CR or LF anywhere) are rejected.
pub(crate) fn normalize_custom(name: &str, value: &str) -> Result<(String, String), Error> {
    let name = name.trim();
    if is_reserved(name) {
        return Err(Error::ReservedHeader(name.to_owned()));
    }
    let bad_name = name.is_empty()
        || name
            .bytes()
            .any(|b| b == b':' || b.is_ascii_whitespace() || b.is_ascii_control());
    let value = value.trim();
    if bad_name || value.bytes().any(|b| b == b'\r' || b == b'\n') {
        return Err(Error::InvalidHeader(name.to_owned()));
    }
    Ok((name.to_ascii_lowercase(), value.to_owned()))
}
