//! `application/x-www-form-urlencoded` encoding.
//!
//! Alphanumerics and `*-._` pass through, a space becomes `+`, and every other
//! byte of the UTF-8 encoding becomes `%XX`. The byte-level rules come from
//! the `form_urlencoded` crate.

use alloc::string::String;

/// Percent-encode `text` for use in a query string or a multipart header.
pub fn percent_encode(text: &str) -> String {
    form_urlencoded::byte_serialize(text.as_bytes()).collect()
}

/// Join `name=value` pairs with `&`, encoding every name and value.
///
/// Pairs are emitted in iteration order. Pass an ordered collection (a slice,
/// a `Vec`, a `BTreeMap`) when the output has to be stable; a `HashMap` works
/// but gives no ordering guarantee. No pairs yields an empty string.
pub fn encode_query<I, K, V>(fields: I) -> String
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut serializer = form_urlencoded::Serializer::new(String::new());
    for (name, value) in fields {
        serializer.append_pair(name.as_ref(), value.as_ref());
    }
    serializer.finish()
}
