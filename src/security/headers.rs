//! Case-insensitive header lookup.
//!
//! The gate never sees a concrete header container. It asks for one header by
//! name through [`HeaderLookup`], so the same decision code runs against an
//! `http::HeaderMap` inside the server and against plain `(name, value)` pairs
//! in tests and tooling.

use std::borrow::Cow;

use axum::http::{HeaderMap, HeaderValue};

/// Read-only, case-insensitive access to request headers.
///
/// When a header occurs more than once, the last occurrence is returned.
pub trait HeaderLookup {
    fn get(&self, name: &str) -> Option<Cow<'_, str>>;
}

impl HeaderLookup for HeaderMap {
    fn get(&self, name: &str) -> Option<Cow<'_, str>> {
        self.get_all(name).iter().last().map(decode_value)
    }
}

impl<T: HeaderLookup + ?Sized> HeaderLookup for &T {
    fn get(&self, name: &str) -> Option<Cow<'_, str>> {
        (**self).get(name)
    }
}

/// Header values are bytes on the wire. Visible ASCII is borrowed as-is,
/// anything else is decoded as Latin-1 so no value is ever unreadable.
fn decode_value(value: &HeaderValue) -> Cow<'_, str> {
    match value.to_str() {
        Ok(text) => Cow::Borrowed(text),
        Err(_) => Cow::Owned(value.as_bytes().iter().map(|&b| b as char).collect()),
    }
}

/// An ordered sequence of `(name, value)` header pairs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderPairs {
    pairs: Vec<(String, String)>,
}

impl HeaderPairs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a header. A later value with the same name shadows earlier ones.
    pub fn push(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.pairs.push((name.into(), value.into()));
    }

    /// Builder-style [`push`](Self::push).
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.push(name, value);
        self
    }

}

impl HeaderLookup for HeaderPairs {
    fn get(&self, name: &str) -> Option<Cow<'_, str>> {
        self.pairs
            .iter()
            .rev()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| Cow::Borrowed(value.as_str()))
    }
}

impl<N, V> FromIterator<(N, V)> for HeaderPairs
where
    N: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (N, V)>>(iter: I) -> Self {
        Self {
            pairs: iter
                .into_iter()
                .map(|(name, value)| (name.into(), value.into()))
                .collect(),
        }
    }
}
