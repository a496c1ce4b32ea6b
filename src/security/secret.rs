//! The shared bearer secret.

use secrecy::{ExposeSecret, SecretString};
use subtle::ConstantTimeEq;

/// The process-wide bearer secret, loaded once at startup.
///
/// An absent secret is a valid state: nothing matches it, so every request is
/// rejected. An empty configured value is treated as absent.
pub struct BearerSecret {
    inner: Option<SecretString>,
}

impl BearerSecret {
    /// A secret that matches the given value. Empty input yields [`BearerSecret::unset`].
    pub fn new(value: impl Into<String>) -> Self {
        let value = value.into();
        if value.is_empty() {
            return Self::unset();
        }
        Self {
            inner: Some(SecretString::from(value)),
        }
    }

    /// A secret that matches nothing.
    pub fn unset() -> Self {
        Self { inner: None }
    }

    /// Build from an optional configuration value (e.g. an environment lookup).
    pub fn from_optional(value: Option<String>) -> Self {
        value.map(Self::new).unwrap_or_else(Self::unset)
    }

    pub fn is_configured(&self) -> bool {
        self.inner.is_some()
    }

    /// Compare a presented credential without short-circuiting on the first
    /// differing byte. Only the length of the secret can leak.
    pub fn matches(&self, candidate: &str) -> bool {
        match &self.inner {
            Some(secret) => bool::from(
                candidate
                    .as_bytes()
                    .ct_eq(secret.expose_secret().as_bytes()),
            ),
            None => false,
        }
    }
}

impl std::fmt::Debug for BearerSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = if self.is_configured() { "[REDACTED]" } else { "<unset>" };
        f.debug_tuple("BearerSecret").field(&state).finish()
    }
}
