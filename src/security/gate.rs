//! Bearer credential gate.
//!
//! The decision is a pure function of the configured secret and the request
//! headers. It performs no I/O, holds no per-request state and never fails:
//! every malformed input becomes a [`DenyReason`].

use crate::security::headers::HeaderLookup;
use crate::security::secret::BearerSecret;

pub const AUTHORIZATION: &str = "authorization";

const BEARER_SCHEME: &str = "bearer";

/// Outcome of checking one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthDecision {
    Allowed,
    Denied(DenyReason),
}

impl AuthDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, AuthDecision::Allowed)
    }

    /// Short label for logs and metrics.
    pub fn as_str(&self) -> &'static str {
        match self {
            AuthDecision::Allowed => "allowed",
            AuthDecision::Denied(reason) => reason.as_str(),
        }
    }
}

/// Why a request was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DenyReason {
    /// No `Authorization` header, or an empty one.
    MissingHeader,
    /// Header present but not `Bearer <token>`.
    MalformedHeader,
    /// Well-formed header whose token is not the configured secret.
    TokenMismatch,
}

impl DenyReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            DenyReason::MissingHeader => "missing_header",
            DenyReason::MalformedHeader => "malformed_header",
            DenyReason::TokenMismatch => "token_mismatch",
        }
    }

    /// Body of the rejection response. Malformed and mismatched credentials
    /// share one body; only an absent header is reported differently.
    pub fn message(&self) -> &'static str {
        match self {
            DenyReason::MissingHeader => "Missing Authorization Header",
            DenyReason::MalformedHeader | DenyReason::TokenMismatch => "Unauthorized",
        }
    }
}

impl std::fmt::Display for DenyReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Decides whether a request may reach the wrapped application.
///
/// Shared read-only across all requests (usually behind an `Arc`).
#[derive(Debug)]
pub struct Gate {
    secret: BearerSecret,
}

impl Gate {
    pub fn new(secret: BearerSecret) -> Self {
        Self { secret }
    }

    /// Whether any request can ever be allowed.
    pub fn is_armed(&self) -> bool {
        self.secret.is_configured()
    }

    pub fn authorize<H: HeaderLookup + ?Sized>(&self, headers: &H) -> AuthDecision {
        let header = match headers.get(AUTHORIZATION) {
            Some(value) if !value.is_empty() => value,
            _ => return AuthDecision::Denied(DenyReason::MissingHeader),
        };

        let Some(token) = parse_bearer(&header) else {
            return AuthDecision::Denied(DenyReason::MalformedHeader);
        };

        if self.secret.matches(token) {
            AuthDecision::Allowed
        } else {
            AuthDecision::Denied(DenyReason::TokenMismatch)
        }
    }
}

/// Extract the credential from a `Bearer <token>` header value.
///
/// Leading whitespace is ignored and the scheme is split from the credential
/// on the first run of whitespace. Everything after that run is the
/// credential, including inner spaces and trailing whitespace.
pub fn parse_bearer(value: &str) -> Option<&str> {
    let value = value.trim_start();
    let (scheme, rest) = value.split_once(char::is_whitespace)?;
    let token = rest.trim_start();

    if token.is_empty() || !scheme.eq_ignore_ascii_case(BEARER_SCHEME) {
        return None;
    }
    Some(token)
}
