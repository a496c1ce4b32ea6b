//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request:
//!     → headers.rs (case-insensitive Authorization lookup)
//!     → gate.rs (parse "Bearer <token>", decide)
//!     → secret.rs (constant-time comparison with the configured secret)
//!     → Allowed: pass to application / Denied: 401
//! ```
//!
//! # Design Decisions
//! - Fail closed: no configured secret means nothing is allowed
//! - The decision is pure and synchronous; wiring lives in `http::middleware`
//! - No trust in client input: malformed headers are denials, never errors

pub mod gate;
pub mod headers;
pub mod secret;

pub use gate::{AuthDecision, DenyReason, Gate};
pub use headers::{HeaderLookup, HeaderPairs};
pub use secret::BearerSecret;
