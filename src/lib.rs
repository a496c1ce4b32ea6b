//! Bearer-gated places search tool server.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request
//!     ──────────────▶ request id ─▶ trace ─▶ timeout ─▶ bearer gate ──┬─▶ /health
//!                                                        │            └─▶ /mcp (streamable HTTP)
//!                                                        │                    │
//!                                                  401 text/plain             ▼
//!                                                                      find_on_map tool
//!                                                                             │
//!                                                                             ▼
//!                                                              places search + og:image
//! ```

// Core
pub mod security;
pub mod http;

// Tool endpoint
pub mod mcp;
pub mod places;

// Cross-cutting concerns
pub mod config;
pub mod lifecycle;
pub mod net;
pub mod observability;

pub use config::ServerConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use security::{AuthDecision, BearerSecret, DenyReason, Gate};
