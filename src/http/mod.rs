//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP/TLS connection
//!     → server.rs (Axum setup)
//!     → request.rs (request ID)
//!     → middleware/auth.rs (bearer gate: 401 or pass through)
//!     → handlers.rs (/health) or mcp (tool endpoint)
//!     → Send to client
//! ```

pub mod handlers;
pub mod middleware;
pub mod request;
pub mod response;
pub mod server;

pub use middleware::{BearerAuth, BearerAuthLayer, ExchangeKind};
pub use request::{RequestIdExt, UuidRequestId, X_REQUEST_ID};
pub use server::{build_router, HttpServer, ServerError};
