//! Tool protocol endpoint.
//!
//! # Data Flow
//! ```text
//! POST /mcp (already authorized by the gate)
//!     → rmcp streamable HTTP transport (decode, respond over SSE)
//!     → server.rs ToolServer
//!         initialize / ping / tools/list → answered locally
//!         tools/call → tool.rs registry → Tool::call
//! ```

pub mod server;
pub mod tool;

pub use server::{streamable_service, ToolServer};
pub use tool::{Tool, ToolError, ToolRegistry};
