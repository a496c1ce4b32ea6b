//! Network layer subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming TCP connection
//!     → plain: tokio TcpListener handed to axum::serve
//!     → TLS: tls.rs (rustls config) → axum_server
//!     → HTTP layer
//! ```

pub mod tls;
