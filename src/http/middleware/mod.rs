//! Request middleware.

pub mod auth;

pub use auth::{BearerAuth, BearerAuthLayer, ExchangeKind};
