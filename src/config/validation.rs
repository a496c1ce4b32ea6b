//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, page size bounds)
//! - Check addresses, paths and URLs are well formed
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ServerConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use url::Url;

use crate::config::schema::ServerConfig;

/// A single semantic problem with a configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

pub fn validate_config(config: &ServerConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::new(
            "listener.bind_address",
            format!("'{}' is not a socket address", config.listener.bind_address),
        ));
    }

    if let Some(tls) = &config.listener.tls {
        if tls.cert_path.is_empty() || tls.key_path.is_empty() {
            errors.push(ValidationError::new(
                "listener.tls",
                "cert_path and key_path are both required",
            ));
        }
    }

    if config.auth.token_env.trim().is_empty() {
        errors.push(ValidationError::new("auth.token_env", "must not be empty"));
    }
    for path in &config.auth.exempt_paths {
        if !path.starts_with('/') {
            errors.push(ValidationError::new(
                "auth.exempt_paths",
                format!("'{}' must start with '/'", path),
            ));
        }
    }
    if config.auth.exempt_paths.contains(&config.mcp.path) {
        errors.push(ValidationError::new(
            "auth.exempt_paths",
            "the tool endpoint cannot be exempt from authentication",
        ));
    }

    if !config.mcp.path.starts_with('/') || config.mcp.path.len() < 2 {
        errors.push(ValidationError::new(
            "mcp.path",
            format!("'{}' must be a non-root path starting with '/'", config.mcp.path),
        ));
    }

    match Url::parse(&config.places.endpoint) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => {}
        Ok(url) => errors.push(ValidationError::new(
            "places.endpoint",
            format!("unsupported scheme '{}'", url.scheme()),
        )),
        Err(e) => errors.push(ValidationError::new("places.endpoint", e.to_string())),
    }
    if config.places.api_key_env.trim().is_empty() {
        errors.push(ValidationError::new("places.api_key_env", "must not be empty"));
    }
    if !(1..=20).contains(&config.places.page_size) {
        errors.push(ValidationError::new("places.page_size", "must be between 1 and 20"));
    }
    if config.places.timeout_secs == 0 {
        errors.push(ValidationError::new("places.timeout_secs", "must be greater than 0"));
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::new("timeouts.request_secs", "must be greater than 0"));
    }
    if config.security.max_body_size == 0 {
        errors.push(ValidationError::new("security.max_body_size", "must be greater than 0"));
    }

    if config.observability.metrics_enabled
        && config
            .observability
            .metrics_address
            .parse::<SocketAddr>()
            .is_err()
    {
        errors.push(ValidationError::new(
            "observability.metrics_address",
            format!("'{}' is not a socket address", config.observability.metrics_address),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
