//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, optional)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → ServerConfig (validated, immutable)
//!
//! environment
//!     → loader.rs (secrets named by the config)
//!     → Secrets (bearer secret, API key)
//! ```
//!
//! # Design Decisions
//! - Config and secrets are immutable once loaded; no hot reload
//! - All fields have defaults to allow minimal configs
//! - Secrets never live in the file, only the variable names do
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{
    load_config, load_env_file, load_secrets, parse_config, with_env_file, ConfigError, Secrets,
};
pub use schema::{
    AuthConfig, ListenerConfig, LogFormat, McpConfig, ObservabilityConfig, PlacesConfig,
    SecurityConfig, ServerConfig, TimeoutConfig, TlsConfig,
};
pub use validation::ValidationError;
