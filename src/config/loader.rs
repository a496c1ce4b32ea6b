//! Configuration loading from disk and the environment.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use secrecy::SecretString;

use crate::config::schema::ServerConfig;
use crate::config::validation::{validate_config, ValidationError};
use crate::security::BearerSecret;

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Env file error: {0}")]
    EnvFile(#[from] dotenvy::Error),
    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Values read from the environment once at startup.
#[derive(Debug)]
pub struct Secrets {
    /// Shared bearer secret for the gate.
    pub auth_token: BearerSecret,
    /// Places API key, if configured.
    pub places_api_key: Option<SecretString>,
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<ServerConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    parse_config(&content)
}

/// Parse and validate configuration from TOML text.
pub fn parse_config(content: &str) -> Result<ServerConfig, ConfigError> {
    let config: ServerConfig = toml::from_str(content)?;
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

/// Resolve the secrets named by `config` through `lookup`.
///
/// Empty values count as unset. A missing bearer secret is not an error: the
/// gate then rejects every request.
pub fn load_secrets<F>(config: &ServerConfig, lookup: F) -> Secrets
where
    F: Fn(&str) -> Option<String>,
{
    let non_empty = |name: &str| lookup(name).filter(|v| !v.is_empty());

    Secrets {
        auth_token: BearerSecret::from_optional(non_empty(&config.auth.token_env)),
        places_api_key: non_empty(&config.places.api_key_env).map(SecretString::from),
    }
}

/// Process environment lookup for [`load_secrets`].
pub fn process_env(name: &str) -> Option<String> {
    std::env::var(name).ok()
}

/// Default env file, read from the working directory when present.
pub const DEFAULT_ENV_FILE: &str = ".env";

/// Read `KEY=value` pairs from an env file.
///
/// An explicit path must exist. Without one, [`DEFAULT_ENV_FILE`] is read if
/// present and silently skipped otherwise.
pub fn load_env_file(explicit: Option<&Path>) -> Result<HashMap<String, String>, ConfigError> {
    let path = match explicit {
        Some(path) => path,
        None if Path::new(DEFAULT_ENV_FILE).is_file() => Path::new(DEFAULT_ENV_FILE),
        None => return Ok(HashMap::new()),
    };

    let vars = dotenvy::from_path_iter(path)?.collect::<Result<HashMap<_, _>, _>>()?;
    tracing::debug!(path = %path.display(), count = vars.len(), "Env file loaded");
    Ok(vars)
}

/// Lookup that prefers `primary` and falls back to values from an env file.
///
/// Variables already set in the process are never overridden by the file.
pub fn with_env_file<F>(primary: F, file: HashMap<String, String>) -> impl Fn(&str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    move |name: &str| primary(name).or_else(|| file.get(name).cloned())
}
