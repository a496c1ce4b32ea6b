//! Places tool server.
//!
//! Serves the `find_on_map` tool over MCP streamable HTTP, behind a shared
//! bearer secret read from the environment at startup.

use std::path::PathBuf;

use clap::Parser;

use places_gate::config::{self, loader::process_env, ServerConfig};
use places_gate::lifecycle::{signals, startup, Shutdown};
use places_gate::observability::logging;

#[derive(Parser)]
#[command(name = "places-gate", version)]
#[command(about = "Bearer-gated places search tool server", long_about = None)]
struct Args {
    /// TOML configuration file. Defaults apply when omitted.
    #[arg(short, long, env = "PLACES_GATE_CONFIG")]
    config: Option<PathBuf>,

    /// Override `listener.bind_address`.
    #[arg(short, long)]
    bind: Option<String>,

    /// Env file holding secrets. `./.env` is read when present and this is omitted.
    #[arg(long, env = "PLACES_GATE_ENV_FILE")]
    env_file: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => config::load_config(path)?,
        None => ServerConfig::default(),
    };
    if let Some(bind) = args.bind {
        config.listener.bind_address = bind;
        config::validation::validate_config(&config).map_err(config::ConfigError::Validation)?;
    }

    logging::init(&config.observability)?;

    tracing::info!("places-gate v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        config_file = ?args.config,
        bind_address = %config.listener.bind_address,
        tls = config.listener.tls.is_some(),
        mcp_path = %config.mcp.path,
        "Configuration loaded"
    );

    let env_file = config::load_env_file(args.env_file.as_deref())?;
    let secrets = config::load_secrets(&config, config::with_env_file(process_env, env_file));

    let shutdown = Shutdown::new();
    signals::spawn_signal_listener(shutdown.clone());

    startup::run(config, secrets, &shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
