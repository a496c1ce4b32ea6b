use clap::{Parser, Subcommand};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use serde_json::{json, Value};

#[derive(Parser)]
#[command(name = "places-cli")]
#[command(about = "Client for the places tool server", long_about = None)]
struct Cli {
    /// Tool endpoint URL.
    #[arg(short, long, default_value = "http://localhost:30000/mcp")]
    url: String,

    /// Bearer token.
    #[arg(short, long, env = "AUTH_TOKEN")]
    token: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check the server answers
    Ping,
    /// List available tools
    Tools,
    /// Find places matching a text query
    Find {
        /// e.g. "Museum in Tokyo"
        query: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();

    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("application/json, text/event-stream"));
    if let Some(token) = &cli.token {
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", token))?,
        );
    }

    let message = match &cli.command {
        Commands::Ping => json!({"jsonrpc": "2.0", "id": 1, "method": "ping"}),
        Commands::Tools => json!({"jsonrpc": "2.0", "id": 1, "method": "tools/list"}),
        Commands::Find { query } => json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": "tools/call",
            "params": {"name": "find_on_map", "arguments": {"query": query}},
        }),
    };

    let res = client
        .post(&cli.url)
        .headers(headers)
        .json(&message)
        .send()
        .await?;
    print_response(res, &cli.command).await
}

async fn print_response(
    res: reqwest::Response,
    command: &Commands,
) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    if !status.is_success() {
        eprintln!("Error: server returned status {}", status);
        if let Ok(text) = res.text().await {
            eprintln!("Response: {}", text);
        }
        std::process::exit(1);
    }

    let body = res.text().await?;
    let json = last_message(&body)
        .map(Ok)
        .unwrap_or_else(|| serde_json::from_str::<Value>(&body))?;
    if let Some(error) = json.get("error") {
        eprintln!("Error: {}", serde_json::to_string_pretty(error)?);
        std::process::exit(1);
    }

    // Tool output is JSON encoded as text; show it decoded when possible.
    if let Commands::Find { .. } = command {
        if let Some(text) = json["result"]["content"][0]["text"].as_str() {
            match serde_json::from_str::<Value>(text) {
                Ok(places) => println!("{}", serde_json::to_string_pretty(&places)?),
                Err(_) => println!("{}", text),
            }
            return Ok(());
        }
    }

    println!("{}", serde_json::to_string_pretty(&json["result"])?);
    Ok(())
}

/// Last JSON message in a server-sent event stream.
fn last_message(body: &str) -> Option<Value> {
    body.lines()
        .filter_map(|line| line.strip_prefix("data:"))
        .filter_map(|data| serde_json::from_str(data.trim()).ok())
        .last()
}
