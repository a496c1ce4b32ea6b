//! Shared utilities for integration tests.
#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use axum::body::{Body, Bytes};
use axum::http::{Request, Response};
use axum::Router;
use rmcp::model::{CallToolResult, Content, JsonObject, Tool as ToolDefinition};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use places_gate::config::{Secrets, ServerConfig};
use places_gate::http::build_router;
use places_gate::mcp::{Tool, ToolError, ToolRegistry};
use places_gate::{BearerSecret, Gate, HttpServer, Shutdown};

pub const SECRET: &str = "abc123";

/// Accept header the streamable HTTP transport requires on POST.
pub const ACCEPT: &str = "application/json, text/event-stream";

/// Tool that records how often it ran and returns a fixed text.
#[derive(Clone, Default)]
pub struct StubTool {
    pub calls: Arc<AtomicUsize>,
}

impl StubTool {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Tool for StubTool {
    fn definition(&self) -> ToolDefinition {
        let mut schema = JsonObject::new();
        schema.insert("type".into(), json!("object"));
        ToolDefinition::new("stub", "Returns a fixed answer", Arc::new(schema))
    }

    async fn call(&self, _arguments: &JsonObject) -> Result<CallToolResult, ToolError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(CallToolResult::success(vec![Content::text("stub answer")]))
    }
}

pub fn test_config() -> ServerConfig {
    let mut config = ServerConfig::default();
    config.listener.bind_address = "127.0.0.1:0".into();
    config
}

/// Fully layered router with the given secret and a [`StubTool`].
pub fn app(secret: BearerSecret) -> (Router, StubTool) {
    let stub = StubTool::default();
    let tools = ToolRegistry::new().with(stub.clone());
    let router = build_router(&test_config(), Arc::new(Gate::new(secret)), tools);
    (router, stub)
}

pub fn tools_call(name: &str, arguments: Value) -> Value {
    json!({
        "jsonrpc": "2.0",
        "id": 1,
        "method": "tools/call",
        "params": {"name": name, "arguments": arguments},
    })
}

pub fn post_json(uri: &str, authorization: Option<&str>, body: &Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .header("accept", ACCEPT);
    if let Some(value) = authorization {
        builder = builder.header("authorization", value);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

pub async fn body_bytes(response: Response<Body>) -> Bytes {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
}

pub async fn body_json(response: Response<Body>) -> Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

/// Last JSON-RPC message carried in a server-sent event body.
pub fn last_event(body: &str) -> Option<Value> {
    body.lines()
        .filter_map(|line| line.strip_prefix("data:"))
        .filter_map(|data| serde_json::from_str::<Value>(data.trim()).ok())
        .filter(|message| message.get("jsonrpc").is_some())
        .last()
}

/// JSON-RPC response from a tool endpoint reply, SSE or plain JSON.
pub async fn rpc_response(response: Response<Body>) -> Value {
    let body = String::from_utf8(body_bytes(response).await.to_vec()).unwrap();
    last_event(&body)
        .or_else(|| serde_json::from_str(&body).ok())
        .unwrap_or_else(|| panic!("no JSON-RPC message in body: {:?}", body))
}

/// Start a real server on an ephemeral port.
pub async fn spawn_server(
    config: ServerConfig,
    secrets: Secrets,
) -> (SocketAddr, Shutdown, JoinHandle<()>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server = HttpServer::new(config, secrets).unwrap();
    let shutdown = Shutdown::new();
    let rx = shutdown.subscribe();

    let handle = tokio::spawn(async move {
        server.run(listener, rx).await.unwrap();
    });
    (addr, shutdown, handle)
}
