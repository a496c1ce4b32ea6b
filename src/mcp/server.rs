//! Tool server exposed over the streamable HTTP transport.
//!
//! # Responsibilities
//! - Answer `initialize`, `tools/list` and `tools/call` from the registry
//! - Map tool outcomes onto protocol results and errors
//! - Record per-tool metrics
//!
//! # Design Decisions
//! - Stateless transport: every POST is served on its own, no sessions
//! - Tool failures are in-band (`isError: true`), bad input is a protocol
//!   error (`-32602`)

use std::sync::Arc;
use std::time::Instant;

use axum::http::request::Parts;
use rmcp::model::{
    CallToolRequestParams, CallToolResult, Content, Implementation, ListToolsResult,
    PaginatedRequestParams, ServerCapabilities, ServerInfo, Tool as ToolDefinition,
};
use rmcp::service::RequestContext;
use rmcp::transport::streamable_http_server::{
    session::local::LocalSessionManager, StreamableHttpServerConfig, StreamableHttpService,
};
use rmcp::{ErrorData, RoleServer, ServerHandler};

use crate::http::request::RequestIdExt;
use crate::mcp::tool::{ToolError, ToolRegistry};
use crate::observability::metrics;

/// Handler shared by every request to the tool endpoint.
#[derive(Debug, Clone)]
pub struct ToolServer {
    name: String,
    version: String,
    tools: ToolRegistry,
}

impl ToolServer {
    pub fn new(name: impl Into<String>, tools: ToolRegistry) -> Self {
        Self {
            name: name.into(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            tools,
        }
    }

    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.tools.definitions()
    }

    /// Run one `tools/call` against the registry.
    pub async fn call(
        &self,
        params: CallToolRequestParams,
        request_id: &str,
    ) -> Result<CallToolResult, ErrorData> {
        let name = params.name.to_string();
        let Some(tool) = self.tools.get(&name) else {
            return Err(ErrorData::invalid_params(format!("Unknown tool: {}", name), None));
        };
        let arguments = params.arguments.unwrap_or_default();

        let start = Instant::now();
        match tool.call(&arguments).await {
            Ok(result) => {
                let outcome = if result.is_error == Some(true) { "tool_error" } else { "ok" };
                metrics::record_tool_call(&name, outcome, start);
                Ok(result)
            }
            Err(ToolError::InvalidArguments(message)) => {
                metrics::record_tool_call(&name, "invalid_arguments", start);
                Err(ErrorData::invalid_params(message, None))
            }
            Err(e @ ToolError::Execution(_)) => {
                tracing::warn!(request_id = %request_id, tool = %name, error = %e, "Tool call failed");
                metrics::record_tool_call(&name, "tool_error", start);
                Ok(CallToolResult::error(vec![Content::text(e.to_string())]))
            }
        }
    }
}

impl ServerHandler for ToolServer {
    fn get_info(&self) -> ServerInfo {
        let mut implementation = Implementation::from_build_env();
        implementation.name = self.name.clone();
        implementation.version = self.version.clone();

        ServerInfo {
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: implementation,
            ..Default::default()
        }
    }

    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParams>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, ErrorData> {
        Ok(ListToolsResult::with_all_items(self.definitions()))
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParams,
        context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, ErrorData> {
        let request_id = context
            .extensions
            .get::<Parts>()
            .map(|parts| parts.headers.request_id().to_string())
            .unwrap_or_else(|| "unknown".to_string());
        tracing::debug!(request_id = %request_id, tool = %request.name, "Tool call");

        self.call(request, &request_id).await
    }
}

/// Tower service answering the tool protocol for `server`.
pub fn streamable_service(server: ToolServer) -> StreamableHttpService<ToolServer, LocalSessionManager> {
    let config = StreamableHttpServerConfig {
        stateful_mode: false,
        ..Default::default()
    };
    StreamableHttpService::new(
        move || Ok(server.clone()),
        Arc::new(LocalSessionManager::default()),
        config,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use rmcp::model::{ErrorCode, JsonObject};
    use serde_json::{json, Value};

    use crate::mcp::tool::Tool;

    struct Echo;

    #[async_trait]
    impl Tool for Echo {
        fn definition(&self) -> ToolDefinition {
            let schema = match json!({
                "type": "object",
                "properties": { "text": { "type": "string" } },
                "required": ["text"],
            }) {
                Value::Object(map) => map,
                _ => unreachable!(),
            };
            ToolDefinition::new("echo", "Echo the text argument", Arc::new(schema))
        }

        async fn call(&self, arguments: &JsonObject) -> Result<CallToolResult, ToolError> {
            match arguments.get("text").and_then(Value::as_str) {
                Some("fail") => Err(ToolError::Execution("boom".into())),
                Some(text) => Ok(CallToolResult::success(vec![Content::text(text)])),
                None => Err(ToolError::InvalidArguments("missing 'text'".into())),
            }
        }
    }

    fn server() -> ToolServer {
        ToolServer::new("test-server", ToolRegistry::new().with(Echo))
    }

    fn params(name: &str, arguments: Option<Value>) -> CallToolRequestParams {
        CallToolRequestParams {
            meta: None,
            name: name.to_owned().into(),
            arguments: arguments.and_then(|v| v.as_object().cloned()),
            task: None,
        }
    }

    fn text(result: &CallToolResult) -> String {
        result
            .content
            .iter()
            .filter_map(|c| c.as_text())
            .map(|t| t.text.as_str())
            .collect()
    }

    #[test]
    fn info_reports_name_and_tools_capability() {
        let info = server().get_info();
        assert_eq!(info.server_info.name, "test-server");
        assert_eq!(info.server_info.version, env!("CARGO_PKG_VERSION"));
        assert!(info.capabilities.tools.is_some());
    }

    #[test]
    fn definitions_include_schema() {
        let tools = server().definitions();
        assert_eq!(tools.len(), 1);
        assert_eq!(tools[0].name, "echo");
        assert_eq!(tools[0].input_schema["required"][0], "text");
    }

    #[tokio::test]
    async fn call_success_and_failure() {
        let ok = server()
            .call(params("echo", Some(json!({"text": "hi"}))), "test")
            .await
            .unwrap();
        assert_eq!(ok.is_error, Some(false));
        assert_eq!(text(&ok), "hi");

        let failed = server()
            .call(params("echo", Some(json!({"text": "fail"}))), "test")
            .await
            .unwrap();
        assert_eq!(failed.is_error, Some(true));
        assert_eq!(text(&failed), "boom");
    }

    #[tokio::test]
    async fn call_param_errors() {
        let unknown = server().call(params("nope", None), "test").await.unwrap_err();
        assert_eq!(unknown.code, ErrorCode::INVALID_PARAMS);

        let bad_args = server()
            .call(params("echo", Some(json!({}))), "test")
            .await
            .unwrap_err();
        assert_eq!(bad_args.code, ErrorCode::INVALID_PARAMS);

        let no_args = server().call(params("echo", None), "test").await.unwrap_err();
        assert_eq!(no_args.code, ErrorCode::INVALID_PARAMS);
    }
}
