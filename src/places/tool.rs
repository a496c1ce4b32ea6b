//! `find_on_map` tool.

use std::sync::Arc;

use async_trait::async_trait;
use rmcp::model::{CallToolResult, Content, JsonObject, Tool as ToolDefinition};
use serde_json::{json, Value};

use crate::mcp::{Tool, ToolError};
use crate::places::client::{PlacesClient, PlacesError};

pub const TOOL_NAME: &str = "find_on_map";

const DESCRIPTION: &str = "Uses the Google Places API to find locations based on a specific text query. \
The query should include a specific location (e.g. \"Italian restaurant in Paris\", \"Museum in Tokyo\"); \
queries like \"near me\" have no location context on the server. Returns a JSON array of places with \
their name, address, Google Maps directions link and, when available, an image URL.";

pub struct FindOnMapTool {
    client: Arc<PlacesClient>,
}

impl FindOnMapTool {
    pub fn new(client: Arc<PlacesClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Tool for FindOnMapTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new(TOOL_NAME, DESCRIPTION, Arc::new(input_schema()))
    }

    async fn call(&self, arguments: &JsonObject) -> Result<CallToolResult, ToolError> {
        let query = arguments
            .get("query")
            .and_then(Value::as_str)
            .ok_or_else(|| ToolError::InvalidArguments("missing or invalid 'query' parameter".into()))?;

        match self.client.search(query).await {
            Ok(places) => serde_json::to_string(&places)
                .map(|text| CallToolResult::success(vec![Content::text(text)]))
                .map_err(|e| ToolError::Execution(e.to_string())),
            Err(PlacesError::Upstream { body, .. }) => Ok(CallToolResult::error(vec![Content::text(
                format!("Error in calling the tool: {}", body),
            )])),
            Err(e) => Err(ToolError::Execution(e.to_string())),
        }
    }
}

fn input_schema() -> JsonObject {
    let schema = json!({
        "type": "object",
        "properties": {
            "query": {
                "type": "string",
                "description": "The search term, including a specific location."
            }
        },
        "required": ["query"],
    });
    match schema {
        Value::Object(map) => map,
        _ => JsonObject::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_requires_query() {
        let schema = input_schema();
        assert_eq!(schema["type"], "object");
        assert_eq!(schema["required"], json!(["query"]));
        assert_eq!(schema["properties"]["query"]["type"], "string");
    }
}
