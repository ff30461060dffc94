use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::{
    core::{
        ToolCall,
        protocol::{
            constants::PROTOCOL_VERSION,
            message::{JsonRpcRequest, JsonRpcResponse},
            result::{CallToolResult, EmptyResult, Implementation, InitializeResult, ListToolsResult},
        },
    },
    error::{Error, Result},
    router::traits::Router,
};

/// Per-method request handlers, available on every [`Router`].
#[async_trait]
pub trait RouterExt: Router {
    async fn handle_initialize(&self, req: JsonRpcRequest) -> Result<JsonRpcResponse> {
        // Agree on the client's version when it names one.
        let protocol_version = req
            .params
            .as_ref()
            .and_then(|p| p.get("protocolVersion"))
            .and_then(Value::as_str)
            .unwrap_or(PROTOCOL_VERSION)
            .to_string();

        let result = InitializeResult {
            protocol_version,
            capabilities: self.capabilities(),
            server_info: Implementation {
                name: self.name(),
                version: self.version(),
            },
            instructions: self.instructions(),
        };

        Ok(JsonRpcResponse::success(req.id, serde_json::to_value(result)?))
    }

    async fn handle_ping(&self, req: JsonRpcRequest) -> Result<JsonRpcResponse> {
        Ok(JsonRpcResponse::success(
            req.id,
            serde_json::to_value(EmptyResult::default())?,
        ))
    }

    async fn handle_tools_list(&self, req: JsonRpcRequest) -> Result<JsonRpcResponse> {
        let result = ListToolsResult {
            tools: self.list_tools(),
            next_cursor: None,
        };
        Ok(JsonRpcResponse::success(req.id, serde_json::to_value(result)?))
    }

    async fn handle_tools_call(&self, req: JsonRpcRequest) -> Result<JsonRpcResponse> {
        let params = req
            .params
            .ok_or_else(|| Error::InvalidParameters("Missing parameters".into()))?;
        let call: ToolCall = serde_json::from_value(params)
            .map_err(|e| Error::InvalidParameters(format!("Malformed tool call: {e}")))?;

        let content = self.call_tool(&call.name, call.arguments).await?;
        let result = CallToolResult::success(content);
        Ok(JsonRpcResponse::success(req.id, serde_json::to_value(result)?))
    }

    /// The server exposes no resources or prompts, listing them yields nothing.
    async fn handle_empty_list(&self, req: JsonRpcRequest, key: &str) -> Result<JsonRpcResponse> {
        let mut result = Map::new();
        result.insert(key.to_string(), Value::Array(vec![]));
        Ok(JsonRpcResponse::success(req.id, Value::Object(result)))
    }
}

impl<R: Router + ?Sized> RouterExt for R {}
