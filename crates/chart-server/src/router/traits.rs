use async_trait::async_trait;
use chart_core::{Tool, content::Content, protocol::capabilities::ServerCapabilities};
use chart_error::Result;
use serde_json::Value;

#[async_trait]
pub trait Router: Send + Sync {
    fn name(&self) -> String;

    fn version(&self) -> String;

    fn instructions(&self) -> Option<String> {
        None
    }

    fn capabilities(&self) -> ServerCapabilities;

    fn list_tools(&self) -> Vec<Tool>;

    /// Runs a tool. Errors are reported to the client as JSON-RPC errors.
    async fn call_tool(&self, tool_name: &str, arguments: Value) -> Result<Vec<Content>>;
}
