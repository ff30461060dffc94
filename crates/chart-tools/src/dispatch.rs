use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use chart_core::{Tool, content::Content, protocol::capabilities::ServerCapabilities};
use chart_error::{Error, Result};
use chart_server::{CapabilitiesBuilder, Router};
use serde_json::{Map, Value};

use crate::{
    generate::{GenerateStrategy, GenerationRequest},
    registry::ToolRegistry,
};

const SERVER_NAME: &str = "mcp-server-chart";
const INSTRUCTIONS: &str = "Generates charts from structured data. Pick the generate_* tool \
matching the chart you need; each call returns a URL or file path to the rendered chart.";

/// Validate-then-generate pipeline behind `tools/call`.
pub struct ChartDispatcher {
    registry: Arc<ToolRegistry>,
    strategy: Arc<dyn GenerateStrategy>,
    timeout: Duration,
}

impl ChartDispatcher {
    pub fn new(
        registry: Arc<ToolRegistry>,
        strategy: Arc<dyn GenerateStrategy>,
        timeout: Duration,
    ) -> Self {
        Self {
            registry,
            strategy,
            timeout,
        }
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    /// Returns the artifact locator. Every call regenerates; nothing is cached.
    pub async fn call_tool(&self, name: &str, arguments: Value) -> Result<String> {
        let tool = self.registry.resolve(name)?;

        let arguments = match arguments {
            Value::Null => Value::Object(Map::new()),
            other => other,
        };
        let args = tool
            .schema
            .validate(&arguments)
            .map_err(|issues| Error::InvalidParameters(issues.join("; ")))?;

        let request = GenerationRequest::new(tool.chart_type, args);
        tracing::debug!(
            tool = name,
            strategy = self.strategy.name(),
            "Generating chart"
        );

        match tokio::time::timeout(self.timeout, self.strategy.generate(&request)).await {
            Ok(Ok(locator)) => Ok(locator),
            Ok(Err(e)) if e.is_classified() => Err(e),
            Ok(Err(e)) => Err(Error::Internal(format!("Failed to generate chart: {e}"))),
            Err(_) => Err(Error::GenerationTimeout(self.timeout.as_secs())),
        }
    }
}

/// Exposes the chart tools through the MCP server router.
pub struct ChartRouter {
    dispatcher: ChartDispatcher,
}

impl ChartRouter {
    pub fn new(dispatcher: ChartDispatcher) -> Self {
        Self { dispatcher }
    }
}

#[async_trait]
impl Router for ChartRouter {
    fn name(&self) -> String {
        SERVER_NAME.to_string()
    }

    fn version(&self) -> String {
        env!("CARGO_PKG_VERSION").to_string()
    }

    fn instructions(&self) -> Option<String> {
        Some(INSTRUCTIONS.to_string())
    }

    fn capabilities(&self) -> ServerCapabilities {
        CapabilitiesBuilder::new().with_tools(false).build()
    }

    fn list_tools(&self) -> Vec<Tool> {
        self.dispatcher.registry().list_tools()
    }

    async fn call_tool(&self, tool_name: &str, arguments: Value) -> Result<Vec<Content>> {
        match self.dispatcher.call_tool(tool_name, arguments).await {
            Ok(locator) => {
                tracing::info!(tool = tool_name, locator = %locator, "Chart generated");
                Ok(vec![Content::text(locator)])
            }
            Err(e) => {
                tracing::warn!(tool = tool_name, error = %e, "Chart tool call failed");
                Err(e)
            }
        }
    }
}
