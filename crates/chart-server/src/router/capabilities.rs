use crate::core::protocol::capabilities::{ServerCapabilities, ToolsCapability};

/// Builder for the capabilities a router announces during `initialize`.
#[derive(Default)]
pub struct CapabilitiesBuilder {
    tools: Option<ToolsCapability>,
}

impl CapabilitiesBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tools(mut self, list_changed: bool) -> Self {
        self.tools = Some(ToolsCapability {
            list_changed: Some(list_changed),
        });
        self
    }

    pub fn build(self) -> ServerCapabilities {
        ServerCapabilities {
            tools: self.tools,
            prompts: None,
            resources: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_tools_only() {
        let caps = CapabilitiesBuilder::new().with_tools(false).build();
        assert_eq!(
            serde_json::to_value(caps).unwrap(),
            json!({"tools": {"listChanged": false}})
        );
    }
}
