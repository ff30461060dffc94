use std::collections::{HashMap, HashSet};

use chart_core::Tool;
use chart_error::{Error, Result};

use crate::{
    chart_type::ChartType,
    schema::{Schema, charts::schema_for},
};

/// One tool per chart type: what the client sees and what arguments it must send.
#[derive(Debug)]
pub struct ChartTool {
    pub tool_name: &'static str,
    pub chart_type: ChartType,
    pub description: &'static str,
    pub schema: Schema,
}

impl ChartTool {
    fn new(chart_type: ChartType) -> Self {
        Self {
            tool_name: chart_type.tool_name(),
            chart_type,
            description: chart_type.description(),
            schema: schema_for(chart_type),
        }
    }

    pub fn to_tool(&self) -> Tool {
        Tool::new(self.tool_name, self.description, self.schema.to_json_schema())
    }
}

/// Name to tool lookup, built once at startup. Disabled tools are neither listed nor callable.
#[derive(Debug)]
pub struct ToolRegistry {
    tools: Vec<ChartTool>,
    by_name: HashMap<&'static str, usize>,
    disabled: HashSet<String>,
}

impl ToolRegistry {
    pub fn new<I, S>(disabled: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let tools: Vec<ChartTool> = ChartType::ALL.into_iter().map(ChartTool::new).collect();

        let mut by_name = HashMap::with_capacity(tools.len());
        let mut chart_types = HashSet::with_capacity(tools.len());
        for (index, tool) in tools.iter().enumerate() {
            if by_name.insert(tool.tool_name, index).is_some() {
                return Err(Error::Startup(format!(
                    "duplicate tool name '{}'",
                    tool.tool_name
                )));
            }
            if !chart_types.insert(tool.chart_type) {
                return Err(Error::Startup(format!(
                    "duplicate chart type '{}'",
                    tool.chart_type
                )));
            }
            tool.schema.check()?;
        }

        let disabled: HashSet<String> = disabled.into_iter().map(Into::into).collect();
        for name in &disabled {
            if !by_name.contains_key(name.as_str()) {
                tracing::warn!(tool = %name, "Disabled tool does not exist");
            }
        }

        tracing::debug!(
            total = tools.len(),
            disabled = disabled.len(),
            "Tool registry built"
        );

        Ok(Self {
            tools,
            by_name,
            disabled,
        })
    }

    fn is_enabled(&self, name: &str) -> bool {
        !self.disabled.contains(name)
    }

    pub fn list_tools(&self) -> Vec<Tool> {
        self.tools
            .iter()
            .filter(|t| self.is_enabled(t.tool_name))
            .map(ChartTool::to_tool)
            .collect()
    }

    pub fn resolve(&self, name: &str) -> Result<&ChartTool> {
        self.by_name
            .get(name)
            .filter(|_| self.is_enabled(name))
            .map(|&index| &self.tools[index])
            .ok_or_else(|| Error::ToolNotFound(name.to_string()))
    }
}
