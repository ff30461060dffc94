use std::fmt;

/// Every chart the server can generate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChartType {
    Area,
    Bar,
    Boxplot,
    Column,
    DualAxes,
    FishboneDiagram,
    FlowDiagram,
    Histogram,
    Line,
    MindMap,
    NetworkGraph,
    PathMap,
    Pie,
    Radar,
    Sankey,
    Scatter,
    Treemap,
    Waterfall,
    WordCloud,
}

impl ChartType {
    pub const ALL: [ChartType; 19] = [
        ChartType::Area,
        ChartType::Bar,
        ChartType::Boxplot,
        ChartType::Column,
        ChartType::DualAxes,
        ChartType::FishboneDiagram,
        ChartType::FlowDiagram,
        ChartType::Histogram,
        ChartType::Line,
        ChartType::MindMap,
        ChartType::NetworkGraph,
        ChartType::PathMap,
        ChartType::Pie,
        ChartType::Radar,
        ChartType::Sankey,
        ChartType::Scatter,
        ChartType::Treemap,
        ChartType::Waterfall,
        ChartType::WordCloud,
    ];

    /// Short key sent to renderers as the `type` option.
    pub fn as_str(self) -> &'static str {
        match self {
            ChartType::Area => "area",
            ChartType::Bar => "bar",
            ChartType::Boxplot => "boxplot",
            ChartType::Column => "column",
            ChartType::DualAxes => "dual-axes",
            ChartType::FishboneDiagram => "fishbone-diagram",
            ChartType::FlowDiagram => "flow-diagram",
            ChartType::Histogram => "histogram",
            ChartType::Line => "line",
            ChartType::MindMap => "mind-map",
            ChartType::NetworkGraph => "network-graph",
            ChartType::PathMap => "path-map",
            ChartType::Pie => "pie",
            ChartType::Radar => "radar",
            ChartType::Sankey => "sankey",
            ChartType::Scatter => "scatter",
            ChartType::Treemap => "treemap",
            ChartType::Waterfall => "waterfall",
            ChartType::WordCloud => "word-cloud",
        }
    }

    pub fn tool_name(self) -> &'static str {
        match self {
            ChartType::Area => "generate_area_chart",
            ChartType::Bar => "generate_bar_chart",
            ChartType::Boxplot => "generate_boxplot_chart",
            ChartType::Column => "generate_column_chart",
            ChartType::DualAxes => "generate_dual_axes_chart",
            ChartType::FishboneDiagram => "generate_fishbone_diagram",
            ChartType::FlowDiagram => "generate_flow_diagram",
            ChartType::Histogram => "generate_histogram_chart",
            ChartType::Line => "generate_line_chart",
            ChartType::MindMap => "generate_mind_map",
            ChartType::NetworkGraph => "generate_network_graph",
            ChartType::PathMap => "generate_path_map",
            ChartType::Pie => "generate_pie_chart",
            ChartType::Radar => "generate_radar_chart",
            ChartType::Sankey => "generate_sankey_chart",
            ChartType::Scatter => "generate_scatter_chart",
            ChartType::Treemap => "generate_treemap_chart",
            ChartType::Waterfall => "generate_waterfall_chart",
            ChartType::WordCloud => "generate_word_cloud_chart",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            ChartType::Area => {
                "Generate a area chart to show data trends under continuous independent variables and observe the overall data trend, such as, displacement = velocity (average or instantaneous) × time: s = v × t. If the x-axis is time (t) and the y-axis is velocity (v) at each moment, an area chart allows you to observe the trend of velocity over time and infer the distance traveled by the area's size."
            }
            ChartType::Bar => {
                "Generate a bar chart to show data for numerical comparisons among different categories, such as, comparing categorical data and for horizontal comparisons."
            }
            ChartType::Boxplot => {
                "Generate a boxplot chart to show data for statistical summaries among different categories, such as, comparing the distribution of data points across categories."
            }
            ChartType::Column => {
                "Generate a column chart, which are best for comparing categorical data, such as, when values are close, column charts are preferable because our eyes are better at judging height than other visual elements like area or angles."
            }
            ChartType::DualAxes => {
                "Generate a dual axes chart which is a combination chart that integrates two different chart types, typically combining a bar chart with a line chart to display both the trend and comparison of data, such as, the trend of sales and profit over time."
            }
            ChartType::FishboneDiagram => {
                "Generate a fishbone diagram chart to uses a fish skeleton, like structure to display the causes or effects of a core problem, with the problem as the fish head and the causes/effects as the fish bones. It suits problems that can be split into multiple related factors."
            }
            ChartType::FlowDiagram => {
                "Generate a flow diagram chart to show the steps and decision points of a process or system, such as, scenarios requiring linear process presentation."
            }
            ChartType::Histogram => {
                "Generate a histogram chart to show the frequency of data points within a certain range. It can observe data distribution, such as, normal and skewed distributions, and identify data concentration areas and extreme points."
            }
            ChartType::Line => {
                "Generate a line chart to show trends over time, such as, the ratio of Apple computer sales to Apple's profits changed from 2000 to 2016."
            }
            ChartType::MindMap => {
                "Generate a mind map chart to organizes and presents information in a hierarchical structure with branches radiating from a central topic, such as, a diagram showing the relationship between a main topic and its subtopics."
            }
            ChartType::NetworkGraph => {
                "Generate a network graph chart to show relationships (edges) between entities (nodes), such as, relationships between people in social networks."
            }
            ChartType::PathMap => {
                "Generate a route map to display the user's planned route, such as travel guide routes."
            }
            ChartType::Pie => {
                "Generate a pie chart to show the proportion of parts, such as, market share and budget allocation."
            }
            ChartType::Radar => {
                "Generate a radar chart to display multidimensional data (four dimensions or more), such as, evaluate Huawei and Apple phones in terms of five dimensions: ease of use, functionality, camera, benchmark scores, and battery life."
            }
            ChartType::Sankey => {
                "Generate a sankey chart to visualize the flow of data between different stages or categories, such as, the user journey from landing on a page to completing a purchase."
            }
            ChartType::Scatter => {
                "Generate a scatter chart to show the relationship between two variables, helps discover their relationship or trends, such as, the strength of correlation, data distribution patterns."
            }
            ChartType::Treemap => {
                "Generate a treemap chart to display hierarchical data and can intuitively show comparisons between items at the same level, such as, show disk space usage with treemap."
            }
            ChartType::Waterfall => {
                "Generate a waterfall chart to visualize the cumulative effect of sequentially introduced positive or negative values, such as showing how an initial value is affected by a series of intermediate positive or negative values leading to a final result. Waterfall charts are ideal for financial analysis, budget tracking, profit and loss statements, and understanding the composition of changes over time or categories."
            }
            ChartType::WordCloud => {
                "Generate a word cloud chart to show word frequency or weight through text size variation, such as, analyzing common words in social media, reviews, or feedback."
            }
        }
    }
}

impl fmt::Display for ChartType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn test_keys_and_tool_names_are_unique() {
        let keys: HashSet<_> = ChartType::ALL.iter().map(|c| c.as_str()).collect();
        let names: HashSet<_> = ChartType::ALL.iter().map(|c| c.tool_name()).collect();
        assert_eq!(keys.len(), ChartType::ALL.len());
        assert_eq!(names.len(), ChartType::ALL.len());
    }

    #[test]
    fn test_tool_name_pattern() {
        for chart in ChartType::ALL {
            let name = chart.tool_name();
            assert!(name.starts_with("generate_"), "{name}");
            assert!(
                name.ends_with("_chart")
                    || name.ends_with("_diagram")
                    || name.ends_with("_map")
                    || name.ends_with("_graph"),
                "{name}"
            );
        }
    }
}
