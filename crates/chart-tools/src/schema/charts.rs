//! Argument schema of every chart type.

use serde_json::{Value, json};

use super::{
    Field, Kind, Refinement, Schema,
    base::{self, TREE_NODE},
};
use crate::chart_type::ChartType;

pub fn schema_for(chart: ChartType) -> Schema {
    match chart {
        ChartType::Area => area(),
        ChartType::Bar => categorical(
            "Data for bar chart, it should be an array of objects, each object contains a `category` field and a `value` field, such as, [{ category: '分类一', value: 10 }], when grouping or stacking is needed for bar, the data should contain a `group` field, such as, when [{ category: '北京', value: 825, group: '油车' }, { category: '北京', value: 1000, group: '电车' }].",
            ChartType::Bar,
        ),
        ChartType::Column => categorical(
            "Data for column chart, it should be an array of objects, each object contains a `category` field and a `value` field, such as, [{ category: '分类一', value: 10 }], when grouping or stacking is needed for column, the data should contain a `group` field, such as, when [{ category: '北京', value: 825, group: '油车' }, { category: '北京', value: 1000, group: '电车' }].",
            ChartType::Column,
        ),
        ChartType::Boxplot => boxplot(),
        ChartType::DualAxes => dual_axes(),
        ChartType::FishboneDiagram => tree(
            "Data for fishbone diagram chart, such as, { name: 'main topic', children: [{ name: 'topic 1', children: [{ name: 'subtopic 1-1' }] }.",
        ),
        ChartType::FlowDiagram => graph(
            "Data for flow diagram chart, such as, { nodes: [{ name: 'node1' }, { name: 'node2' }], edges: [{ source: 'node1', target: 'node2', name: 'edge1' }] }.",
        ),
        ChartType::Histogram => histogram(),
        ChartType::Line => line(),
        ChartType::MindMap => tree(
            "Data for mind map chart, such as, { name: 'main topic', children: [{ name: 'topic 1', children: [{ name:'subtopic 1-1' }] }.",
        ),
        ChartType::NetworkGraph => graph(
            "Data for network graph chart, such as, { nodes: [{ name: 'node1' }, { name: 'node2' }], edges: [{ source: 'node1', target: 'node2', name: 'edge1' }] }",
        ),
        ChartType::PathMap => path_map(),
        ChartType::Pie => pie(),
        ChartType::Radar => radar(),
        ChartType::Sankey => sankey(),
        ChartType::Scatter => scatter(),
        ChartType::Treemap => treemap(),
        ChartType::Waterfall => waterfall(),
        ChartType::WordCloud => word_cloud(),
    }
}

/// A small argument object that satisfies the schema of `chart`.
pub fn example_arguments(chart: ChartType) -> Value {
    match chart {
        ChartType::Area | ChartType::Line => json!({
            "data": [{"time": "2015", "value": 23}, {"time": "2016", "value": 32}]
        }),
        ChartType::Bar | ChartType::Column | ChartType::Boxplot => json!({
            "data": [{"category": "A", "value": 10}, {"category": "B", "value": 20}]
        }),
        ChartType::DualAxes => json!({
            "categories": ["2015", "2016"],
            "series": [{"type": "column", "data": [91.9, 99.1]}, {"type": "line", "data": [0.05, 0.06]}]
        }),
        ChartType::FishboneDiagram | ChartType::MindMap => json!({
            "data": {"name": "root", "children": [{"name": "a"}, {"name": "b"}]}
        }),
        ChartType::FlowDiagram | ChartType::NetworkGraph => json!({
            "data": {
                "nodes": [{"name": "a"}, {"name": "b"}],
                "edges": [{"source": "a", "target": "b", "name": "next"}]
            }
        }),
        ChartType::Histogram => json!({"data": [78, 88, 60, 100, 95]}),
        ChartType::PathMap => json!({
            "title": "西安一日游",
            "data": [{"data": ["西安钟楼", "西安大雁塔"]}]
        }),
        ChartType::Pie => json!({
            "data": [{"category": "A", "value": 10}, {"category": "B", "value": 20}]
        }),
        ChartType::Radar => json!({
            "data": [{"name": "Design", "value": 70}, {"name": "Speed", "value": 60}]
        }),
        ChartType::Sankey => json!({
            "data": [{"source": "Landing", "target": "Cart", "value": 50}]
        }),
        ChartType::Scatter => json!({"data": [{"x": 10, "y": 15}]}),
        ChartType::Treemap => json!({
            "data": [{"name": "Design", "value": 70, "children": [{"name": "Tech", "value": 20}]}]
        }),
        ChartType::Waterfall => json!({
            "data": [{"category": "Initial", "value": 100}, {"category": "Total", "isTotal": true}]
        }),
        ChartType::WordCloud => json!({"data": [{"text": "形成", "value": 4.272}]}),
    }
}

fn with(mut head: Vec<Field>, tail: Vec<Field>) -> Vec<Field> {
    head.extend(tail);
    head
}

fn time_series_style() -> Field {
    base::style(vec![
        base::background_color(),
        base::line_width(),
        base::palette(),
        base::texture(),
    ])
}

fn area() -> Schema {
    let point = Kind::object(vec![
        Field::new("time", Kind::String),
        Field::new("value", Kind::Number),
        Field::new("group", Kind::String).optional(),
    ]);
    Schema::new(with(
        vec![
            Field::new("data", Kind::array(point)).describe(
                "Data for area chart, it should be an array of objects, each object contains a `time` field and a `value` field, such as, [{ time: '2015', value: 23 }, { time: '2016', value: 32 }], when stacking is needed for area, the data should contain a `group` field, such as, [{ time: '2015', value: 23, group: 'A' }, { time: '2015', value: 32, group: 'B' }].",
            ),
            Field::new("stack", Kind::Boolean).optional().describe(
                "Whether stacking is enabled. When enabled, area charts require a 'group' field in the data.",
            ),
            time_series_style(),
        ],
        with(
            base::dimensions(),
            vec![base::axis_x_title(), base::axis_y_title()],
        ),
    ))
}

fn line() -> Schema {
    let point = Kind::object(vec![
        Field::new("time", Kind::String),
        Field::new("value", Kind::Number),
        Field::new("group", Kind::String).optional(),
    ]);
    Schema::new(with(
        vec![
            Field::new("data", Kind::array(point))
                .describe("Data for line chart, it should be an array of objects, each object contains a `time` field and a `value` field, such as, [{ time: '2015', value: 23 }, { time: '2016', value: 32 }]."),
            Field::new("stack", Kind::Boolean).optional().describe(
                "Whether stacking is enabled. When enabled, line charts require a 'group' field in the data.",
            ),
            time_series_style(),
        ],
        with(
            base::dimensions(),
            vec![base::axis_x_title(), base::axis_y_title()],
        ),
    ))
}

/// Bar and column charts share one shape.
fn categorical(data_description: &'static str, chart: ChartType) -> Schema {
    let record = Kind::object(vec![
        Field::new("category", Kind::String),
        Field::new("value", Kind::Number),
        Field::new("group", Kind::String).optional(),
    ]);
    let (group_description, stack_description) = match chart {
        ChartType::Bar => (
            "Whether grouping is enabled. When enabled, bar charts require a 'group' field in the data. When `group` is true, `stack` should be false.",
            "Whether stacking is enabled. When enabled, bar charts require a 'group' field in the data. When `stack` is true, `group` should be false.",
        ),
        _ => (
            "Whether grouping is enabled. When enabled, column charts require a 'group' field in the data. When `group` is true, `stack` should be false.",
            "Whether stacking is enabled. When enabled, column charts require a 'group' field in the data. When `stack` is true, `group` should be false.",
        ),
    };
    Schema::new(with(
        vec![
            Field::new("data", Kind::array(record)).describe(data_description),
            Field::new("group", Kind::Boolean)
                .optional()
                .describe(group_description),
            Field::new("stack", Kind::Boolean)
                .optional()
                .describe(stack_description),
            base::full_style(),
        ],
        with(
            base::dimensions(),
            vec![base::axis_x_title(), base::axis_y_title()],
        ),
    ))
}

fn boxplot() -> Schema {
    let record = Kind::object(vec![
        Field::new("category", Kind::String)
            .describe("Category of the data point, such as '分类一'."),
        Field::new("value", Kind::Number).describe("Value of the data point, such as 10."),
        Field::new("group", Kind::String).optional().describe(
            "Optional group for the data point, used for grouping in the boxplot.",
        ),
    ]);
    Schema::new(with(
        vec![
            Field::new("data", Kind::non_empty_array(record)).describe(
                "Data for boxplot chart, such as, [{ category: '分类一', value: 10 }] or [{ category: '分类二', value: 20, group: '组别一' }].",
            ),
            base::full_style(),
        ],
        with(
            base::dimensions(),
            vec![base::axis_x_title(), base::axis_y_title()],
        ),
    ))
}

fn dual_axes() -> Schema {
    let series = Kind::object(vec![
        Field::new("type", Kind::Enum(&["column", "line"]))
            .describe("The optional value can be 'column' or 'line'."),
        Field::new("data", Kind::array(Kind::Number)).describe(
            "When type is column, the data represents quantities, such as [91.9, 99.1, 101.6, 114.4, 121]. When type is line, the data represents ratios and its values are recommended to be less than 1, such as [0.055, 0.06, 0.062, 0.07, 0.075].",
        ),
        Field::new("axisYTitle", Kind::String)
            .default(json!(""))
            .describe("Set the y-axis title of the chart series, such as, axisYTitle: '销售额'."),
    ]);
    Schema::new(with(
        vec![
            Field::new("categories", Kind::non_empty_array(Kind::String)).describe(
                "Categories for dual axes chart, such as, ['2015', '2016', '2017'].",
            ),
            Field::new("series", Kind::non_empty_array(series)).describe(
                "Series for dual axes chart, such as, [{ type: 'column', data: [91.9, 99.1, 101.6, 114.4, 121], axisYTitle: '销售额' }, { type: 'line', data: [0.055, 0.06, 0.062, 0.07, 0.075], 'axisYTitle': '利润率' }].",
            ),
            base::full_style(),
        ],
        with(base::dimensions(), vec![base::axis_x_title()]),
    ))
}

/// Mind maps and fishbone diagrams: one recursive tree with unique names.
fn tree(data_description: &'static str) -> Schema {
    Schema::new(vec![
        Field::new("data", Kind::Ref(TREE_NODE)).describe(data_description),
        base::style(vec![base::texture()]),
        base::theme(),
        base::width(),
        base::height(),
    ])
    .define(TREE_NODE, base::named_tree_node())
    .refine(Refinement::TreeNames("data"))
}

/// Network graphs and flow diagrams.
fn graph(data_description: &'static str) -> Schema {
    let data = Kind::object(vec![
        Field::new("nodes", Kind::non_empty_array(base::graph_node())),
        Field::new("edges", Kind::array(base::graph_edge())),
    ]);
    Schema::new(vec![
        Field::new("data", data).describe(data_description),
        base::style(vec![base::texture()]),
        base::theme(),
        base::width(),
        base::height(),
    ])
    .refine(Refinement::Graph("data"))
}

fn histogram() -> Schema {
    Schema::new(with(
        vec![
            Field::new("data", Kind::non_empty_array(Kind::Number)).describe(
                "Data for histogram chart, it should be an array of numbers, such as, [78, 88, 60, 100, 95].",
            ),
            Field::new("binNumber", Kind::Integer)
                .nullable()
                .default(Value::Null)
                .describe(
                    "Number of intervals to define the number of intervals in a histogram, when not specified, a default value will be used.",
                ),
            base::full_style(),
        ],
        with(
            base::dimensions(),
            vec![base::axis_x_title(), base::axis_y_title()],
        ),
    ))
}

fn path_map() -> Schema {
    let route = Kind::object(vec![
        Field::new("data", base::pois()).describe(base::POIS_DESCRIPTION),
    ]);
    Schema::new(vec![
        base::map_title(),
        Field::new("data", Kind::non_empty_array(route)).describe(
            "Routes, each group represents all POIs along a route. For example, [{ \"data\": [\"西安钟楼\", \"西安大唐不夜城\", \"西安大雁塔\"] }, { \"data\": [\"西安曲江池公园\", \"西安回民街\"] }]",
        ),
        base::map_width(),
        base::map_height(),
    ])
}

fn pie() -> Schema {
    let record = Kind::object(vec![
        Field::new("category", Kind::String),
        Field::new("value", Kind::Number),
    ]);
    Schema::new(with(
        vec![
            Field::new("data", Kind::non_empty_array(record)).describe(
                "Data for pie chart, it should be an array of objects, each object contains a `category` field and a `value` field, such as, [{ category: '分类一', value: 27 }].",
            ),
            Field::new("innerRadius", Kind::Number).default(json!(0)).describe(
                "Set the innerRadius of pie chart, the value between 0 and 1. Set the pie chart as a donut chart. Set the value to 0.6 or number in [0 ,1] to enable it.",
            ),
            base::full_style(),
        ],
        base::dimensions(),
    ))
}

fn radar() -> Schema {
    let record = Kind::object(vec![
        Field::new("name", Kind::String),
        Field::new("value", Kind::Number),
        Field::new("group", Kind::String).optional(),
    ]);
    Schema::new(with(
        vec![
            Field::new("data", Kind::non_empty_array(record)).describe(
                "Data for radar chart, it should be an array of objects, each object contains a `name` field and a `value` field, such as, [{ name: 'Design', value: 70 }], when the data is grouped, each object should contain a `group` field.",
            ),
            base::style(vec![
                base::background_color(),
                base::line_width(),
                base::palette(),
                base::texture(),
            ]),
        ],
        base::dimensions(),
    ))
}

fn sankey() -> Schema {
    let flow = Kind::object(vec![
        Field::new("source", Kind::String),
        Field::new("target", Kind::String),
        Field::new("value", Kind::Number),
    ]);
    Schema::new(with(
        vec![
            Field::new("data", Kind::non_empty_array(flow)).describe(
                "Date for sankey chart, such as, [{ source: 'Landing Page', target: 'Product Page', value: 50000 }, { source: 'Product Page', target: 'Add to Cart', value: 35000 }, { source: 'Add to Cart', target: 'Checkout', value: 25000 }, { source: 'Checkout', target: 'Payment', value: 15000 }, { source: 'Payment', target: 'Purchase Completed', value: 8000 }].",
            ),
            Field::new("nodeAlign", Kind::Enum(&["left", "right", "justify", "center"]))
                .default(json!("center"))
                .describe(
                    "Alignment of nodes in the sankey chart, such as, 'left', 'right', 'justify', or 'center'.",
                ),
            base::full_style(),
        ],
        base::dimensions(),
    ))
}

fn scatter() -> Schema {
    let point = Kind::object(vec![
        Field::new("x", Kind::Number),
        Field::new("y", Kind::Number),
    ]);
    Schema::new(with(
        vec![
            Field::new("data", Kind::non_empty_array(point))
                .describe("Data for scatter chart, such as, [{ x: 10, y: 15 }]."),
            base::full_style(),
        ],
        with(
            base::dimensions(),
            vec![base::axis_x_title(), base::axis_y_title()],
        ),
    ))
}

fn treemap() -> Schema {
    Schema::new(with(
        vec![
            Field::new("data", Kind::non_empty_array(Kind::Ref(TREE_NODE))).describe(
                "Data for treemap chart, such as, [{ name: 'Design', value: 70, children: [{ name: 'Tech', value: 20 }] }].",
            ),
            base::full_style(),
        ],
        base::dimensions(),
    ))
    .define(TREE_NODE, base::valued_tree_node())
}

fn waterfall() -> Schema {
    let step = Kind::object(vec![
        Field::new("category", Kind::String),
        Field::new("value", Kind::Number).optional(),
        Field::new("isIntermediateTotal", Kind::Boolean).optional(),
        Field::new("isTotal", Kind::Boolean).optional(),
    ]);
    Schema::new(with(
        vec![
            Field::new("data", Kind::non_empty_array(step)).describe(
                "Data for waterfall chart, it should be an array of objects, each object contains a `category` field and a `value` field. The `isIntermediateTotal` field marks intermediate subtotals, and the `isTotal` field marks the final total. For example, [{ category: 'Initial', value: 100 }, { category: 'Increase', value: 50 }, { category: 'Subtotal', isIntermediateTotal: true }, { category: 'Decrease', value: -30 }, { category: 'Total', isTotal: true }].",
            ),
            Field::new("positiveColor", Kind::String).optional().describe(
                "Color for positive values (increases), such as '#FF4D4F'. Default is red.",
            ),
            Field::new("negativeColor", Kind::String).optional().describe(
                "Color for negative values (decreases), such as '#2EBB59'. Default is green.",
            ),
            Field::new("totalColor", Kind::String).optional().describe(
                "Color for total and intermediate total bars, such as '#1783FF'. Default is blue.",
            ),
            base::style(vec![base::background_color(), base::texture()]),
        ],
        with(
            base::dimensions(),
            vec![base::axis_x_title(), base::axis_y_title()],
        ),
    ))
}

fn word_cloud() -> Schema {
    let word = Kind::object(vec![
        Field::new("text", Kind::String),
        Field::new("value", Kind::Number),
    ]);
    Schema::new(with(
        vec![
            Field::new("data", Kind::non_empty_array(word)).describe(
                "Data for word cloud chart, it should be an array of objects, each object contains a `text` field and a `value` field, such as, [{ value: 4.272, text: '形成' }].",
            ),
            base::full_style(),
        ],
        base::dimensions(),
    ))
}
