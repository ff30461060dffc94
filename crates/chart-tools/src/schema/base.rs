//! Fields shared by several chart schemas, defined once so their descriptions stay in step.

use serde_json::json;

use super::{Field, Kind};

pub const THEMES: &[&str] = &["default", "academy", "dark"];
pub const TEXTURES: &[&str] = &["default", "rough"];

pub fn width() -> Field {
    Field::new("width", Kind::Number)
        .default(json!(600))
        .describe("Set the width of chart, default is 600.")
}

pub fn height() -> Field {
    Field::new("height", Kind::Number)
        .default(json!(400))
        .describe("Set the height of chart, default is 400.")
}

pub fn title() -> Field {
    Field::new("title", Kind::String)
        .optional()
        .describe("Set the title of chart.")
}

pub fn axis_x_title() -> Field {
    Field::new("axisXTitle", Kind::String)
        .optional()
        .describe("Set the x-axis title of chart.")
}

pub fn axis_y_title() -> Field {
    Field::new("axisYTitle", Kind::String)
        .optional()
        .describe("Set the y-axis title of chart.")
}

pub fn theme() -> Field {
    Field::new("theme", Kind::Enum(THEMES))
        .default(json!("default"))
        .describe("Set the theme for the chart, optional, default is 'default'.")
}

pub fn background_color() -> Field {
    Field::new("backgroundColor", Kind::String)
        .optional()
        .describe("Background color of the chart, such as, '#fff'.")
}

pub fn palette() -> Field {
    Field::new("palette", Kind::array(Kind::String))
        .optional()
        .describe("Color palette for the chart, it is a collection of colors.")
}

pub fn texture() -> Field {
    Field::new("texture", Kind::Enum(TEXTURES))
        .default(json!("default"))
        .describe(
            "Set the texture for the chart, optional, default is 'default'. 'rough' refers to hand-drawn style.",
        )
}

pub fn line_width() -> Field {
    Field::new("lineWidth", Kind::Number)
        .optional()
        .describe("Line width for the lines of chart, such as 4.")
}

/// Optional `style` object made of the given style fields.
pub fn style(fields: Vec<Field>) -> Field {
    Field::new("style", Kind::object(fields))
        .optional()
        .describe("Custom style configuration for the chart.")
}

/// `style` with background color, palette and texture, the common case for data charts.
pub fn full_style() -> Field {
    style(vec![background_color(), palette(), texture()])
}

/// Theme, size and title accepted by most charts.
pub fn dimensions() -> Vec<Field> {
    vec![theme(), width(), height(), title()]
}

pub fn map_title() -> Field {
    Field::new("title", Kind::String).describe(
        "The map title should not exceed 16 characters. The content should be consistent with the information the map wants to convey and should be accurate, rich, creative, and attractive.",
    )
}

pub fn map_width() -> Field {
    Field::new("width", Kind::Number)
        .default(json!(1600))
        .describe("Set the width of map, default is 1600.")
}

pub fn map_height() -> Field {
    Field::new("height", Kind::Number)
        .default(json!(1000))
        .describe("Set the height of map, default is 1000.")
}

pub fn pois() -> Kind {
    Kind::non_empty_array(Kind::String)
}

pub const POIS_DESCRIPTION: &str = "A list of keywords for the names of points of interest (POIs) in Chinese. These POIs usually contain a group of places with similar locations, so the names should be more descriptive, must adding attributives to indicate that they are different places in the same area, such as \"北京市\" is better than \"北京\", \"杭州西湖\" is better than \"西湖\"; in addition, if you can determine that a location may appear in multiple areas, you can be more specific, such as \"杭州西湖的苏堤春晓\" is better than \"苏堤春晓\". The tool will use these keywords to search for specific POIs and query their detailed data, such as latitude and longitude, location photos, etc.";

/// Node of a graph (`{name}`).
pub fn graph_node() -> Kind {
    Kind::object(vec![Field::new("name", Kind::String)])
}

/// Directed edge between two named nodes.
pub fn graph_edge() -> Kind {
    Kind::object(vec![
        Field::new("source", Kind::String),
        Field::new("target", Kind::String),
        Field::new("name", Kind::String).optional(),
    ])
}

/// Fields of the recursive `{name, children?}` node used by mind maps and fishbone diagrams.
pub fn named_tree_node() -> Vec<Field> {
    vec![
        Field::new("name", Kind::String),
        Field::new("children", Kind::array(Kind::Ref(TREE_NODE))).optional(),
    ]
}

/// Fields of the recursive `{name, value, children?}` treemap node.
pub fn valued_tree_node() -> Vec<Field> {
    vec![
        Field::new("name", Kind::String),
        Field::new("value", Kind::Number),
        Field::new("children", Kind::array(Kind::Ref(TREE_NODE))).optional(),
    ]
}

pub const TREE_NODE: &str = "node";
