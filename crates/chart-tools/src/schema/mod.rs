//! Declarative argument schemas. One [`Schema`] per chart type drives both argument
//! validation and the JSON Schema advertised through `tools/list`.

pub mod base;
pub mod charts;

use std::collections::BTreeMap;

use chart_error::{Error, Result};
use serde_json::{Map, Value, json};

use crate::validator::{self, GraphData, TreeNode};

const JSON_SCHEMA_DIALECT: &str = "https://json-schema.org/draft/2020-12/schema";

#[derive(Debug, Clone)]
pub enum Kind {
    String,
    Number,
    Integer,
    Boolean,
    Enum(&'static [&'static str]),
    Array { items: Box<Kind>, min_items: usize },
    Object(Shape),
    /// Reference to a named entry of [`Schema::definitions`], used for recursive nodes.
    Ref(&'static str),
}

impl Kind {
    pub fn array(items: Kind) -> Self {
        Kind::Array {
            items: Box::new(items),
            min_items: 0,
        }
    }

    pub fn non_empty_array(items: Kind) -> Self {
        Kind::Array {
            items: Box::new(items),
            min_items: 1,
        }
    }

    pub fn object(fields: Vec<Field>) -> Self {
        Kind::Object(Shape::new(fields))
    }

    fn type_name(&self) -> &'static str {
        match self {
            Kind::String | Kind::Enum(_) => "string",
            Kind::Number => "number",
            Kind::Integer => "integer",
            Kind::Boolean => "boolean",
            Kind::Array { .. } => "array",
            Kind::Object(_) | Kind::Ref(_) => "object",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Field {
    pub name: &'static str,
    pub kind: Kind,
    pub required: bool,
    pub nullable: bool,
    pub default: Option<Value>,
    pub description: Option<&'static str>,
}

impl Field {
    /// A required field.
    pub fn new(name: &'static str, kind: Kind) -> Self {
        Self {
            name,
            kind,
            required: true,
            nullable: false,
            default: None,
            description: None,
        }
    }

    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    /// Filled in when the field is absent; implies optional.
    pub fn default(mut self, value: Value) -> Self {
        self.default = Some(value);
        self.required = false;
        self
    }

    pub fn describe(mut self, description: &'static str) -> Self {
        self.description = Some(description);
        self
    }
}

/// Ordered list of fields of one JSON object.
#[derive(Debug, Clone, Default)]
pub struct Shape {
    pub fields: Vec<Field>,
}

impl Shape {
    pub fn new(fields: Vec<Field>) -> Self {
        Self { fields }
    }
}

/// Cross-record checks run after the field-level pass, on the named argument.
#[derive(Debug, Clone, Copy)]
pub enum Refinement {
    Graph(&'static str),
    TreeNames(&'static str),
}

impl Refinement {
    fn check(&self, args: &Map<String, Value>, issues: &mut Vec<String>) {
        match *self {
            Refinement::Graph(field) => {
                // Shape errors for this field were already reported.
                let Some(Ok(graph)) = args
                    .get(field)
                    .map(|v| serde_json::from_value::<GraphData>(v.clone()))
                else {
                    return;
                };
                if let Err(violations) = validator::validate_graph(&graph.nodes, &graph.edges) {
                    issues.extend(violations.iter().map(|v| format!("{field}: {v}")));
                }
            }
            Refinement::TreeNames(field) => {
                // Only `name` and `children` matter here; other keys on a node are ignored.
                let Some(root) = args.get(field).and_then(tree_node) else {
                    return;
                };
                if let Err(violation) = validator::validate_tree_names(&root) {
                    issues.push(format!("{field}: {violation}"));
                }
            }
        }
    }
}

/// Builds the name tree from a normalized node. `None` only when a `name` is not a string,
/// which the shape pass has already reported.
fn tree_node(value: &Value) -> Option<TreeNode> {
    let name = value.get("name")?.as_str()?.to_string();
    let children = match value.get("children") {
        Some(Value::Array(children)) => children.iter().map(tree_node).collect::<Option<_>>()?,
        _ => Vec::new(),
    };
    Some(TreeNode { name, children })
}

#[derive(Debug, Clone, Default)]
pub struct Schema {
    pub root: Shape,
    pub definitions: BTreeMap<&'static str, Shape>,
    pub refinements: Vec<Refinement>,
}

impl Schema {
    pub fn new(fields: Vec<Field>) -> Self {
        Self {
            root: Shape::new(fields),
            ..Default::default()
        }
    }

    pub fn define(mut self, name: &'static str, fields: Vec<Field>) -> Self {
        self.definitions.insert(name, Shape::new(fields));
        self
    }

    pub fn refine(mut self, refinement: Refinement) -> Self {
        self.refinements.push(refinement);
        self
    }

    /// Fails when a [`Kind::Ref`] points at a missing definition.
    pub fn check(&self) -> Result<()> {
        let mut shapes = vec![&self.root];
        shapes.extend(self.definitions.values());
        for shape in shapes {
            self.check_shape(shape)?;
        }
        Ok(())
    }

    fn check_shape(&self, shape: &Shape) -> Result<()> {
        shape
            .fields
            .iter()
            .try_for_each(|field| self.check_kind(&field.kind))
    }

    fn check_kind(&self, kind: &Kind) -> Result<()> {
        match kind {
            Kind::Ref(name) if !self.definitions.contains_key(name) => Err(Error::Startup(
                format!("schema references undefined node '{name}'"),
            )),
            Kind::Array { items, .. } => self.check_kind(items),
            Kind::Object(shape) => self.check_shape(shape),
            _ => Ok(()),
        }
    }

    /// Validates tool arguments in a single pass. On success returns the arguments with
    /// defaults filled in and undeclared keys kept; otherwise every issue found.
    pub fn validate(&self, input: &Value) -> std::result::Result<Map<String, Value>, Vec<String>> {
        let mut issues = Vec::new();

        let Some(object) = input.as_object() else {
            return Err(vec![format!(
                "arguments: Expected object, received {}",
                json_type(input)
            )]);
        };
        let args = self.validate_shape(&self.root, object, "", &mut issues);

        for refinement in &self.refinements {
            refinement.check(&args, &mut issues);
        }

        if issues.is_empty() {
            Ok(args)
        } else {
            Err(issues)
        }
    }

    fn validate_shape(
        &self,
        shape: &Shape,
        object: &Map<String, Value>,
        path: &str,
        issues: &mut Vec<String>,
    ) -> Map<String, Value> {
        let mut out = object.clone();

        for field in &shape.fields {
            let field_path = join_path(path, field.name);
            match object.get(field.name) {
                None => {
                    if let Some(default) = &field.default {
                        out.insert(field.name.to_string(), default.clone());
                    } else if field.required {
                        issues.push(format!("{field_path}: Required"));
                    }
                }
                Some(Value::Null) if field.nullable => {}
                Some(value) => {
                    let normalized = self.validate_kind(&field.kind, value, &field_path, issues);
                    out.insert(field.name.to_string(), normalized);
                }
            }
        }

        out
    }

    fn validate_kind(&self, kind: &Kind, value: &Value, path: &str, issues: &mut Vec<String>) -> Value {
        let mismatch = |issues: &mut Vec<String>| {
            issues.push(format!(
                "{path}: Expected {}, received {}",
                kind.type_name(),
                json_type(value)
            ));
            value.clone()
        };

        match kind {
            Kind::String if value.is_string() => value.clone(),
            Kind::Number if value.is_number() => value.clone(),
            Kind::Integer if value.is_i64() || value.is_u64() => value.clone(),
            Kind::Integer if value.as_f64().is_some_and(|f| f.fract() == 0.0) => value.clone(),
            Kind::Boolean if value.is_boolean() => value.clone(),
            Kind::Enum(allowed) => match value.as_str() {
                Some(s) if allowed.contains(&s) => value.clone(),
                _ => {
                    let expected = allowed
                        .iter()
                        .map(|a| format!("'{a}'"))
                        .collect::<Vec<_>>()
                        .join(" | ");
                    issues.push(format!(
                        "{path}: Invalid enum value. Expected {expected}, received {value}"
                    ));
                    value.clone()
                }
            },
            Kind::Array { items, min_items } => {
                let Some(elements) = value.as_array() else {
                    return mismatch(issues);
                };
                if elements.len() < *min_items {
                    issues.push(format!("{path}: must contain at least {min_items} item(s)"));
                }
                let normalized = elements
                    .iter()
                    .enumerate()
                    .map(|(i, element)| {
                        self.validate_kind(items, element, &format!("{path}[{i}]"), issues)
                    })
                    .collect();
                Value::Array(normalized)
            }
            Kind::Object(shape) => match value.as_object() {
                Some(object) => Value::Object(self.validate_shape(shape, object, path, issues)),
                None => mismatch(issues),
            },
            Kind::Ref(name) => match (self.definitions.get(name), value.as_object()) {
                (Some(shape), Some(object)) => {
                    Value::Object(self.validate_shape(shape, object, path, issues))
                }
                (None, _) => {
                    issues.push(format!("{path}: undefined schema node '{name}'"));
                    value.clone()
                }
                (_, None) => mismatch(issues),
            },
            _ => mismatch(issues),
        }
    }

    /// JSON Schema (draft 2020-12) for the `inputSchema` of a tool. Extra properties stay
    /// allowed, so no `additionalProperties` key is ever emitted.
    pub fn to_json_schema(&self) -> Value {
        let mut schema = shape_schema(&self.root);
        if let Value::Object(map) = &mut schema {
            map.insert("$schema".into(), json!(JSON_SCHEMA_DIALECT));
            if !self.definitions.is_empty() {
                let defs: Map<String, Value> = self
                    .definitions
                    .iter()
                    .map(|(name, shape)| (name.to_string(), shape_schema(shape)))
                    .collect();
                map.insert("$defs".into(), Value::Object(defs));
            }
        }
        schema
    }
}

fn shape_schema(shape: &Shape) -> Value {
    let mut properties = Map::new();
    let mut required = Vec::new();

    for field in &shape.fields {
        properties.insert(field.name.to_string(), field_schema(field));
        if field.required {
            required.push(json!(field.name));
        }
    }

    let mut schema = Map::new();
    schema.insert("type".into(), json!("object"));
    schema.insert("properties".into(), Value::Object(properties));
    if !required.is_empty() {
        schema.insert("required".into(), Value::Array(required));
    }
    Value::Object(schema)
}

fn field_schema(field: &Field) -> Value {
    let mut schema = kind_schema(&field.kind);
    if let Value::Object(map) = &mut schema {
        if field.nullable {
            if let Some(Value::String(ty)) = map.get("type").cloned() {
                map.insert("type".into(), json!([ty, "null"]));
            }
        }
        if let Some(description) = field.description {
            map.insert("description".into(), json!(description));
        }
        if let Some(default) = &field.default {
            map.insert("default".into(), default.clone());
        }
    }
    schema
}

fn kind_schema(kind: &Kind) -> Value {
    match kind {
        Kind::String => json!({"type": "string"}),
        Kind::Number => json!({"type": "number"}),
        Kind::Integer => json!({"type": "integer"}),
        Kind::Boolean => json!({"type": "boolean"}),
        Kind::Enum(values) => json!({"type": "string", "enum": values}),
        Kind::Array { items, min_items } => {
            let mut schema = json!({"type": "array", "items": kind_schema(items)});
            if *min_items > 0 {
                schema["minItems"] = json!(min_items);
            }
            schema
        }
        Kind::Object(shape) => shape_schema(shape),
        Kind::Ref(name) => json!({"$ref": format!("#/$defs/{name}")}),
    }
}

fn join_path(parent: &str, name: &str) -> String {
    if parent.is_empty() {
        name.to_string()
    } else {
        format!("{parent}.{name}")
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node_schema() -> Schema {
        Schema::new(vec![
            Field::new("data", Kind::Ref("node")).describe("Tree."),
            Field::new("width", Kind::Number).default(json!(600)),
            Field::new("bins", Kind::Integer).nullable().default(Value::Null),
        ])
        .define(
            "node",
            vec![
                Field::new("name", Kind::String),
                Field::new("children", Kind::array(Kind::Ref("node"))).optional(),
            ],
        )
        .refine(Refinement::TreeNames("data"))
    }

    #[test]
    fn test_defaults_filled_and_extra_keys_kept() {
        let args = node_schema()
            .validate(&json!({"data": {"name": "root"}, "extra": true}))
            .unwrap();
        assert_eq!(args["width"], json!(600));
        assert_eq!(args["bins"], Value::Null);
        assert_eq!(args["extra"], json!(true));
    }

    #[test]
    fn test_collects_every_issue() {
        let issues = node_schema()
            .validate(&json!({
                "data": {"children": [{"name": 1}]},
                "width": "wide",
                "bins": 2.5
            }))
            .unwrap_err();

        assert_eq!(
            issues,
            vec![
                "data.name: Required".to_string(),
                "data.children[0].name: Expected string, received number".to_string(),
                "width: Expected number, received string".to_string(),
                "bins: Expected integer, received number".to_string(),
            ]
        );
    }

    #[test]
    fn test_tree_names_checked_despite_extra_node_keys() {
        let issues = node_schema()
            .validate(&json!({
                "data": {
                    "name": "root",
                    "value": "big",
                    "children": [{"name": "x", "meta": [1, 2]}, {"name": "x", "value": null}]
                }
            }))
            .unwrap_err();
        assert_eq!(issues, vec!["data: node name 'x' is not unique.".to_string()]);
    }

    #[test]
    fn test_recursive_refinement_runs_on_parsed_tree() {
        let issues = node_schema()
            .validate(&json!({
                "data": {"name": "r", "children": [{"name": "x"}, {"name": "x"}]}
            }))
            .unwrap_err();
        assert_eq!(issues, vec!["data: node name 'x' is not unique.".to_string()]);
    }

    #[test]
    fn test_min_items_and_enum() {
        let schema = Schema::new(vec![
            Field::new("data", Kind::non_empty_array(Kind::Number)),
            Field::new("theme", Kind::Enum(&["default", "dark"])).default(json!("default")),
        ]);

        let issues = schema
            .validate(&json!({"data": [], "theme": "neon"}))
            .unwrap_err();
        assert_eq!(issues[0], "data: must contain at least 1 item(s)");
        assert_eq!(
            issues[1],
            "theme: Invalid enum value. Expected 'default' | 'dark', received \"neon\""
        );
    }

    #[test]
    fn test_non_object_arguments() {
        let issues = node_schema().validate(&json!([1])).unwrap_err();
        assert_eq!(issues, vec!["arguments: Expected object, received array".to_string()]);
    }

    #[test]
    fn test_check_rejects_dangling_ref() {
        let schema = Schema::new(vec![Field::new("data", Kind::Ref("missing"))]);
        assert!(matches!(schema.check(), Err(Error::Startup(_))));
        assert!(node_schema().check().is_ok());
    }

    #[test]
    fn test_json_schema_shape() {
        let schema = node_schema().to_json_schema();
        assert_eq!(schema["$schema"], JSON_SCHEMA_DIALECT);
        assert_eq!(schema["type"], "object");
        assert_eq!(schema["required"], json!(["data"]));
        assert_eq!(
            schema["properties"]["data"],
            json!({"$ref": "#/$defs/node", "description": "Tree."})
        );
        assert_eq!(schema["properties"]["width"]["default"], json!(600));
        assert_eq!(schema["properties"]["bins"]["type"], json!(["integer", "null"]));
        assert_eq!(
            schema["$defs"]["node"]["properties"]["children"]["items"],
            json!({"$ref": "#/$defs/node"})
        );
        assert!(!schema.to_string().contains("additionalProperties"));
    }
}
