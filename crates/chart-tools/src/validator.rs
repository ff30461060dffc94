//! Invariants that span several records and cannot be expressed per field.

use std::collections::HashSet;

use serde::Deserialize;
use thiserror::Error as ThisError;

#[derive(Debug, Clone, Deserialize)]
pub struct GraphNode {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GraphEdge {
    pub source: String,
    pub target: String,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GraphData {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}

#[derive(Debug, Clone)]
pub struct TreeNode {
    pub name: String,
    pub children: Vec<TreeNode>,
}

/// Which end of an edge points at a missing node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Source,
    Target,
}

impl Endpoint {
    fn as_str(self) -> &'static str {
        match self {
            Endpoint::Source => "source",
            Endpoint::Target => "target",
        }
    }
}

#[derive(ThisError, Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    #[error("nodes name '{0}' is not unique.")]
    DuplicateNodeName(String),

    #[error("{} '{missing}' does not exist in nodes (edge '{from}' -> '{to}').", .endpoint.as_str())]
    DanglingEdgeReference {
        from: String,
        to: String,
        endpoint: Endpoint,
        missing: String,
    },

    #[error("edge pair '{from}-{to}' is not unique.")]
    DuplicateEdge { from: String, to: String },

    #[error("node name '{0}' is not unique.")]
    DuplicateTreeNodeName(String),
}

/// Checks node-name uniqueness, edge endpoints and edge-pair uniqueness, reporting every
/// violation found. A repeated name or pair is reported once.
pub fn validate_graph(nodes: &[GraphNode], edges: &[GraphEdge]) -> Result<(), Vec<Violation>> {
    let mut violations = Vec::new();

    let mut names = HashSet::with_capacity(nodes.len());
    let mut reported = HashSet::new();
    for node in nodes {
        if !names.insert(node.name.as_str()) && reported.insert(node.name.as_str()) {
            violations.push(Violation::DuplicateNodeName(node.name.clone()));
        }
    }

    for edge in edges {
        for (endpoint, name) in [
            (Endpoint::Source, &edge.source),
            (Endpoint::Target, &edge.target),
        ] {
            if !names.contains(name.as_str()) {
                violations.push(Violation::DanglingEdgeReference {
                    from: edge.source.clone(),
                    to: edge.target.clone(),
                    endpoint,
                    missing: name.clone(),
                });
            }
        }
    }

    let mut pairs = HashSet::with_capacity(edges.len());
    let mut reported_pairs = HashSet::new();
    for edge in edges {
        let pair = (edge.source.as_str(), edge.target.as_str());
        if !pairs.insert(pair) && reported_pairs.insert(pair) {
            violations.push(Violation::DuplicateEdge {
                from: edge.source.clone(),
                to: edge.target.clone(),
            });
        }
    }

    if violations.is_empty() {
        Ok(())
    } else {
        Err(violations)
    }
}

/// Depth-first, parent before children, children left to right. The first name seen twice
/// is reported.
pub fn validate_tree_names(root: &TreeNode) -> Result<(), Violation> {
    fn visit<'a>(node: &'a TreeNode, seen: &mut HashSet<&'a str>) -> Result<(), Violation> {
        if !seen.insert(node.name.as_str()) {
            return Err(Violation::DuplicateTreeNodeName(node.name.clone()));
        }
        node.children.iter().try_for_each(|child| visit(child, seen))
    }

    visit(root, &mut HashSet::new())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nodes(names: &[&str]) -> Vec<GraphNode> {
        names
            .iter()
            .map(|n| GraphNode {
                name: n.to_string(),
            })
            .collect()
    }

    fn edge(source: &str, target: &str) -> GraphEdge {
        GraphEdge {
            source: source.into(),
            target: target.into(),
            name: None,
        }
    }

    fn leaf(name: &str) -> TreeNode {
        TreeNode {
            name: name.into(),
            children: vec![],
        }
    }

    fn branch(name: &str, children: Vec<TreeNode>) -> TreeNode {
        TreeNode {
            name: name.into(),
            children,
        }
    }

    #[test]
    fn test_valid_graph() {
        let result = validate_graph(&nodes(&["a", "b", "c"]), &[edge("a", "b"), edge("b", "a")]);
        assert!(result.is_ok());
    }

    #[test]
    fn test_duplicate_node_reported_once() {
        let err = validate_graph(&nodes(&["n1", "n1", "n1"]), &[]).unwrap_err();
        assert_eq!(err, vec![Violation::DuplicateNodeName("n1".into())]);
        assert_eq!(err[0].to_string(), "nodes name 'n1' is not unique.");
    }

    #[test]
    fn test_dangling_target() {
        let err = validate_graph(&nodes(&["a"]), &[edge("a", "b")]).unwrap_err();
        assert_eq!(
            err,
            vec![Violation::DanglingEdgeReference {
                from: "a".into(),
                to: "b".into(),
                endpoint: Endpoint::Target,
                missing: "b".into(),
            }]
        );
        assert!(err[0].to_string().starts_with("target 'b' does not exist in nodes"));
    }

    #[test]
    fn test_empty_nodes_with_edges_reports_both_endpoints() {
        let err = validate_graph(&[], &[edge("x", "y")]).unwrap_err();
        assert_eq!(err.len(), 2);
        assert!(matches!(
            err[0],
            Violation::DanglingEdgeReference {
                endpoint: Endpoint::Source,
                ..
            }
        ));
    }

    #[test]
    fn test_duplicate_edge_pair() {
        let err = validate_graph(
            &nodes(&["a", "b"]),
            &[edge("a", "b"), edge("a", "b"), edge("b", "a")],
        )
        .unwrap_err();
        assert_eq!(
            err,
            vec![Violation::DuplicateEdge {
                from: "a".into(),
                to: "b".into()
            }]
        );
        assert_eq!(err[0].to_string(), "edge pair 'a-b' is not unique.");
    }

    #[test]
    fn test_all_violations_collected() {
        let err = validate_graph(&nodes(&["a", "a"]), &[edge("a", "z")]).unwrap_err();
        assert_eq!(err.len(), 2);
        assert!(matches!(err[0], Violation::DuplicateNodeName(_)));
        assert!(matches!(err[1], Violation::DanglingEdgeReference { .. }));
    }

    #[test]
    fn test_tree_names_unique_across_levels() {
        let tree = branch("root", vec![branch("a", vec![leaf("b")]), leaf("c")]);
        assert!(validate_tree_names(&tree).is_ok());

        let tree = branch("root", vec![branch("a", vec![leaf("root")])]);
        assert_eq!(
            validate_tree_names(&tree),
            Err(Violation::DuplicateTreeNodeName("root".into()))
        );
    }

    #[test]
    fn test_tree_first_duplicate_in_traversal_order_wins() {
        // "y" repeats deep in the first subtree before "x" repeats among siblings.
        let tree = branch(
            "root",
            vec![branch("y", vec![leaf("y")]), leaf("x"), leaf("x")],
        );
        assert_eq!(
            validate_tree_names(&tree),
            Err(Violation::DuplicateTreeNodeName("y".into()))
        );
    }
}
