//! Projection of a decoded graph into Cytoscape.js element records.

use serde::{Serialize, Serializer};

use super::{DecodedGraph, GraphEdge, GraphNode};

pub const DEFAULT_COLOR: &str = "#2a9d8f";
pub const DEFAULT_SHAPE: &str = "ellipse";
pub const DEFAULT_REL_TYPE: &str = "AS";

pub const FOREGROUND_Z: u32 = 10;
pub const BACKGROUND_Z: u32 = 1;

/// Node shapes the Cytoscape renderer understands.
const SUPPORTED_SHAPES: &[&str] = &[
    "ellipse",
    "triangle",
    "round-triangle",
    "rectangle",
    "round-rectangle",
    "roundrectangle",
    "bottom-round-rectangle",
    "cut-rectangle",
    "barrel",
    "rhomboid",
    "right-rhomboid",
    "diamond",
    "round-diamond",
    "pentagon",
    "round-pentagon",
    "hexagon",
    "round-hexagon",
    "concave-hexagon",
    "heptagon",
    "round-heptagon",
    "octagon",
    "round-octagon",
    "star",
    "tag",
    "round-tag",
    "vee",
];

/// Size tier derived from a node's `type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeTier {
    Class,
    Root,
    Branch,
    Leaf,
}

impl NodeTier {
    /// Parse a node type; unknown and missing types fall back to `Branch`.
    pub fn from_type(node_type: Option<&str>) -> Self {
        match node_type.map(|t| t.trim().to_ascii_lowercase()).as_deref() {
            Some("class") => NodeTier::Class,
            Some("root") => NodeTier::Root,
            Some("leaf") => NodeTier::Leaf,
            _ => NodeTier::Branch,
        }
    }

    pub fn size(self) -> u32 {
        match self {
            NodeTier::Class => 100,
            NodeTier::Root => 90,
            NodeTier::Branch => 70,
            NodeTier::Leaf => 50,
        }
    }

    pub fn z_index(self) -> u32 {
        match self {
            NodeTier::Class | NodeTier::Root => FOREGROUND_Z,
            NodeTier::Branch | NodeTier::Leaf => BACKGROUND_Z,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NodeElement {
    pub id: String,
    pub label: String,
    pub color: String,
    pub size: u32,
    pub shape: String,
    pub z_index: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EdgeElement {
    pub source: String,
    pub target: String,
    pub rel_type: String,
}

/// One Cytoscape element. Serializes as `{"data": {...}}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderElement {
    Node(NodeElement),
    Edge(EdgeElement),
}

impl Serialize for RenderElement {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        #[derive(Serialize)]
        struct Wrapped<'a, T> {
            data: &'a T,
        }

        match self {
            RenderElement::Node(node) => Wrapped { data: node }.serialize(serializer),
            RenderElement::Edge(edge) => Wrapped { data: edge }.serialize(serializer),
        }
    }
}

/// Map every node and then every edge to exactly one render element.
///
/// Edge endpoints are not checked against the node list; resolving dangling
/// references is left to the renderer.
pub fn project_elements(graph: &DecodedGraph) -> Vec<RenderElement> {
    graph
        .nodes
        .iter()
        .map(|n| RenderElement::Node(project_node(n)))
        .chain(graph.edges.iter().map(|e| RenderElement::Edge(project_edge(e))))
        .collect()
}

pub fn project_node(node: &GraphNode) -> NodeElement {
    let tier = NodeTier::from_type(node.node_type.as_deref());

    NodeElement {
        id: node.id.clone(),
        label: node.label.clone(),
        color: node
            .color
            .as_deref()
            .map(str::trim)
            .filter(|c| is_hex_color(c))
            .unwrap_or(DEFAULT_COLOR)
            .to_string(),
        size: tier.size(),
        shape: node
            .shape
            .as_deref()
            .map(|s| s.trim().to_ascii_lowercase())
            .filter(|s| SUPPORTED_SHAPES.contains(&s.as_str()))
            .unwrap_or_else(|| DEFAULT_SHAPE.to_string()),
        z_index: tier.z_index(),
    }
}

pub fn project_edge(edge: &GraphEdge) -> EdgeElement {
    EdgeElement {
        source: edge.source.clone(),
        target: edge.target.clone(),
        rel_type: edge
            .rel_type
            .as_deref()
            .unwrap_or(DEFAULT_REL_TYPE)
            .to_string(),
    }
}

/// `#rgb` or `#rrggbb`.
fn is_hex_color(value: &str) -> bool {
    value
        .strip_prefix('#')
        .is_some_and(|hex| matches!(hex.len(), 3 | 6) && hex.chars().all(|c| c.is_ascii_hexdigit()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(id: &str, node_type: Option<&str>) -> GraphNode {
        GraphNode {
            id: id.into(),
            label: format!("label {id}"),
            node_type: node_type.map(String::from),
            color: None,
            shape: None,
        }
    }

    #[test]
    fn test_size_and_z_by_type() {
        let cases = [
            (Some("Class"), 100, FOREGROUND_Z),
            (Some("Root"), 90, FOREGROUND_Z),
            (Some("Branch"), 70, BACKGROUND_Z),
            (Some("Leaf"), 50, BACKGROUND_Z),
            (Some("root"), 90, FOREGROUND_Z),
            (Some("Galaxy"), 70, BACKGROUND_Z),
            (None, 70, BACKGROUND_Z),
        ];
        for (node_type, size, z) in cases {
            let element = project_node(&node("n", node_type));
            assert_eq!(element.size, size, "{node_type:?}");
            assert_eq!(element.z_index, z, "{node_type:?}");
        }
    }

    #[test]
    fn test_missing_visual_fields_get_defaults() {
        let element = project_node(&node("n1", None));
        assert_eq!(element.size, 70);
        assert_eq!(element.color, DEFAULT_COLOR);
        assert_eq!(element.shape, DEFAULT_SHAPE);
    }

    #[test]
    fn test_valid_visual_fields_pass_through() {
        let mut n = node("n1", Some("Root"));
        n.color = Some("#00B0F0".into());
        n.shape = Some("diamond".into());
        let element = project_node(&n);
        assert_eq!(element.color, "#00B0F0");
        assert_eq!(element.shape, "diamond");

        n.color = Some("#abc".into());
        n.shape = Some("Rectangle".into());
        let element = project_node(&n);
        assert_eq!(element.color, "#abc");
        assert_eq!(element.shape, "rectangle");
    }

    #[test]
    fn test_invalid_visual_fields_fall_back() {
        let mut n = node("n1", None);
        n.color = Some("teal".into());
        n.shape = Some("blob".into());
        let element = project_node(&n);
        assert_eq!(element.color, DEFAULT_COLOR);
        assert_eq!(element.shape, DEFAULT_SHAPE);

        n.color = Some("#12345g".into());
        assert_eq!(project_node(&n).color, DEFAULT_COLOR);
    }

    #[test]
    fn test_edge_rel_type_default() {
        let edge = GraphEdge {
            source: "a".into(),
            target: "b".into(),
            rel_type: None,
        };
        assert_eq!(project_edge(&edge).rel_type, DEFAULT_REL_TYPE);
    }

    #[test]
    fn test_projection_is_total_and_keeps_dangling_edges() {
        let graph = DecodedGraph {
            nodes: vec![node("n1", Some("Root")), node("n2", None)],
            edges: vec![
                GraphEdge {
                    source: "n1".into(),
                    target: "n2".into(),
                    rel_type: Some("BT".into()),
                },
                GraphEdge {
                    source: "n1".into(),
                    target: "missing".into(),
                    rel_type: None,
                },
            ],
        };
        let elements = project_elements(&graph);
        assert_eq!(elements.len(), 4);
        assert!(matches!(&elements[0], RenderElement::Node(n) if n.id == "n1"));
        assert!(matches!(&elements[1], RenderElement::Node(n) if n.id == "n2"));
        assert_eq!(
            elements[3],
            RenderElement::Edge(EdgeElement {
                source: "n1".into(),
                target: "missing".into(),
                rel_type: "AS".into(),
            })
        );
    }

    #[test]
    fn test_element_serialization_shape() {
        let graph = DecodedGraph {
            nodes: vec![node("n1", Some("Class"))],
            edges: vec![GraphEdge {
                source: "n1".into(),
                target: "n1".into(),
                rel_type: Some("IN".into()),
            }],
        };
        let json = serde_json::to_value(project_elements(&graph)).unwrap();
        assert_eq!(
            json,
            serde_json::json!([
                {"data": {"id": "n1", "label": "label n1", "color": "#2a9d8f", "size": 100, "shape": "ellipse", "z_index": 10}},
                {"data": {"source": "n1", "target": "n1", "rel_type": "IN"}}
            ])
        );
    }
}
