//! Fail-soft extraction of the graph JSON trailing a model response.
//!
//! Model output is unpredictable: the object may be wrapped in markdown
//! fences, followed by a sign-off, or simply broken. Every failure here
//! degrades to an empty [`DecodedGraph`] with a warning in the log, so the
//! caller can always go on and show the prose on its own.

use std::collections::HashSet;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use super::{DecodedGraph, GraphEdge, GraphNode};

/// How the JSON object is located inside the graph segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExtractionStrategy {
    /// Everything from the first `{` to the last `}`.
    #[default]
    Greedy,
    /// The first complete top-level JSON value starting at the first `{`.
    FirstObject,
}

impl std::fmt::Display for ExtractionStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExtractionStrategy::Greedy => write!(f, "greedy"),
            ExtractionStrategy::FirstObject => write!(f, "first-object"),
        }
    }
}

#[derive(Deserialize)]
struct GraphPayload {
    nodes: Vec<GraphNode>,
    edges: Vec<GraphEdge>,
}

impl From<GraphPayload> for DecodedGraph {
    fn from(payload: GraphPayload) -> Self {
        DecodedGraph {
            nodes: payload.nodes,
            edges: payload.edges,
        }
    }
}

/// Decodes the graph segment, telling a failed decode apart from a graph that
/// legitimately has no nodes.
pub fn try_decode_graph(segment: &str, strategy: ExtractionStrategy) -> Option<DecodedGraph> {
    let payload = match strategy {
        ExtractionStrategy::Greedy => decode_greedy(segment),
        ExtractionStrategy::FirstObject => decode_first_object(segment),
    };

    match payload {
        Ok(payload) => {
            let graph = DecodedGraph::from(payload);
            warn_on_duplicate_ids(&graph);
            Some(graph)
        }
        Err(reason) => {
            tracing::warn!("Graph data could not be parsed ({}): {}", strategy, reason);
            None
        }
    }
}

/// Slice from the first `{` to the last `}` of the segment.
///
/// Matches what `\{.*\}` in dot-all mode would select. Braces inside string
/// values and concatenated objects are not understood.
pub fn greedy_object_span(segment: &str) -> Option<&str> {
    let start = segment.find('{')?;
    let end = segment.rfind('}')?;
    (end > start).then(|| &segment[start..=end])
}

fn decode_greedy(segment: &str) -> Result<GraphPayload, String> {
    let json = greedy_object_span(segment).ok_or_else(|| "no JSON object found".to_string())?;
    serde_json::from_str(json).map_err(|e| e.to_string())
}

fn decode_first_object(segment: &str) -> Result<GraphPayload, String> {
    let start = segment
        .find('{')
        .ok_or_else(|| "no JSON object found".to_string())?;

    let mut stream =
        serde_json::Deserializer::from_str(&segment[start..]).into_iter::<GraphPayload>();
    match stream.next() {
        Some(Ok(payload)) => {
            tracing::debug!(
                "Decoded graph object ending at byte {}",
                start + stream.byte_offset()
            );
            Ok(payload)
        }
        Some(Err(e)) => Err(e.to_string()),
        None => Err("no JSON object found".to_string()),
    }
}

fn warn_on_duplicate_ids(graph: &DecodedGraph) {
    let mut seen = HashSet::new();
    for node in &graph.nodes {
        if !seen.insert(node.id.as_str()) {
            tracing::warn!("Duplicate node id '{}' in decoded graph", node.id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode_graph(segment: &str, strategy: ExtractionStrategy) -> DecodedGraph {
        try_decode_graph(segment, strategy).unwrap_or_default()
    }

    fn is_empty(graph: &DecodedGraph) -> bool {
        graph.nodes.is_empty() && graph.edges.is_empty()
    }

    const WELL_FORMED: &str = r##"
{
  "nodes": [
    {"id": "n1", "label": "Physics", "type": "Root", "color": "#00B0F0", "shape": "rectangle"},
    {"id": "n2", "label": "Quantum field", "type": "Leaf"}
  ],
  "edges": [
    {"source": "n1", "target": "n2", "rel_type": "NT"},
    {"source": "n2", "target": "n1"}
  ]
}"##;

    fn both_strategies() -> [ExtractionStrategy; 2] {
        [ExtractionStrategy::Greedy, ExtractionStrategy::FirstObject]
    }

    #[test]
    fn test_decode_well_formed_graph() {
        for strategy in both_strategies() {
            let graph = decode_graph(WELL_FORMED, strategy);
            assert_eq!(graph.nodes.len(), 2);
            assert_eq!(graph.edges.len(), 2);

            assert_eq!(graph.nodes[0].id, "n1");
            assert_eq!(graph.nodes[0].label, "Physics");
            assert_eq!(graph.nodes[0].node_type.as_deref(), Some("Root"));
            assert_eq!(graph.nodes[0].color.as_deref(), Some("#00B0F0"));
            assert_eq!(graph.nodes[0].shape.as_deref(), Some("rectangle"));

            assert_eq!(graph.nodes[1].node_type.as_deref(), Some("Leaf"));
            assert_eq!(graph.nodes[1].color, None);
            assert_eq!(graph.nodes[1].shape, None);

            assert_eq!(graph.edges[0].rel_type.as_deref(), Some("NT"));
            assert_eq!(graph.edges[1].rel_type, None);
        }
    }

    #[test]
    fn test_decode_recovers_serialized_graph() {
        let original = DecodedGraph {
            nodes: vec![
                GraphNode {
                    id: "a".into(),
                    label: "Alpha".into(),
                    node_type: Some("Class".into()),
                    color: Some("#FFC000".into()),
                    shape: Some("diamond".into()),
                },
                GraphNode {
                    id: "b".into(),
                    label: "Beta \"quoted\" {braced}".into(),
                    node_type: None,
                    color: None,
                    shape: None,
                },
            ],
            edges: vec![GraphEdge {
                source: "a".into(),
                target: "b".into(),
                rel_type: Some("outcome_of".into()),
            }],
        };
        let segment = format!("\n{}\n", serde_json::to_string(&original).unwrap());

        for strategy in both_strategies() {
            assert_eq!(decode_graph(&segment, strategy), original);
        }
    }

    #[test]
    fn test_decode_not_json_is_empty() {
        for strategy in both_strategies() {
            let graph = decode_graph("not json", strategy);
            assert!(is_empty(&graph));
            assert_eq!(graph, DecodedGraph::default());
        }
    }

    #[test]
    fn test_decode_malformed_inputs_are_empty() {
        let inputs = [
            "",
            "   ",
            "{",
            "}{",
            "{\"nodes\": [}",
            "{\"nodes\": []}",
            "{\"edges\": []}",
            "{\"nodes\": [{\"label\": \"no id\"}], \"edges\": []}",
            "{\"nodes\": [], \"edges\": [{\"source\": \"a\"}]}",
            "[1, 2, 3]",
        ];
        for input in inputs {
            for strategy in both_strategies() {
                assert!(
                    is_empty(&decode_graph(input, strategy)),
                    "expected empty graph for {input:?} with {strategy}"
                );
            }
        }
    }

    #[test]
    fn test_decode_inside_markdown_fences() {
        let segment = format!("\n```json\n{}\n```\nThat is the graph.", WELL_FORMED.trim());
        for strategy in both_strategies() {
            assert_eq!(decode_graph(&segment, strategy).nodes.len(), 2);
        }
    }

    #[test]
    fn test_decode_accepts_numeric_ids() {
        let segment = r#"{"nodes": [{"id": 1, "label": "One"}, {"id": 2, "label": "Two"}],
                          "edges": [{"source": 1, "target": 2}]}"#;
        let graph = decode_graph(segment, ExtractionStrategy::Greedy);
        assert_eq!(graph.nodes[0].id, "1");
        assert_eq!(graph.edges[0].target, "2");
    }

    #[test]
    fn test_decode_null_visual_fields() {
        let segment = r#"{"nodes": [{"id": "n1", "label": "X", "type": null, "color": null}], "edges": []}"#;
        let graph = decode_graph(segment, ExtractionStrategy::Greedy);
        assert_eq!(graph.nodes.len(), 1);
        assert_eq!(graph.nodes[0].node_type, None);
        assert_eq!(graph.nodes[0].color, None);
    }

    #[test]
    fn test_concatenated_objects_differ_by_strategy() {
        let segment = r#"{"nodes": [{"id": "n1", "label": "A"}], "edges": []} {"nodes": [], "edges": []}"#;
        assert!(is_empty(&decode_graph(segment, ExtractionStrategy::Greedy)));
        assert_eq!(
            decode_graph(segment, ExtractionStrategy::FirstObject).nodes.len(),
            1
        );
    }

    #[test]
    fn test_trailing_brace_in_prose_breaks_greedy_only() {
        let segment = r#"{"nodes": [{"id": "n1", "label": "A"}], "edges": []} see {appendix}"#;
        assert!(is_empty(&decode_graph(segment, ExtractionStrategy::Greedy)));
        assert_eq!(
            decode_graph(segment, ExtractionStrategy::FirstObject).nodes.len(),
            1
        );
    }

    #[test]
    fn test_try_decode_separates_empty_from_failed() {
        let empty = r#"{"nodes": [], "edges": []}"#;
        assert_eq!(
            try_decode_graph(empty, ExtractionStrategy::Greedy),
            Some(DecodedGraph::default())
        );
        assert_eq!(try_decode_graph("oops", ExtractionStrategy::Greedy), None);
    }

    #[test]
    fn test_duplicate_ids_pass_through() {
        let segment = r#"{"nodes": [{"id": "n1", "label": "A"}, {"id": "n1", "label": "B"}], "edges": []}"#;
        let graph = decode_graph(segment, ExtractionStrategy::Greedy);
        assert_eq!(graph.nodes.len(), 2);
    }

    #[test]
    fn test_greedy_object_span() {
        assert_eq!(greedy_object_span("x {a} y {b} z"), Some("{a} y {b}"));
        assert_eq!(greedy_object_span("} before {"), None);
        assert_eq!(greedy_object_span("no braces"), None);
    }
}
