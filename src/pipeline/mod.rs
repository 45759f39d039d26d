//! Post-processing of a synthesis response.
//!
//! A response is split into prose and graph JSON, the graph is decoded, the
//! prose is annotated with links for every node label and author name, and
//! the graph is projected into Cytoscape render elements. Every step is
//! total: malformed input degrades to prose-only output.

pub mod annotate;
pub mod decoder;
pub mod project;
pub mod splitter;

use serde::{Deserialize, Deserializer, Serialize};

pub use annotate::AnnotationMode;
pub use decoder::ExtractionStrategy;
pub use project::RenderElement;

/// A concept node as emitted by the model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphNode {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub label: String,
    #[serde(rename = "type", default)]
    pub node_type: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub shape: Option<String>,
}

/// A typed relation between two node ids. References are not validated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphEdge {
    #[serde(deserialize_with = "string_or_number")]
    pub source: String,
    #[serde(deserialize_with = "string_or_number")]
    pub target: String,
    #[serde(default)]
    pub rel_type: Option<String>,
}

/// Nodes and edges decoded from one response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecodedGraph {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}

/// Knobs for one pipeline run.
#[derive(Debug, Clone, Copy, Default)]
pub struct PipelineOptions {
    pub annotation: AnnotationMode,
    pub extraction: ExtractionStrategy,
}

/// Everything the renderers need from one response.
#[derive(Debug, Clone, Serialize)]
pub struct SynthesisOutput {
    /// Prose with node and author links inserted.
    pub prose: String,
    pub graph: DecodedGraph,
    pub elements: Vec<RenderElement>,
}

impl SynthesisOutput {
    fn prose_only(prose: &str) -> Self {
        SynthesisOutput {
            prose: prose.to_string(),
            graph: DecodedGraph::default(),
            elements: Vec::new(),
        }
    }

    /// Whether a graph panel should be shown.
    pub fn has_graph(&self) -> bool {
        !self.graph.nodes.is_empty()
    }
}

/// Run the full pipeline over a raw model response.
///
/// `authors` is the comma-separated author list from the form.
pub fn process(response: &str, authors: &str, options: PipelineOptions) -> SynthesisOutput {
    let split = splitter::split_response(response, splitter::GRAPH_MARKER);

    if !split.has_graph_segment() {
        tracing::info!("Response carries no graph marker; rendering prose only");
        return SynthesisOutput::prose_only(split.prose);
    }

    let Some(graph) = decoder::try_decode_graph(split.graph_segment, options.extraction) else {
        return SynthesisOutput::prose_only(split.prose);
    };

    let prose = annotate::annotate(split.prose, &graph.nodes, authors, options.annotation);
    let elements = project::project_elements(&graph);

    tracing::info!(
        "Pipeline produced {} nodes, {} edges, {} render elements",
        graph.nodes.len(),
        graph.edges.len(),
        elements.len()
    );

    SynthesisOutput {
        prose,
        graph,
        elements,
    }
}

/// Accept ids written either as JSON strings or as numbers.
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Id {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match Id::deserialize(deserializer)? {
        Id::Text(s) => s,
        Id::Number(n) => n.to_string(),
    })
}
