//! Splits a raw model response into its prose and its trailing graph segment.

/// Marker the system prompt asks the model to place before the graph JSON.
pub const GRAPH_MARKER: &str = "### SEMANTIC_GRAPH_JSON";

/// The two halves of a model response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SplitResponse<'a> {
    pub prose: &'a str,
    pub graph_segment: &'a str,
    marker_found: bool,
}

impl SplitResponse<'_> {
    /// Whether the response contained the marker at all.
    ///
    /// A response can carry the marker and still have an empty segment;
    /// decoding and annotation are only attempted when the marker was seen.
    pub fn has_graph_segment(&self) -> bool {
        self.marker_found
    }
}

/// Split `response` at the first occurrence of `marker`.
///
/// Without a marker the whole input is prose and the graph segment is empty.
pub fn split_response<'a>(response: &'a str, marker: &str) -> SplitResponse<'a> {
    match response.split_once(marker) {
        Some((prose, graph_segment)) => SplitResponse {
            prose,
            graph_segment,
            marker_found: true,
        },
        None => SplitResponse {
            prose: response,
            graph_segment: "",
            marker_found: false,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_without_marker_is_all_prose() {
        for input in ["", "plain text", "### SEMANTIC_GRAPH", "{\"nodes\": []}"] {
            let split = split_response(input, GRAPH_MARKER);
            assert_eq!(split.prose, input);
            assert_eq!(split.graph_segment, "");
            assert!(!split.has_graph_segment());
        }
    }

    #[test]
    fn test_split_at_marker() {
        let input = "Essay text.\n### SEMANTIC_GRAPH_JSON\n{\"nodes\": []}";
        let split = split_response(input, GRAPH_MARKER);
        assert_eq!(split.prose, "Essay text.\n");
        assert_eq!(split.graph_segment, "\n{\"nodes\": []}");
        assert!(split.has_graph_segment());
    }

    #[test]
    fn test_split_uses_first_marker_only() {
        let input = "a ### SEMANTIC_GRAPH_JSON b ### SEMANTIC_GRAPH_JSON c";
        let split = split_response(input, GRAPH_MARKER);
        assert_eq!(split.prose, "a ");
        assert_eq!(split.graph_segment, " b ### SEMANTIC_GRAPH_JSON c");
    }

    #[test]
    fn test_split_marker_at_end_leaves_empty_segment() {
        let split = split_response("prose ### SEMANTIC_GRAPH_JSON", GRAPH_MARKER);
        assert_eq!(split.prose, "prose ");
        assert_eq!(split.graph_segment, "");
        assert!(split.has_graph_segment());
    }
}
