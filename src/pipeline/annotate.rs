//! Cross-linking of the synthesis prose with the decoded graph.
//!
//! Node labels get an anchored span (the graph view scrolls to it by id) that
//! also links to a web search; author names get a plain search link. Labels
//! and names are always matched as case-insensitive literals.

use std::collections::HashSet;
use std::ops::Range;
use std::sync::LazyLock;

use clap::ValueEnum;
use regex::{NoExpand, Regex, RegexBuilder};
use serde::{Deserialize, Serialize};

use super::GraphNode;

const SEARCH_URL: &str = "https://www.google.com/search?q=";

/// Existing markup that must never be rewritten: whole `<a>` elements, any
/// other tag, and whole markdown links (text and destination).
static PROTECTED_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<a\b[^<>]*>.*?</a\s*>|</?[a-z][^<>]*>|\[[^\]]*\]\([^)\s]*\)").unwrap()
});

static ANCHOR_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"<span id="([^"]*)">"#).unwrap());

/// How annotations are applied to the prose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AnnotationMode {
    /// Match every label against the untouched prose, keep matches
    /// non-overlapping and render once. Idempotent.
    #[default]
    Spans,
    /// Rewrite the prose in place, node by node and then author by author,
    /// each search running over the already rewritten text.
    Cumulative,
}

impl std::fmt::Display for AnnotationMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AnnotationMode::Spans => write!(f, "spans"),
            AnnotationMode::Cumulative => write!(f, "cumulative"),
        }
    }
}

/// Annotate node labels (first occurrence each) and then authors (every
/// occurrence) in `prose`.
pub fn annotate(prose: &str, nodes: &[GraphNode], authors: &str, mode: AnnotationMode) -> String {
    match mode {
        AnnotationMode::Spans => {
            let mut annotator = SpanAnnotator::new(prose);
            annotator.add_nodes(nodes);
            annotator.add_authors(authors);
            annotator.render()
        }
        AnnotationMode::Cumulative => {
            let prose = annotate_nodes_cumulative(prose, nodes);
            annotate_authors_cumulative(&prose, authors)
        }
    }
}

/// Split a comma-separated author list, dropping blank entries.
pub fn parse_authors(list: &str) -> impl Iterator<Item = &str> {
    list.split(',').map(str::trim).filter(|a| !a.is_empty())
}

/// Markup for an annotated node label.
pub fn node_markup(id: &str, text: &str, query: &str) -> String {
    format!(
        r#"<span id="{}"><a href="{}{}" target="_blank" class="semantic-node-highlight">{}<i class="google-icon">↗</i></a></span>"#,
        id,
        SEARCH_URL,
        urlencoding::encode(query),
        text
    )
}

/// Markup for an annotated author name.
pub fn author_markup(text: &str, query: &str) -> String {
    format!(
        r#"<a href="{}{}" target="_blank" class="author-search-link">{}<i class="google-icon">↗</i></a>"#,
        SEARCH_URL,
        urlencoding::encode(query),
        text
    )
}

fn literal_pattern(text: &str) -> Option<Regex> {
    match RegexBuilder::new(&regex::escape(text))
        .case_insensitive(true)
        .build()
    {
        Ok(re) => Some(re),
        Err(e) => {
            tracing::warn!("Skipping annotation for '{}': {}", text, e);
            None
        }
    }
}

fn escape_attr(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('"', "&quot;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn overlaps(a: &Range<usize>, b: &Range<usize>) -> bool {
    a.start < b.end && b.start < a.end
}

// ─── Cumulative rewriting ───────────────────────────────────────────────────

fn annotate_nodes_cumulative(prose: &str, nodes: &[GraphNode]) -> String {
    let mut prose = prose.to_string();
    for node in nodes.iter().filter(|n| !n.label.is_empty()) {
        let Some(pattern) = literal_pattern(&node.label) else {
            continue;
        };
        let markup = node_markup(&node.id, &node.label, &node.label);
        prose = pattern.replacen(&prose, 1, NoExpand(&markup)).into_owned();
    }
    prose
}

fn annotate_authors_cumulative(prose: &str, authors: &str) -> String {
    let mut prose = prose.to_string();
    for author in parse_authors(authors) {
        let Some(pattern) = literal_pattern(author) else {
            continue;
        };
        let markup = author_markup(author, author);
        prose = pattern.replace_all(&prose, NoExpand(&markup)).into_owned();
    }
    prose
}

// ─── Span-based rewriting ───────────────────────────────────────────────────

struct Annotation {
    range: Range<usize>,
    markup: String,
}

/// Collects non-overlapping annotations against an immutable base text.
struct SpanAnnotator<'a> {
    prose: &'a str,
    protected: Vec<Range<usize>>,
    anchored_ids: HashSet<String>,
    claimed: Vec<Annotation>,
}

impl<'a> SpanAnnotator<'a> {
    fn new(prose: &'a str) -> Self {
        let protected = PROTECTED_RE.find_iter(prose).map(|m| m.range()).collect();
        let anchored_ids = ANCHOR_ID_RE
            .captures_iter(prose)
            .map(|c| c[1].to_string())
            .collect();

        Self {
            prose,
            protected,
            anchored_ids,
            claimed: Vec::new(),
        }
    }

    fn is_free(&self, range: &Range<usize>) -> bool {
        !range.is_empty()
            && !self.protected.iter().any(|p| overlaps(p, range))
            && !self.claimed.iter().any(|a| overlaps(&a.range, range))
    }

    fn add_nodes(&mut self, nodes: &[GraphNode]) {
        for node in nodes.iter().filter(|n| !n.label.is_empty()) {
            let id = escape_attr(&node.id);
            if self.anchored_ids.contains(&id) {
                tracing::debug!("Node '{}' is already anchored in the prose", node.id);
                continue;
            }
            let Some(pattern) = literal_pattern(&node.label) else {
                continue;
            };

            let found = pattern
                .find_iter(self.prose)
                .map(|m| m.range())
                .find(|r| self.is_free(r));

            match found {
                Some(range) => {
                    let markup = node_markup(&id, &self.prose[range.clone()], &node.label);
                    self.anchored_ids.insert(id);
                    self.claimed.push(Annotation { range, markup });
                }
                None => tracing::debug!("Label '{}' not found in prose", node.label),
            }
        }
    }

    fn add_authors(&mut self, authors: &str) {
        for author in parse_authors(authors) {
            let Some(pattern) = literal_pattern(author) else {
                continue;
            };

            let ranges: Vec<Range<usize>> = pattern
                .find_iter(self.prose)
                .map(|m| m.range())
                .filter(|r| self.is_free(r))
                .collect();

            for range in ranges {
                let markup = author_markup(&self.prose[range.clone()], author);
                self.claimed.push(Annotation { range, markup });
            }
        }
    }

    fn render(mut self) -> String {
        self.claimed.sort_by_key(|a| a.range.start);

        let extra: usize = self.claimed.iter().map(|a| a.markup.len()).sum();
        let mut out = String::with_capacity(self.prose.len() + extra);
        let mut cursor = 0;
        for annotation in &self.claimed {
            out.push_str(&self.prose[cursor..annotation.range.start]);
            out.push_str(&annotation.markup);
            cursor = annotation.range.end;
        }
        out.push_str(&self.prose[cursor..]);
        out
    }
}
