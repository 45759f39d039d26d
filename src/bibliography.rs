//! Author bibliographies from public research registries.
//!
//! Each author is looked up on ORCID first (search, then the public record);
//! authors without an ORCID id fall back to a Semantic Scholar paper search.
//! Lookups never fail the caller: any network or decoding problem drops that
//! author from the result.

use std::fmt::Write as _;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use futures::future::join_all;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::config::BibliographyConfig;
use crate::pipeline::annotate::parse_authors;

const ORCID_API: &str = "https://pub.orcid.org/v3.0";
const SCHOLAR_SEARCH: &str = "https://api.semanticscholar.org/graph/v1/paper/search";
const UNKNOWN_TITLE: &str = "N/A";
const UNKNOWN_YEAR: &str = "n.d.";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "source", rename_all = "lowercase")]
pub enum BibliographySource {
    Orcid { id: String },
    Scholar,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Work {
    pub year: Option<String>,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthorBibliography {
    pub author: String,
    #[serde(flatten)]
    pub source: BibliographySource,
    pub works: Vec<Work>,
}

impl AuthorBibliography {
    /// Plain-text block used in prompts and reports.
    pub fn to_prompt_text(&self) -> String {
        let mut out = String::new();
        match &self.source {
            BibliographySource::Orcid { id } => {
                let _ = writeln!(
                    out,
                    "\n--- ORCID BIBLIOGRAPHY: {} ({}) ---",
                    self.author.to_uppercase(),
                    id
                );
                if self.works.is_empty() {
                    out.push_str("No public works found.\n");
                }
            }
            BibliographySource::Scholar => {
                let _ = writeln!(
                    out,
                    "\n--- SCHOLAR BIBLIOGRAPHY: {} ---",
                    self.author.to_uppercase()
                );
            }
        }
        for work in &self.works {
            let _ = writeln!(
                out,
                "- [{}] {}",
                work.year.as_deref().unwrap_or(UNKNOWN_YEAR),
                work.title
            );
        }
        out
    }
}

/// Concatenated text of all bibliographies, in author order.
pub fn to_prompt_text(entries: &[AuthorBibliography]) -> String {
    entries.iter().map(AuthorBibliography::to_prompt_text).collect()
}

#[async_trait]
pub trait BibliographyLookup: Send + Sync {
    async fn lookup(&self, author: &str) -> Option<AuthorBibliography>;
}

/// Look up every author of a comma-separated list concurrently.
pub async fn fetch_all(lookup: &dyn BibliographyLookup, authors: &str) -> Vec<AuthorBibliography> {
    let lookups = parse_authors(authors).map(|author| lookup.lookup(author));
    join_all(lookups).await.into_iter().flatten().collect()
}

// ── ORCID / Semantic Scholar wire formats ──

#[derive(Deserialize)]
struct OrcidSearch {
    #[serde(default)]
    result: Option<Vec<OrcidHit>>,
}

#[derive(Deserialize)]
struct OrcidHit {
    #[serde(rename = "orcid-identifier")]
    identifier: OrcidIdentifier,
}

#[derive(Deserialize)]
struct OrcidIdentifier {
    path: String,
}

#[derive(Deserialize)]
struct OrcidRecord {
    #[serde(rename = "activities-summary", default)]
    activities: Option<ActivitiesSummary>,
}

#[derive(Deserialize)]
struct ActivitiesSummary {
    #[serde(default)]
    works: Option<WorkGroups>,
}

#[derive(Deserialize)]
struct WorkGroups {
    #[serde(default)]
    group: Vec<WorkGroup>,
}

#[derive(Deserialize)]
struct WorkGroup {
    #[serde(rename = "work-summary", default)]
    summaries: Vec<WorkSummary>,
}

#[derive(Deserialize, Default)]
struct WorkSummary {
    #[serde(default)]
    title: Option<TitleWrapper>,
    #[serde(rename = "publication-date", default)]
    publication_date: Option<PublicationDate>,
}

#[derive(Deserialize)]
struct TitleWrapper {
    #[serde(default)]
    title: Option<Value>,
}

#[derive(Deserialize)]
struct PublicationDate {
    #[serde(default)]
    year: Option<Value>,
}

#[derive(Deserialize)]
struct Value {
    #[serde(default)]
    value: Option<String>,
}

#[derive(Deserialize)]
struct ScholarSearch {
    #[serde(default)]
    data: Vec<ScholarPaper>,
}

#[derive(Deserialize)]
struct ScholarPaper {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    year: Option<i64>,
}

/// First ORCID id of a search response, if any.
pub fn parse_orcid_search(body: &str) -> Result<Option<String>> {
    let search: OrcidSearch =
        serde_json::from_str(body).context("Failed to parse ORCID search response")?;
    Ok(search
        .result
        .and_then(|hits| hits.into_iter().next())
        .map(|hit| hit.identifier.path))
}

/// Up to `max_works` works of an ORCID record.
pub fn parse_orcid_works(body: &str, max_works: usize) -> Result<Vec<Work>> {
    let record: OrcidRecord =
        serde_json::from_str(body).context("Failed to parse ORCID record")?;
    let groups = record
        .activities
        .and_then(|a| a.works)
        .map(|w| w.group)
        .unwrap_or_default();

    Ok(groups
        .into_iter()
        .take(max_works)
        .map(|group| {
            let summary = group.summaries.into_iter().next().unwrap_or_default();
            Work {
                title: summary
                    .title
                    .and_then(|t| t.title)
                    .and_then(|v| v.value)
                    .unwrap_or_else(|| UNKNOWN_TITLE.to_string()),
                year: summary
                    .publication_date
                    .and_then(|d| d.year)
                    .and_then(|v| v.value),
            }
        })
        .collect())
}

pub fn parse_scholar_works(body: &str) -> Result<Vec<Work>> {
    let search: ScholarSearch =
        serde_json::from_str(body).context("Failed to parse Semantic Scholar response")?;
    Ok(search
        .data
        .into_iter()
        .map(|paper| Work {
            year: paper.year.map(|y| y.to_string()),
            title: paper.title.unwrap_or_else(|| UNKNOWN_TITLE.to_string()),
        })
        .collect())
}

/// Registry-backed lookup over HTTPS.
pub struct RegistryClient {
    client: Client,
    max_works: usize,
    scholar_limit: usize,
}

impl RegistryClient {
    pub fn new(config: &BibliographyConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self {
            client,
            max_works: config.max_works,
            scholar_limit: config.scholar_limit,
        })
    }

    async fn get_text(&self, request: reqwest::RequestBuilder) -> Result<String> {
        let response = request
            .header("Accept", "application/json")
            .send()
            .await
            .context("Registry request failed")?;
        if !response.status().is_success() {
            anyhow::bail!("Registry returned {}", response.status());
        }
        response.text().await.context("Failed to read registry response")
    }

    async fn orcid_id(&self, author: &str) -> Result<Option<String>> {
        let body = self
            .get_text(
                self.client
                    .get(format!("{ORCID_API}/search/"))
                    .query(&[("q", author)]),
            )
            .await?;
        parse_orcid_search(&body)
    }

    async fn orcid_works(&self, orcid: &str) -> Result<Vec<Work>> {
        let body = self
            .get_text(self.client.get(format!("{ORCID_API}/{orcid}/record")))
            .await?;
        parse_orcid_works(&body, self.max_works)
    }

    async fn scholar_works(&self, author: &str) -> Result<Vec<Work>> {
        let query = format!("author:\"{}\"", author);
        let limit = self.scholar_limit.to_string();
        let body = self
            .get_text(self.client.get(SCHOLAR_SEARCH).query(&[
                ("query", query.as_str()),
                ("limit", limit.as_str()),
                ("fields", "title,year"),
            ]))
            .await?;
        parse_scholar_works(&body)
    }

    async fn try_lookup(&self, author: &str) -> Result<Option<AuthorBibliography>> {
        // A failed ORCID search falls through to Semantic Scholar.
        let orcid = self.orcid_id(author).await.unwrap_or_else(|e| {
            tracing::debug!("ORCID search for '{}' failed: {:#}", author, e);
            None
        });

        if let Some(id) = orcid {
            let works = self.orcid_works(&id).await?;
            return Ok(Some(AuthorBibliography {
                author: author.to_string(),
                source: BibliographySource::Orcid { id },
                works,
            }));
        }

        let works = self.scholar_works(author).await?;
        if works.is_empty() {
            return Ok(None);
        }
        Ok(Some(AuthorBibliography {
            author: author.to_string(),
            source: BibliographySource::Scholar,
            works,
        }))
    }
}

#[async_trait]
impl BibliographyLookup for RegistryClient {
    async fn lookup(&self, author: &str) -> Option<AuthorBibliography> {
        match self.try_lookup(author).await {
            Ok(found) => found,
            Err(e) => {
                tracing::warn!("Bibliography lookup for '{}' failed: {:#}", author, e);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ORCID_SEARCH: &str = r#"{"num-found": 2, "result": [
        {"orcid-identifier": {"uri": "https://orcid.org/0000-0002-1825-0097", "path": "0000-0002-1825-0097", "host": "orcid.org"}},
        {"orcid-identifier": {"path": "0000-0001-5109-3700"}}
    ]}"#;

    const ORCID_RECORD: &str = r#"{"activities-summary": {"works": {"group": [
        {"work-summary": [{"title": {"title": {"value": "On Synthesis"}}, "publication-date": {"year": {"value": "2019"}}}]},
        {"work-summary": [{"title": {"title": {"value": "Undated Notes"}}, "publication-date": null}]},
        {"work-summary": [{"title": null}]},
        {"work-summary": [{"title": {"title": {"value": "Four"}}}]},
        {"work-summary": [{"title": {"title": {"value": "Five"}}}]},
        {"work-summary": [{"title": {"title": {"value": "Six"}}}]}
    ]}}}"#;

    struct FakeRegistry;

    #[async_trait]
    impl BibliographyLookup for FakeRegistry {
        async fn lookup(&self, author: &str) -> Option<AuthorBibliography> {
            match author {
                "Ada Lovelace" => Some(AuthorBibliography {
                    author: author.to_string(),
                    source: BibliographySource::Scholar,
                    works: vec![Work {
                        year: Some("1843".into()),
                        title: "Notes".into(),
                    }],
                }),
                "Jane Doe" => Some(AuthorBibliography {
                    author: author.to_string(),
                    source: BibliographySource::Orcid {
                        id: "0000-0000-0000-0001".into(),
                    },
                    works: Vec::new(),
                }),
                _ => None,
            }
        }
    }

    // ── parsing ──

    #[test]
    fn test_parse_orcid_search_takes_first_hit() {
        assert_eq!(
            parse_orcid_search(ORCID_SEARCH).unwrap().as_deref(),
            Some("0000-0002-1825-0097")
        );
        assert_eq!(parse_orcid_search(r#"{"result": []}"#).unwrap(), None);
        assert_eq!(parse_orcid_search(r#"{"result": null}"#).unwrap(), None);
        assert!(parse_orcid_search("<html>").is_err());
    }

    #[test]
    fn test_parse_orcid_works_defaults_and_limit() {
        let works = parse_orcid_works(ORCID_RECORD, 5).unwrap();
        assert_eq!(works.len(), 5);
        assert_eq!(works[0].title, "On Synthesis");
        assert_eq!(works[0].year.as_deref(), Some("2019"));
        assert_eq!(works[1].year, None);
        assert_eq!(works[2].title, "N/A");
    }

    #[test]
    fn test_parse_orcid_record_without_works() {
        assert!(parse_orcid_works(r#"{"activities-summary": null}"#, 5).unwrap().is_empty());
        assert!(parse_orcid_works("{}", 5).unwrap().is_empty());
    }

    #[test]
    fn test_parse_scholar_works() {
        let body = r#"{"total": 2, "data": [
            {"paperId": "a", "title": "Graph Minds", "year": 2021},
            {"paperId": "b", "title": "Old Paper", "year": null}
        ]}"#;
        let works = parse_scholar_works(body).unwrap();
        assert_eq!(works.len(), 2);
        assert_eq!(works[0].year.as_deref(), Some("2021"));
        assert_eq!(works[1].year, None);
        assert!(parse_scholar_works(r#"{"total": 0}"#).unwrap().is_empty());
    }

    // ── text rendering ──

    #[test]
    fn test_prompt_text_formats() {
        let orcid = AuthorBibliography {
            author: "Jane Doe".into(),
            source: BibliographySource::Orcid {
                id: "0000-0002-1825-0097".into(),
            },
            works: vec![
                Work {
                    year: Some("2019".into()),
                    title: "On Synthesis".into(),
                },
                Work {
                    year: None,
                    title: "Undated".into(),
                },
            ],
        };
        assert_eq!(
            orcid.to_prompt_text(),
            "\n--- ORCID BIBLIOGRAPHY: JANE DOE (0000-0002-1825-0097) ---\n- [2019] On Synthesis\n- [n.d.] Undated\n"
        );

        let empty = AuthorBibliography {
            works: Vec::new(),
            ..orcid
        };
        assert!(empty.to_prompt_text().ends_with("---\nNo public works found.\n"));
    }

    // ── lookup fan-out ──

    #[tokio::test]
    async fn test_fetch_all_keeps_author_order_and_drops_misses() {
        let found = fetch_all(&FakeRegistry, "Jane Doe, Nobody , ,Ada Lovelace").await;
        let authors: Vec<&str> = found.iter().map(|b| b.author.as_str()).collect();
        assert_eq!(authors, vec!["Jane Doe", "Ada Lovelace"]);

        let text = to_prompt_text(&found);
        assert!(text.contains("ORCID BIBLIOGRAPHY: JANE DOE"));
        assert!(text.contains("SCHOLAR BIBLIOGRAPHY: ADA LOVELACE ---\n- [1843] Notes\n"));
    }

    #[tokio::test]
    async fn test_fetch_all_empty_authors() {
        assert!(fetch_all(&FakeRegistry, "  ").await.is_empty());
    }

    #[tokio::test]
    #[ignore = "requires network access"]
    async fn test_registry_lookup_live() {
        let client = RegistryClient::new(&BibliographyConfig::default()).unwrap();
        let found = client.lookup("Josiah Carberry").await;
        assert!(found.is_some());
    }
}
