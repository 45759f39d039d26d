use anyhow::{Context, Result};
use pulldown_cmark::{Options, Parser, html};
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::bibliography::{self, AuthorBibliography};
use crate::cli::OutputFormat;
use crate::pipeline::SynthesisOutput;

const CYTOSCAPE_CDN: &str = "https://cdnjs.cloudflare.com/ajax/libs/cytoscape/3.26.0/cytoscape.min.js";

/// Everything a rendered report shows.
#[derive(Debug, Serialize)]
pub struct Report<'a> {
    pub title: String,
    /// Subtitle under the graph heading, e.g. the logic mode in use.
    pub caption: Option<String>,
    pub idea_mode: bool,
    #[serde(flatten)]
    pub output: &'a SynthesisOutput,
    pub bibliography: &'a [AuthorBibliography],
}

impl<'a> Report<'a> {
    pub fn new(title: impl Into<String>, output: &'a SynthesisOutput) -> Self {
        Self {
            title: title.into(),
            caption: None,
            idea_mode: false,
            output,
            bibliography: &[],
        }
    }
}

/// Write a report in the requested format
pub fn write_report(report: &Report, format: OutputFormat, path: &Path) -> Result<()> {
    match format {
        OutputFormat::Html => export_html(report, path),
        OutputFormat::Json => export_json(report, path),
        OutputFormat::Markdown => export_markdown(report, path),
    }
}

fn create(path: &Path) -> Result<BufWriter<File>> {
    let file =
        File::create(path).with_context(|| format!("Failed to create file: {}", path.display()))?;
    Ok(BufWriter::new(file))
}

/// Export the report as a self-contained HTML page
pub fn export_html(report: &Report, path: &Path) -> Result<()> {
    let mut writer = create(path)?;
    writer
        .write_all(render_html(report)?.as_bytes())
        .context("Failed to write HTML")?;
    writer.flush()?;
    Ok(())
}

/// Export prose, graph, render elements and bibliography as JSON
pub fn export_json(report: &Report, path: &Path) -> Result<()> {
    let writer = create(path)?;
    serde_json::to_writer_pretty(writer, report).context("Failed to write JSON")?;
    Ok(())
}

/// Export the annotated prose followed by a plain listing of the graph
pub fn export_markdown(report: &Report, path: &Path) -> Result<()> {
    let mut writer = create(path)?;
    writer.write_all(render_markdown(report).as_bytes())?;
    writer.flush()?;
    Ok(())
}

pub fn render_markdown(report: &Report) -> String {
    let mut out = format!("# {}\n\n{}\n", report.title, report.output.prose.trim_end());

    if report.output.has_graph() {
        out.push_str("\n## Semantic Network\n\n");
        if let Some(caption) = &report.caption {
            out.push_str(&format!("_{}_\n\n", caption));
        }
        for node in &report.output.graph.nodes {
            out.push_str(&format!(
                "- **{}** (`{}`{})\n",
                node.label,
                node.id,
                node.node_type
                    .as_deref()
                    .map(|t| format!(", {}", t))
                    .unwrap_or_default()
            ));
        }
        if !report.output.graph.edges.is_empty() {
            out.push('\n');
        }
        for edge in &report.output.graph.edges {
            out.push_str(&format!(
                "- `{}` → `{}` {}\n",
                edge.source,
                edge.target,
                edge.rel_type.as_deref().unwrap_or("AS")
            ));
        }
    }

    if !report.bibliography.is_empty() {
        out.push_str("\n## Bibliography\n\n```text");
        out.push_str(&bibliography::to_prompt_text(report.bibliography));
        out.push_str("```\n");
    }

    out
}

/// Render Markdown prose to HTML, passing inline HTML (annotation anchors) through.
pub fn markdown_to_html(markdown: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    let parser = Parser::new_ext(markdown, options);
    let mut out = String::with_capacity(markdown.len() * 3 / 2);
    html::push_html(&mut out, parser);
    out
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

pub fn render_html(report: &Report) -> Result<String> {
    let prose_html = markdown_to_html(&report.output.prose);

    let idea_box = if report.idea_mode {
        r#"<div class="idea-mode-box">✨ Production &amp; Synthesis Mode engaged: Generating novel innovative concepts using Metamodel and Mental Logic.</div>"#
    } else {
        ""
    };

    let graph_section = if report.output.has_graph() {
        // `</` inside a script block would end it early
        let elements = serde_json::to_string(&report.output.elements)
            .context("Failed to serialize render elements")?
            .replace("</", "<\\/");
        let caption = report
            .caption
            .as_deref()
            .map(|c| format!(r#"<div class="metamodel-box">{}</div>"#, escape_html(c)))
            .unwrap_or_default();
        graph_html(&elements, &caption)
    } else {
        String::new()
    };

    let bibliography_section = if report.bibliography.is_empty() {
        String::new()
    } else {
        format!(
            r#"<details class="bibliography"><summary>📚 Metadata fetched from research databases</summary><pre>{}</pre></details>"#,
            escape_html(&bibliography::to_prompt_text(report.bibliography))
        )
    };

    Ok(format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <title>{title}</title>
    <style>
        body {{ font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif; max-width: 1100px; margin: 0 auto; padding: 32px 24px; color: #222; }}
        h1.report-title {{ font-size: 1.4em; color: #264653; border-bottom: 2px solid #2a9d8f; padding-bottom: 8px; }}
        .synthesis {{ line-height: 1.8; font-size: 1.05em; }}
        .semantic-node-highlight {{ color: #2a9d8f; font-weight: bold; border-bottom: 2px solid #2a9d8f; padding: 0 2px; background-color: #f0fdfa; border-radius: 4px; transition: all 0.3s ease; text-decoration: none !important; }}
        .semantic-node-highlight:hover {{ background-color: #ccfbf1; color: #264653; border-bottom: 2px solid #e76f51; }}
        .author-search-link {{ color: #1d3557; font-weight: bold; text-decoration: none; border-bottom: 1px double #457b9d; padding: 0 1px; }}
        .author-search-link:hover {{ color: #e63946; background-color: #f1faee; }}
        .google-icon {{ font-size: 0.75em; vertical-align: super; margin-left: 2px; color: #457b9d; opacity: 0.8; font-style: normal; }}
        .metamodel-box {{ padding: 15px; border-radius: 10px; background-color: #f8f9fa; border-left: 5px solid #00B0F0; margin-bottom: 20px; }}
        .idea-mode-box {{ padding: 15px; border-radius: 10px; background-color: #fff4e6; border-left: 5px solid #ff922b; margin-bottom: 20px; font-weight: bold; }}
        .graph-wrap {{ position: relative; }}
        #save_btn {{ position: absolute; top: 10px; right: 10px; z-index: 100; padding: 8px 12px; background: #2a9d8f; color: white; border: none; border-radius: 5px; cursor: pointer; font-size: 12px; box-shadow: 0 2px 4px rgba(0,0,0,0.2); }}
        #semantic-graph {{ width: 100%; height: 600px; background: #ffffff; border-radius: 15px; border: 1px solid #eee; box-shadow: 2px 2px 12px rgba(0,0,0,0.05); }}
        .bibliography {{ margin-top: 32px; }}
        .bibliography pre {{ background: #f8f9fa; padding: 16px; border-radius: 8px; white-space: pre-wrap; }}
    </style>
</head>
<body>
    <h1 class="report-title">{title}</h1>
    {idea_box}
    <article class="synthesis">
{prose_html}
    </article>
    {graph_section}
    {bibliography_section}
</body>
</html>
"#,
        title = escape_html(&report.title),
    ))
}

fn graph_html(elements_json: &str, caption: &str) -> String {
    format!(
        r#"<h2>🕸️ Metamodel-Driven Semantic Network</h2>
    {caption}
    <div class="graph-wrap">
        <button id="save_btn">💾 Export Graph as PNG</button>
        <div id="semantic-graph"></div>
    </div>
    <script src="{CYTOSCAPE_CDN}"></script>
    <script>
        document.addEventListener('DOMContentLoaded', function() {{
            var cy = cytoscape({{
                container: document.getElementById('semantic-graph'),
                elements: {elements_json},
                style: [
                    {{
                        selector: 'node',
                        style: {{
                            'label': 'data(label)', 'text-valign': 'center', 'color': '#333',
                            'background-color': 'data(color)', 'width': 'data(size)', 'height': 'data(size)',
                            'shape': 'data(shape)', 'font-size': '12px', 'font-weight': 'bold',
                            'text-outline-width': 2, 'text-outline-color': '#fff', 'z-index': 'data(z_index)'
                        }}
                    }},
                    {{
                        selector: 'edge',
                        style: {{
                            'width': 3, 'line-color': '#adb5bd', 'label': 'data(rel_type)',
                            'font-size': '10px', 'font-weight': 'bold', 'color': '#2a9d8f',
                            'target-arrow-color': '#adb5bd', 'target-arrow-shape': 'triangle',
                            'curve-style': 'bezier', 'text-rotation': 'autorotate',
                            'text-background-opacity': 1, 'text-background-color': '#ffffff',
                            'text-background-padding': '2px', 'text-background-shape': 'roundrectangle'
                        }}
                    }},
                    {{
                        selector: 'node.highlighted',
                        style: {{ 'border-width': 4, 'border-color': '#e76f51', 'z-index': 9999, 'font-size': '18px' }}
                    }},
                    {{
                        selector: '.dimmed',
                        style: {{ 'opacity': 0.15, 'text-opacity': 0 }}
                    }}
                ],
                layout: {{ name: 'cose', padding: 50, animate: true, nodeRepulsion: 25000, idealEdgeLength: 120 }}
            }});

            cy.on('mouseover', 'node', function(e) {{
                var sel = e.target;
                cy.elements().addClass('dimmed');
                sel.neighborhood().add(sel).removeClass('dimmed').addClass('highlighted');
            }});

            cy.on('mouseout', 'node', function() {{
                cy.elements().removeClass('dimmed highlighted');
            }});

            cy.on('tap', 'node', function(evt) {{
                var target = document.getElementById(evt.target.id());
                if (target) {{
                    target.scrollIntoView({{ behavior: 'smooth', block: 'center' }});
                    target.style.backgroundColor = '#ffffcc';
                    setTimeout(function() {{ target.style.backgroundColor = 'transparent'; }}, 2500);
                }}
            }});

            document.getElementById('save_btn').addEventListener('click', function() {{
                var link = document.createElement('a');
                link.href = cy.png({{ full: true, bg: 'white' }});
                link.download = 'ksynth_knowledge_graph.png';
                document.body.appendChild(link);
                link.click();
                document.body.removeChild(link);
            }});
        }});
    </script>"#
    )
}

/// Open a file with the platform's default handler
pub fn open_in_browser(path: &Path) {
    #[cfg(target_os = "macos")]
    {
        std::process::Command::new("open").arg(path).spawn().ok();
    }

    #[cfg(target_os = "linux")]
    {
        std::process::Command::new("xdg-open").arg(path).spawn().ok();
    }

    #[cfg(target_os = "windows")]
    {
        std::process::Command::new("cmd")
            .args(["/C", "start", path.to_str().unwrap_or("")])
            .spawn()
            .ok();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bibliography::{BibliographySource, Work};
    use crate::pipeline::{PipelineOptions, process};
    use tempfile::tempdir;

    const RESPONSE: &str = "Physics meets **psychology** in Ada's work.\n\
        ### SEMANTIC_GRAPH_JSON\n\
        {\"nodes\": [{\"id\": \"n1\", \"label\": \"Physics\", \"type\": \"Root\"}, {\"id\": \"n2\", \"label\": \"</script>\"}], \
         \"edges\": [{\"source\": \"n1\", \"target\": \"n2\", \"rel_type\": \"BT\"}]}";

    fn output() -> SynthesisOutput {
        process(RESPONSE, "Ada", PipelineOptions::default())
    }

    #[test]
    fn test_markdown_to_html_keeps_inline_html() {
        let html = markdown_to_html(r#"A <span id="n1"><a href="x">Physics</a></span> **bold**"#);
        assert!(html.contains(r#"<span id="n1"><a href="x">Physics</a></span>"#));
        assert!(html.contains("<strong>bold</strong>"));
    }

    #[test]
    fn test_render_html_with_graph() {
        let output = output();
        let mut report = Report::new("Physics & Mind", &output);
        report.caption = Some("Hierarchical associative logic".into());
        let html = render_html(&report).unwrap();

        assert!(html.contains("<title>Physics &amp; Mind</title>"));
        assert!(html.contains(r#"<span id="n1">"#));
        assert!(html.contains("class=\"author-search-link\""));
        assert!(html.contains("cytoscape/3.26.0/cytoscape.min.js"));
        assert!(html.contains(r#""data":{"id":"n1","label":"Physics""#));
        assert!(html.contains(r#"<div class="metamodel-box">Hierarchical associative logic</div>"#));
        // A label cannot close the script block
        assert!(!html.contains(r#""label":"</script>""#));
        assert!(html.contains(r#""label":"<\/script>""#));
        assert!(!html.contains("idea-mode-box\">"));
    }

    #[test]
    fn test_render_html_prose_only() {
        let output = process("Plain text only.", "", PipelineOptions::default());
        let mut report = Report::new("Q", &output);
        report.idea_mode = true;
        let html = render_html(&report).unwrap();
        assert!(html.contains("<p>Plain text only.</p>"));
        assert!(!html.contains("semantic-graph\"></div>"));
        assert!(html.contains(r#"<div class="idea-mode-box">"#));
    }

    #[test]
    fn test_render_markdown_lists_graph_and_bibliography() {
        let output = output();
        let biblio = vec![AuthorBibliography {
            author: "Ada".into(),
            source: BibliographySource::Scholar,
            works: vec![Work {
                year: Some("1843".into()),
                title: "Notes".into(),
            }],
        }];
        let mut report = Report::new("Question", &output);
        report.bibliography = &biblio;
        let md = render_markdown(&report);

        assert!(md.starts_with("# Question\n\n"));
        assert!(md.contains("## Semantic Network"));
        assert!(md.contains("- **Physics** (`n1`, Root)"));
        assert!(md.contains("- `n1` → `n2` BT"));
        assert!(md.contains("--- SCHOLAR BIBLIOGRAPHY: ADA ---\n- [1843] Notes\n```"));
    }

    #[test]
    fn test_export_json_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("report.json");
        let output = output();
        let report = Report::new("Q", &output);
        write_report(&report, OutputFormat::Json, &path).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["title"], "Q");
        assert_eq!(value["graph"]["nodes"][0]["id"], "n1");
        assert_eq!(value["elements"][0]["data"]["size"], 90);
        assert_eq!(value["elements"][2]["data"]["rel_type"], "BT");
        assert!(value["prose"].as_str().unwrap().contains("semantic-node-highlight"));
    }

    #[test]
    fn test_export_html_and_markdown_files() {
        let dir = tempdir().unwrap();
        let output = output();
        let report = Report::new("Q", &output);

        let html_path = dir.path().join("report.html");
        write_report(&report, OutputFormat::Html, &html_path).unwrap();
        assert!(std::fs::read_to_string(&html_path).unwrap().starts_with("<!DOCTYPE html>"));

        let md_path = dir.path().join("report.md");
        write_report(&report, OutputFormat::Markdown, &md_path).unwrap();
        assert!(std::fs::read_to_string(&md_path).unwrap().contains("## Semantic Network"));
    }
}
