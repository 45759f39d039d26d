use anyhow::{Context, Result};
use console::{Emoji, style};
use std::fs;
use std::io::{self, Read};

use crate::cli::ReportArgs;
use crate::config::Config;
use crate::export::{self, Report};
use crate::pipeline::{self, PipelineOptions};

static PAPER: Emoji<'_, '_> = Emoji("📄 ", "");
static CHECK: Emoji<'_, '_> = Emoji("✅ ", "[OK] ");
static WARN: Emoji<'_, '_> = Emoji("⚠️  ", "[!] ");
static BROWSER: Emoji<'_, '_> = Emoji("🌐 ", "");
static SPARKLE: Emoji<'_, '_> = Emoji("✨ ", "");

pub async fn run(input: String, authors: String, title: String, args: ReportArgs) -> Result<()> {
    println!();
    println!("{}", style(" ksynth - Render Response ").bold().reverse());
    println!();

    let config = Config::load_or_default()?;
    let response = read_input(&input)?;
    println!(
        "{}Read {} bytes from {}",
        PAPER,
        style(response.len()).cyan(),
        style(if input == "-" { "stdin" } else { input.as_str() }).cyan()
    );

    let output = pipeline::process(&response, &authors, resolve_options(&config, &args));
    let report = Report::new(title, &output);
    finish(&report, &args)
}

fn read_input(input: &str) -> Result<String> {
    if input == "-" {
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .context("Failed to read response from stdin")?;
        Ok(buffer)
    } else {
        fs::read_to_string(input).with_context(|| format!("Failed to read response file {}", input))
    }
}

/// Pipeline options from config, overridden by command-line flags.
pub(crate) fn resolve_options(config: &Config, args: &ReportArgs) -> PipelineOptions {
    let defaults = config.synthesis.pipeline_options();
    PipelineOptions {
        annotation: args.annotation.unwrap_or(defaults.annotation),
        extraction: args.extraction.unwrap_or(defaults.extraction),
    }
}

/// Write the report, print a summary and optionally open it.
pub(crate) fn finish(report: &Report, args: &ReportArgs) -> Result<()> {
    let output = report.output;
    if output.has_graph() {
        println!(
            "{}Graph: {} nodes, {} edges",
            CHECK,
            style(output.graph.nodes.len()).green().bold(),
            style(output.graph.edges.len()).green().bold()
        );
    } else {
        println!(
            "{}{}",
            WARN,
            style("No semantic graph could be decoded; the report contains prose only").yellow()
        );
    }

    let path = args.output_path();
    export::write_report(report, args.format, &path)?;

    println!();
    println!(
        "{}Report ({}): {}",
        SPARKLE,
        args.format,
        style(path.display()).cyan().underlined()
    );

    if args.open {
        export::open_in_browser(&path);
        println!("{}Report opened in browser", BROWSER);
    }
    println!();

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::OutputFormat;
    use crate::pipeline::{AnnotationMode, ExtractionStrategy};

    fn args() -> ReportArgs {
        ReportArgs {
            output: None,
            format: OutputFormat::Json,
            open: false,
            annotation: None,
            extraction: None,
        }
    }

    #[test]
    fn test_resolve_options_prefers_flags() {
        let mut config = Config::default();
        config.synthesis.annotation = AnnotationMode::Cumulative;

        let options = resolve_options(&config, &args());
        assert_eq!(options.annotation, AnnotationMode::Cumulative);
        assert_eq!(options.extraction, ExtractionStrategy::Greedy);

        let mut flagged = args();
        flagged.annotation = Some(AnnotationMode::Spans);
        flagged.extraction = Some(ExtractionStrategy::FirstObject);
        let options = resolve_options(&config, &flagged);
        assert_eq!(options.annotation, AnnotationMode::Spans);
        assert_eq!(options.extraction, ExtractionStrategy::FirstObject);
    }

    #[test]
    fn test_default_output_path_follows_format() {
        assert_eq!(args().output_path().to_str(), Some("ksynth_report.json"));
        let mut md = args();
        md.format = OutputFormat::Markdown;
        assert_eq!(md.output_path().to_str(), Some("ksynth_report.md"));
    }
}
