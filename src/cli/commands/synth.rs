use anyhow::{Context, Result};
use console::{Emoji, style};
use indicatif::{HumanDuration, ProgressBar, ProgressStyle};
use std::fs;
use std::time::{Duration, Instant};

use super::render::{finish, resolve_options};
use crate::bibliography::{self, AuthorBibliography, RegistryClient};
use crate::cli::{LlmProvider, SynthArgs};
use crate::config::Config;
use crate::export::Report;
use crate::form::{Attachment, SessionState, SynthesisForm};
use crate::llm::{CompletionRequest, LlmClient, SynthesisPrompt};
use crate::ontology::Metamodel;
use crate::pipeline;

static BRAIN: Emoji<'_, '_> = Emoji("🧠 ", "");
static BOOKS: Emoji<'_, '_> = Emoji("📚 ", "");
static LINK: Emoji<'_, '_> = Emoji("🔗 ", "");
static SPARKLE: Emoji<'_, '_> = Emoji("✨ ", "");
static CHECK: Emoji<'_, '_> = Emoji("✅ ", "[OK] ");
static PAPER: Emoji<'_, '_> = Emoji("📄 ", "");

pub async fn run(args: SynthArgs, session: &SessionState) -> Result<()> {
    let started = Instant::now();

    println!();
    println!(
        "{}",
        style(" ksynth - Multi-Dimensional Synthesis ").bold().reverse()
    );
    println!();

    let config = Config::load_or_default()?;
    let form = build_form(&args, session)?;

    let provider = args
        .provider
        .unwrap_or_else(|| LlmProvider::from_config(&config.default_provider));
    let model = args.model.clone().or(config.default_model.clone());
    let client = LlmClient::new(provider, &config, model.as_deref())?;

    println!(
        "{}Provider: {}",
        BRAIN,
        style(&provider.to_string()).cyan().bold()
    );
    println!("{}Model: {}", BRAIN, style(client.model()).cyan());
    println!("{}Fields: {}", BRAIN, style(form.sciences.join(", ")).cyan());
    if let Some(attachment) = &form.attachment {
        println!("{}Attachment: {}", PAPER, style(&attachment.name).cyan());
    }

    let bibliography = if args.no_bibliography || !config.bibliography.enabled {
        Vec::new()
    } else {
        fetch_bibliographies(&config, &form.authors).await?
    };

    let metamodels = if args.metamodels.is_empty() {
        Metamodel::all()
    } else {
        args.metamodels.clone()
    };
    let prompt = SynthesisPrompt::build(
        &form,
        &bibliography::to_prompt_text(&bibliography),
        &metamodels,
    );

    println!("{}Logic: {}", LINK, style(prompt.logic).cyan());
    if prompt.idea_mode {
        println!(
            "{}{}",
            SPARKLE,
            style("Production & Synthesis Mode engaged: generating novel concepts using Metamodel and Mental Logic")
                .yellow()
                .bold()
        );
    }
    println!();

    let request = CompletionRequest::from_prompt(&prompt, &config);
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template(&format!("{}{{spinner:.green}} {{msg}} [{{elapsed}}]", BRAIN))
            .unwrap(),
    );
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner.set_message("Synthesizing interdisciplinary knowledge...");

    let response = client.complete(&request).await;
    spinner.finish_and_clear();
    let response = response.context("Synthesis failed")?;

    println!(
        "{}Received {} characters from {}",
        CHECK,
        style(response.len()).green().bold(),
        client.provider_name()
    );

    if let Some(path) = &args.save_response {
        fs::write(path, &response)
            .with_context(|| format!("Failed to save response to {}", path.display()))?;
        println!("{}Raw response saved to {}", PAPER, style(path.display()).cyan());
    }

    let output = pipeline::process(
        &response,
        &form.authors,
        resolve_options(&config, &args.report),
    );

    let report = Report {
        title: form.inquiry.clone(),
        caption: Some(format!(
            "{} utilizing Human Thinking Metamodel Logic",
            prompt.logic
        )),
        idea_mode: prompt.idea_mode,
        output: &output,
        bibliography: &bibliography,
    };
    finish(&report, &args.report)?;

    println!(
        "{}Done in {}",
        SPARKLE,
        style(HumanDuration(started.elapsed())).bold()
    );
    println!();

    Ok(())
}

/// Fill the form from command-line flags; empty selections keep the defaults.
fn build_form(args: &SynthArgs, session: &SessionState) -> Result<SynthesisForm> {
    let mut form = SynthesisForm::with_defaults(session);

    let replace = |target: &mut Vec<String>, values: &[String]| {
        if !values.is_empty() {
            *target = values.to_vec();
        }
    };
    replace(&mut form.profiles, &args.profiles);
    replace(&mut form.sciences, &args.sciences);
    replace(&mut form.models, &args.models);
    replace(&mut form.paradigms, &args.paradigms);
    replace(&mut form.approaches, &args.approaches);
    form.methods = args.methods.clone();
    form.tools = args.tools.clone();

    if let Some(expertise) = args.expertise {
        form.expertise = expertise;
    }
    form.goal = args.goal;
    form.authors = args.authors.clone();
    form.inquiry = args.query.clone().unwrap_or_default();
    form.attachment = args.attach.as_deref().map(Attachment::read).transpose()?;

    form.normalize()?;
    Ok(form)
}

async fn fetch_bibliographies(config: &Config, authors: &str) -> Result<Vec<AuthorBibliography>> {
    if authors.trim().is_empty() {
        return Ok(Vec::new());
    }

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template(&format!("{}{{spinner:.green}} {{msg}}", BOOKS))
            .unwrap(),
    );
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner.set_message("Fetching bibliographies from ORCID / Semantic Scholar...");

    let registry = RegistryClient::new(&config.bibliography)?;
    let found = bibliography::fetch_all(&registry, authors).await;
    spinner.finish_and_clear();

    println!(
        "{}Bibliographies found: {}",
        BOOKS,
        style(found.len()).green().bold()
    );
    Ok(found)
}
