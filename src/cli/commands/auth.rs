use anyhow::Result;
use console::{Emoji, style};
use std::io::{self, Write};
use std::time::Duration;

use crate::cli::LlmProvider;
use crate::config::{Config, DEFAULT_OLLAMA_URL};

static KEY: Emoji<'_, '_> = Emoji("🔑 ", "");
static CHECK: Emoji<'_, '_> = Emoji("✅ ", "[OK] ");
static CROSS: Emoji<'_, '_> = Emoji("❌ ", "[X] ");
static ROBOT: Emoji<'_, '_> = Emoji("🤖 ", "");

const GROQ_KEY_ENV: &str = "GROQ_API_KEY";

pub async fn run(provider: Option<LlmProvider>, key: Option<String>, list: bool) -> Result<()> {
    println!();
    println!("{}", style(" ksynth - Authentication ").bold().reverse());
    println!();

    if list {
        return list_providers().await;
    }

    let provider = match provider {
        Some(p) => p,
        None => select_provider()?,
    };

    let api_key = match key {
        Some(k) => k,
        None => prompt_api_key(provider)?,
    };

    let mut config = Config::load_unexpanded()?;
    config.set_api_key(&provider.to_string(), &api_key)?;
    let path = config.save()?;

    println!();
    println!(
        "{}API key for {} saved to {}",
        CHECK,
        style(provider.to_string()).cyan().bold(),
        style(path.display()).dim()
    );

    Ok(())
}

async fn list_providers() -> Result<()> {
    println!("{}Configured LLM Providers", ROBOT);
    println!();

    let config = match Config::load() {
        Ok(c) => c,
        Err(_) => {
            println!(
                "{}",
                style("No configuration found. Run 'ksynth init' first.").yellow()
            );
            return Ok(());
        }
    };

    let providers = [
        ("OpenAI/Groq", openai_status(&config)),
        ("Ollama", ollama_status(&config).await),
    ];

    for (name, (configured, detail)) in providers {
        let status_icon = if configured { CHECK } else { CROSS };
        let status_text = if configured {
            style("Configured").green()
        } else {
            style("Not configured").red()
        };

        println!(
            "  {}{:<12} {} {}",
            status_icon,
            name,
            status_text,
            style(detail).dim()
        );
    }

    println!();
    println!("{}Set API keys with:", KEY);
    println!("  {} ksynth auth --provider openai", style("$").dim());
    println!();
    println!("Or set the environment variable:");
    println!("  {} export {}=your-key", style("$").dim(), GROQ_KEY_ENV);

    Ok(())
}

fn openai_status(config: &Config) -> (bool, String) {
    // Keys are already expanded, so an env-backed key shows up as non-empty.
    match config.get_provider("openai") {
        Some(p) if !p.api_key.is_empty() => {
            let from_env = std::env::var(GROQ_KEY_ENV).is_ok_and(|v| v == p.api_key);
            let source = if from_env {
                format!("(from {})", GROQ_KEY_ENV)
            } else {
                "(from config)".to_string()
            };
            (true, source)
        }
        _ => (false, String::new()),
    }
}

async fn ollama_status(config: &Config) -> (bool, String) {
    let base_url = config
        .get_provider("ollama")
        .and_then(|p| p.base_url.as_deref())
        .unwrap_or(DEFAULT_OLLAMA_URL);

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(2))
        .build();

    if let Ok(client) = client
        && let Ok(resp) = client.get(format!("{}/api/tags", base_url)).send().await
        && resp.status().is_success()
    {
        return (true, format!("(running at {})", base_url));
    }

    (false, format!("(not running at {})", base_url))
}

fn select_provider() -> Result<LlmProvider> {
    println!("Select LLM Provider:");
    println!();
    println!("  {} OpenAI-compatible (Groq by default)", style("1.").cyan());
    println!("  {} Ollama (Local - Free)", style("2.").cyan());
    println!();

    print!("{} Enter choice [1-2]: ", style("?").green().bold());
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;

    match input.trim() {
        "2" => Ok(LlmProvider::Ollama),
        "1" => Ok(LlmProvider::OpenAI),
        _ => {
            println!("  {}", style("Invalid choice, defaulting to OpenAI/Groq").yellow());
            Ok(LlmProvider::OpenAI)
        }
    }
}

fn prompt_api_key(provider: LlmProvider) -> Result<String> {
    if provider == LlmProvider::Ollama {
        println!();
        println!("  {} Ollama doesn't require an API key.", style("ℹ").blue());
        println!(
            "  Make sure Ollama is running: {} ollama serve",
            style("$").dim()
        );
        return Ok(String::new());
    }

    print!("{} Enter your Groq API key: ", style("?").green().bold());
    io::stdout().flush()?;

    let mut api_key = String::new();
    io::stdin().read_line(&mut api_key)?;
    let api_key = api_key.trim().to_string();

    if api_key.is_empty() {
        anyhow::bail!("API key cannot be empty");
    }

    if !api_key.starts_with("gsk_") {
        println!(
            "  {}",
            style("Warning: Groq API keys typically start with 'gsk_'").yellow()
        );
    }

    Ok(api_key)
}
