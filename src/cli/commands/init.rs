use anyhow::Result;
use console::{Emoji, style};
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

use crate::config::Config;

static ROCKET: Emoji<'_, '_> = Emoji("🚀 ", "");
static GEAR: Emoji<'_, '_> = Emoji("⚙️  ", "");
static CHECK: Emoji<'_, '_> = Emoji("✅ ", "[OK] ");
static WARN: Emoji<'_, '_> = Emoji("⚠️  ", "[!] ");
static KEY: Emoji<'_, '_> = Emoji("🔑 ", "");

pub async fn run(force: bool) -> Result<()> {
    println!();
    println!("{}", style(" ksynth - Initialization ").bold().reverse());
    println!();

    let config_path = Config::config_path()?;

    // Check if config already exists
    if config_path.exists() && !force {
        println!(
            "{}Configuration already exists at {}",
            WARN,
            style(config_path.display()).cyan()
        );
        println!("  Use {} to overwrite", style("--force").yellow());
        return Ok(());
    }

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template(&format!("{}{{spinner:.green}} {{msg}}", GEAR))
            .unwrap(),
    );
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner.set_message("Creating configuration...");

    let config_path = Config::default().save()?;
    spinner.finish_and_clear();

    println!(
        "{}Created configuration at {}",
        CHECK,
        style(config_path.display()).cyan()
    );

    println!();
    println!("{}", style("━".repeat(50)).dim());
    println!();
    println!("{}Next steps:", ROCKET);
    println!();
    println!("  {}Configure your Groq (OpenAI-compatible) API key:", KEY);
    println!("    {} ksynth auth --provider openai", style("$").dim());
    println!("    {} export GROQ_API_KEY=your-key", style("$").dim());
    println!();
    println!("  {}Run your first synthesis:", ROCKET);
    println!(
        "    {} ksynth synth --science Physics,Psychology -q \"How does attention shape memory?\"",
        style("$").dim()
    );
    println!();

    Ok(())
}
