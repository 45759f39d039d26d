pub mod commands;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::form::{Expertise, GoalContext};
use crate::ontology::Metamodel;
use crate::pipeline::{AnnotationMode, ExtractionStrategy};

#[derive(Parser)]
#[command(name = "ksynth")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Interdisciplinary knowledge synthesis with LLMs and semantic graphs", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write the default configuration file
    Init {
        /// Force overwrite existing configuration
        #[arg(short, long, default_value = "false")]
        force: bool,
    },

    /// Configure API keys for LLM providers
    #[command(long_about = "Configure API keys for LLM providers.\n\n\
        Supported providers: openai, ollama.\n\
        The openai provider talks to any OpenAI-compatible API and defaults to Groq\n\
        (https://api.groq.com/openai/v1). Point it elsewhere with base_url in\n\
        the config file.\n\n\
        Keys may also reference environment variables, e.g. api_key = \"${GROQ_API_KEY}\".")]
    Auth {
        /// Provider to configure (openai, ollama)
        #[arg(short, long)]
        provider: Option<LlmProvider>,

        /// Set API key directly (alternative to interactive prompt)
        #[arg(short, long)]
        key: Option<String>,

        /// List configured providers and their status
        #[arg(long, default_value = "false")]
        list: bool,
    },

    /// Run a full synthesis: prompt the model, annotate its answer and render the report
    Synth(SynthArgs),

    /// Post-process a saved model response without calling the model
    Render {
        /// Response file, or '-' for stdin
        #[arg(required = true)]
        input: String,

        /// Comma-separated author names to link
        #[arg(short, long, default_value = "")]
        authors: String,

        /// Report title
        #[arg(short, long, default_value = "Knowledge Synthesis")]
        title: String,

        #[command(flatten)]
        report: ReportArgs,
    },

    /// Browse the knowledge base behind the form
    Explore {
        /// Only show one section
        #[arg(short, long)]
        section: Option<ExploreSection>,

        /// Show the methods and tools of one science field
        #[arg(long)]
        science: Option<String>,

        /// Toggle the user guide
        #[arg(long, default_value = "false")]
        guide: bool,
    },
}

#[derive(Args, Debug)]
pub struct SynthArgs {
    /// The inquiry
    #[arg(short, long)]
    pub query: Option<String>,

    /// Comma-separated target authors (bibliographies are looked up)
    #[arg(short, long, default_value = "")]
    pub authors: String,

    /// User profiles (comma-separated)
    #[arg(long = "profile", value_delimiter = ',')]
    pub profiles: Vec<String>,

    /// Science fields (comma-separated)
    #[arg(long = "science", value_delimiter = ',')]
    pub sciences: Vec<String>,

    /// Expertise level
    #[arg(long)]
    pub expertise: Option<Expertise>,

    /// Structural models (comma-separated)
    #[arg(long = "structure", value_delimiter = ',')]
    pub models: Vec<String>,

    /// Scientific paradigms (comma-separated)
    #[arg(long = "paradigm", value_delimiter = ',')]
    pub paradigms: Vec<String>,

    /// Goal context
    #[arg(long, default_value = "scientific-research")]
    pub goal: GoalContext,

    /// Mental approaches (comma-separated)
    #[arg(long = "approach", value_delimiter = ',')]
    pub approaches: Vec<String>,

    /// Methodologies offered by the selected sciences (comma-separated)
    #[arg(long = "method", value_delimiter = ',')]
    pub methods: Vec<String>,

    /// Specific tools offered by the selected sciences (comma-separated)
    #[arg(long = "tool", value_delimiter = ',')]
    pub tools: Vec<String>,

    /// Supplementary .txt file appended to the inquiry
    #[arg(long)]
    pub attach: Option<PathBuf>,

    /// Metamodels used in idea-production mode
    #[arg(long = "metamodel", value_delimiter = ',')]
    pub metamodels: Vec<Metamodel>,

    /// Skip ORCID / Semantic Scholar lookups
    #[arg(long, default_value = "false")]
    pub no_bibliography: bool,

    /// Save the raw model response to this file
    #[arg(long)]
    pub save_response: Option<PathBuf>,

    /// LLM provider. Any OpenAI-compatible API uses 'openai' with a custom base_url in config
    #[arg(short, long, env = "KSYNTH_PROVIDER")]
    pub provider: Option<LlmProvider>,

    /// Model name (provider-specific, e.g. llama-3.3-70b-versatile)
    #[arg(short, long, env = "KSYNTH_MODEL")]
    pub model: Option<String>,

    #[command(flatten)]
    pub report: ReportArgs,
}

/// Output options shared by `synth` and `render`.
#[derive(Args, Debug, Clone)]
pub struct ReportArgs {
    /// Output file path (defaults to ksynth_report.<format>)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, default_value = "html")]
    pub format: OutputFormat,

    /// Open the report in the default browser
    #[arg(long, default_value = "false")]
    pub open: bool,

    /// How node labels are linked in the prose
    #[arg(long)]
    pub annotation: Option<AnnotationMode>,

    /// How the graph JSON is located after the marker
    #[arg(long)]
    pub extraction: Option<ExtractionStrategy>,
}

impl ReportArgs {
    pub fn output_path(&self) -> PathBuf {
        self.output
            .clone()
            .unwrap_or_else(|| PathBuf::from(format!("ksynth_report.{}", self.format.extension())))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum LlmProvider {
    #[default]
    #[value(name = "openai")]
    OpenAI,
    Ollama,
}

impl std::fmt::Display for LlmProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LlmProvider::OpenAI => write!(f, "openai"),
            LlmProvider::Ollama => write!(f, "ollama"),
        }
    }
}

impl LlmProvider {
    /// Resolve a provider name from the config file.
    pub fn from_config(name: &str) -> Self {
        match name.to_lowercase().as_str() {
            "ollama" => LlmProvider::Ollama,
            _ => LlmProvider::OpenAI,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Html,
    Json,
    Markdown,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Html => "html",
            OutputFormat::Json => "json",
            OutputFormat::Markdown => "md",
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Html => write!(f, "html"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Markdown => write!(f, "markdown"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExploreSection {
    Profiles,
    Sciences,
    Models,
    Paradigms,
    Goals,
    Approaches,
    Metamodels,
}
