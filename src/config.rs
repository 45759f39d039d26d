use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::form::Expertise;
use crate::pipeline::{AnnotationMode, ExtractionStrategy, PipelineOptions};

pub const GROQ_BASE_URL: &str = "https://api.groq.com/openai/v1";
pub const DEFAULT_OPENAI_MODEL: &str = "llama-3.3-70b-versatile";
pub const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434";
pub const DEFAULT_OLLAMA_MODEL: &str = "llama3.1";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_provider")]
    pub default_provider: String,
    pub default_model: Option<String>,
    #[serde(default)]
    pub expertise: Expertise,
    #[serde(default)]
    pub providers: ProvidersConfig,
    #[serde(default)]
    pub synthesis: SynthesisConfig,
    #[serde(default)]
    pub bibliography: BibliographyConfig,
}

fn default_provider() -> String {
    "openai".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ProvidersConfig {
    pub openai: Option<ProviderConfig>,
    pub ollama: Option<ProviderConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    #[serde(default)]
    pub api_key: String,
    pub base_url: Option<String>,
    pub model: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SynthesisConfig {
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    /// Sampling temperature for plain knowledge synthesis.
    #[serde(default = "default_temperature")]
    pub temperature: f64,
    /// Sampling temperature when the inquiry asks for new ideas.
    #[serde(default = "default_idea_temperature")]
    pub idea_temperature: f64,
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
    #[serde(default)]
    pub annotation: AnnotationMode,
    #[serde(default)]
    pub extraction: ExtractionStrategy,
}

fn default_max_tokens() -> u32 {
    4000
}

fn default_temperature() -> f64 {
    0.45
}

fn default_idea_temperature() -> f64 {
    0.75
}

fn default_request_timeout() -> u64 {
    120
}

impl Default for SynthesisConfig {
    fn default() -> Self {
        Self {
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
            idea_temperature: default_idea_temperature(),
            request_timeout_secs: default_request_timeout(),
            annotation: AnnotationMode::default(),
            extraction: ExtractionStrategy::default(),
        }
    }
}

impl SynthesisConfig {
    pub fn pipeline_options(&self) -> PipelineOptions {
        PipelineOptions {
            annotation: self.annotation,
            extraction: self.extraction,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BibliographyConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Per-request timeout for registry lookups.
    #[serde(default = "default_lookup_timeout")]
    pub timeout_secs: u64,
    #[serde(default = "default_max_works")]
    pub max_works: usize,
    #[serde(default = "default_scholar_limit")]
    pub scholar_limit: usize,
}

fn default_true() -> bool {
    true
}

fn default_lookup_timeout() -> u64 {
    5
}

fn default_max_works() -> usize {
    5
}

fn default_scholar_limit() -> usize {
    3
}

impl Default for BibliographyConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            timeout_secs: default_lookup_timeout(),
            max_works: default_max_works(),
            scholar_limit: default_scholar_limit(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_provider: default_provider(),
            default_model: None,
            expertise: Expertise::default(),
            providers: ProvidersConfig {
                openai: Some(ProviderConfig {
                    api_key: "${GROQ_API_KEY}".to_string(),
                    base_url: Some(GROQ_BASE_URL.to_string()),
                    model: Some(DEFAULT_OPENAI_MODEL.to_string()),
                }),
                ollama: Some(ProviderConfig {
                    api_key: String::new(),
                    base_url: Some(DEFAULT_OLLAMA_URL.to_string()),
                    model: Some(DEFAULT_OLLAMA_MODEL.to_string()),
                }),
            },
            synthesis: SynthesisConfig::default(),
            bibliography: BibliographyConfig::default(),
        }
    }
}

impl Config {
    /// Get the configuration directory path
    pub fn config_dir() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Could not determine config directory")?
            .join("ksynth");
        Ok(config_dir)
    }

    /// Get the configuration file path
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Load configuration from file
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            anyhow::bail!(
                "Configuration file not found at {}. Run 'ksynth init' first.",
                config_path.display()
            );
        }

        Self::load_from(&config_path)
    }

    /// Load the file as written, leaving `${VAR}` references in place.
    pub fn load_unexpanded() -> Result<Self> {
        let config_path = Self::config_path()?;
        if !config_path.exists() {
            anyhow::bail!("Configuration not found. Run 'ksynth init' first.");
        }
        Self::read(&config_path)
    }

    /// Load configuration if present, otherwise fall back to defaults.
    pub fn load_or_default() -> Result<Self> {
        let config_path = Self::config_path()?;
        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            tracing::debug!(
                "No configuration at {}, using defaults",
                config_path.display()
            );
            let mut config = Self::default();
            config.expand_env_vars();
            Ok(config)
        }
    }

    fn read(config_path: &Path) -> Result<Self> {
        let content = fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config file at {}", config_path.display()))?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file at {}", config_path.display()))
    }

    fn load_from(config_path: &Path) -> Result<Self> {
        let mut config = Self::read(config_path)?;

        // Expand environment variables in API keys
        config.expand_env_vars();

        Ok(config)
    }

    /// Write configuration to the standard location
    pub fn save(&self) -> Result<PathBuf> {
        let config_dir = Self::config_dir()?;
        fs::create_dir_all(&config_dir).context("Failed to create config directory")?;
        let config_path = config_dir.join("config.toml");
        let content = toml::to_string_pretty(self)?;
        fs::write(&config_path, content).context("Failed to write config file")?;
        Ok(config_path)
    }

    /// Expand environment variables in configuration values
    fn expand_env_vars(&mut self) {
        if let Some(ref mut provider) = self.providers.openai {
            provider.api_key = expand_env_var(&provider.api_key);
        }
        if let Some(ref mut provider) = self.providers.ollama {
            provider.api_key = expand_env_var(&provider.api_key);
        }
    }

    /// Get provider configuration by name
    pub fn get_provider(&self, name: &str) -> Option<&ProviderConfig> {
        match name.to_lowercase().as_str() {
            "openai" | "groq" => self.providers.openai.as_ref(),
            "ollama" => self.providers.ollama.as_ref(),
            _ => None,
        }
    }

    /// Store an API key, creating the provider section when missing.
    pub fn set_api_key(&mut self, name: &str, api_key: &str) -> Result<()> {
        let slot = match name.to_lowercase().as_str() {
            "openai" | "groq" => &mut self.providers.openai,
            "ollama" => &mut self.providers.ollama,
            other => anyhow::bail!("Unknown provider '{}'", other),
        };
        slot.get_or_insert_with(|| ProviderConfig {
            api_key: String::new(),
            base_url: None,
            model: None,
        })
        .api_key = api_key.to_string();
        Ok(())
    }
}

/// Expand environment variable references like ${VAR_NAME}
fn expand_env_var(value: &str) -> String {
    if value.starts_with("${") && value.ends_with('}') {
        let var_name = &value[2..value.len() - 1];
        std::env::var(var_name).unwrap_or_default()
    } else if let Some(var_name) = value.strip_prefix('$') {
        std::env::var(var_name).unwrap_or_default()
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_env_var_braces() {
        // SAFETY: test is single-threaded
        unsafe { std::env::set_var("KSYNTH_TEST_VAR_A", "value_a") };
        assert_eq!(expand_env_var("${KSYNTH_TEST_VAR_A}"), "value_a");
        unsafe { std::env::remove_var("KSYNTH_TEST_VAR_A") };
    }

    #[test]
    fn test_expand_env_var_dollar() {
        unsafe { std::env::set_var("KSYNTH_TEST_VAR_B", "value_b") };
        assert_eq!(expand_env_var("$KSYNTH_TEST_VAR_B"), "value_b");
        unsafe { std::env::remove_var("KSYNTH_TEST_VAR_B") };
    }

    #[test]
    fn test_expand_env_var_literal() {
        assert_eq!(expand_env_var("gsk_literal"), "gsk_literal");
    }

    #[test]
    fn test_expand_env_var_missing_returns_empty() {
        assert_eq!(expand_env_var("${DEFINITELY_NOT_SET_XYZ_123}"), "");
    }

    #[test]
    fn test_config_from_toml() {
        let toml_str = r#"
            default_provider = "ollama"
            default_model = "mistral"
            expertise = "Novice"

            [providers.ollama]
            api_key = ""
            base_url = "http://localhost:11434"
            model = "mistral"

            [synthesis]
            max_tokens = 2000
            annotation = "cumulative"
            extraction = "first-object"

            [bibliography]
            enabled = false
            timeout_secs = 2
        "#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.default_provider, "ollama");
        assert_eq!(config.default_model.as_deref(), Some("mistral"));
        assert_eq!(config.expertise, Expertise::Novice);
        assert_eq!(config.synthesis.max_tokens, 2000);
        assert_eq!(config.synthesis.temperature, 0.45);
        assert_eq!(config.synthesis.annotation, AnnotationMode::Cumulative);
        assert_eq!(config.synthesis.extraction, ExtractionStrategy::FirstObject);
        assert!(!config.bibliography.enabled);
        assert_eq!(config.bibliography.timeout_secs, 2);
        assert_eq!(config.bibliography.max_works, 5);
    }

    #[test]
    fn test_config_default_values() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.default_provider, "openai");
        assert_eq!(config.expertise, Expertise::Expert);
        assert_eq!(config.synthesis.max_tokens, 4000);
        assert_eq!(config.synthesis.idea_temperature, 0.75);
        assert_eq!(config.synthesis.annotation, AnnotationMode::Spans);
        assert_eq!(config.synthesis.extraction, ExtractionStrategy::Greedy);
        assert_eq!(config.bibliography.timeout_secs, 5);
        assert_eq!(config.bibliography.scholar_limit, 3);
        assert!(config.providers.openai.is_none());
    }

    #[test]
    fn test_get_provider() {
        let toml_str = r#"
            [providers.openai]
            api_key = "gsk-test"
            base_url = "https://api.groq.com/openai/v1"
        "#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert!(config.get_provider("openai").is_some());
        assert!(config.get_provider("groq").is_some());
        assert!(config.get_provider("ollama").is_none());
        assert!(config.get_provider("nonexistent").is_none());
        assert_eq!(config.get_provider("openai").unwrap().api_key, "gsk-test");
    }

    #[test]
    fn test_set_api_key_creates_section() {
        let mut config: Config = toml::from_str("").unwrap();
        config.set_api_key("openai", "gsk-new").unwrap();
        assert_eq!(config.get_provider("openai").unwrap().api_key, "gsk-new");
        assert!(config.get_provider("openai").unwrap().base_url.is_none());
        assert!(config.set_api_key("anthropic", "x").is_err());
    }

    #[test]
    fn test_config_roundtrip_toml() {
        let config = Config::default();
        let serialized = toml::to_string_pretty(&config).unwrap();
        let deserialized: Config = toml::from_str(&serialized).unwrap();
        assert_eq!(deserialized.default_provider, "openai");
        assert_eq!(
            deserialized.providers.openai.unwrap().api_key,
            "${GROQ_API_KEY}"
        );
        assert_eq!(deserialized.synthesis.annotation, AnnotationMode::Spans);
    }
}
