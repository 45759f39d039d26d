mod ollama;
mod openai;
pub mod prompts;

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;

use crate::cli::LlmProvider;
use crate::config::{
    Config, DEFAULT_OLLAMA_MODEL, DEFAULT_OLLAMA_URL, DEFAULT_OPENAI_MODEL, GROQ_BASE_URL,
};

pub use prompts::SynthesisPrompt;

/// One chat completion: a system message, a user message and sampling settings.
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    pub system: String,
    pub user: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl CompletionRequest {
    pub fn from_prompt(prompt: &SynthesisPrompt, config: &Config) -> Self {
        Self {
            system: prompt.system.clone(),
            user: prompt.user.clone(),
            temperature: prompt.temperature(
                config.synthesis.temperature,
                config.synthesis.idea_temperature,
            ) as f32,
            max_tokens: config.synthesis.max_tokens,
        }
    }
}

/// Trait for LLM providers
#[async_trait]
pub trait LlmProviderTrait: Send + Sync {
    /// Return the raw text of the first completion choice
    async fn complete(&self, request: &CompletionRequest) -> Result<String>;

    /// Get the provider name
    fn name(&self) -> &'static str;
}

/// Main LLM client that abstracts over providers
pub struct LlmClient {
    provider: Box<dyn LlmProviderTrait>,
    model: String,
}

impl LlmClient {
    /// Create a new LLM client for the specified provider
    pub fn new(
        provider: LlmProvider,
        config: &Config,
        model_override: Option<&str>,
    ) -> Result<Self> {
        let timeout = Duration::from_secs(config.synthesis.request_timeout_secs);

        let (provider_impl, model): (Box<dyn LlmProviderTrait>, String) = match provider {
            LlmProvider::OpenAI => {
                let provider_config = config
                    .get_provider("openai")
                    .context("OpenAI-compatible provider not configured")?;
                let model = model_override
                    .map(String::from)
                    .or_else(|| provider_config.model.clone())
                    .unwrap_or_else(|| DEFAULT_OPENAI_MODEL.to_string());
                let base_url = provider_config.base_url.as_deref().unwrap_or(GROQ_BASE_URL);
                (
                    Box::new(openai::OpenAIProvider::new(
                        &provider_config.api_key,
                        &model,
                        base_url,
                        timeout,
                    )?),
                    model,
                )
            }
            LlmProvider::Ollama => {
                let provider_config = config.get_provider("ollama");
                let model = model_override
                    .map(String::from)
                    .or_else(|| provider_config.and_then(|p| p.model.clone()))
                    .unwrap_or_else(|| DEFAULT_OLLAMA_MODEL.to_string());
                let base_url = provider_config
                    .and_then(|p| p.base_url.as_deref())
                    .unwrap_or(DEFAULT_OLLAMA_URL);
                (
                    Box::new(ollama::OllamaProvider::new(base_url, &model, timeout)),
                    model,
                )
            }
        };

        Ok(Self {
            provider: provider_impl,
            model,
        })
    }

    pub async fn complete(&self, request: &CompletionRequest) -> Result<String> {
        tracing::debug!(
            provider = self.provider.name(),
            model = %self.model,
            temperature = request.temperature,
            "Sending completion request"
        );
        self.provider.complete(request).await
    }

    /// Get the provider name
    pub fn provider_name(&self) -> &'static str {
        self.provider.name()
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::{SessionState, SynthesisForm};
    use crate::ontology::Metamodel;

    #[test]
    fn test_request_temperature_follows_idea_mode() {
        let config = Config::default();
        let mut form = SynthesisForm::with_defaults(&SessionState::default());

        form.inquiry = "Summarize".into();
        let prompt = SynthesisPrompt::build(&form, "", &Metamodel::all());
        let request = CompletionRequest::from_prompt(&prompt, &config);
        assert_eq!(request.temperature, 0.45);
        assert_eq!(request.max_tokens, 4000);

        form.inquiry = "create useful ideas".into();
        let prompt = SynthesisPrompt::build(&form, "", &Metamodel::all());
        let request = CompletionRequest::from_prompt(&prompt, &config);
        assert_eq!(request.temperature, 0.75);
    }

    #[test]
    fn test_openai_client_requires_api_key() {
        let mut config = Config::default();
        if let Some(openai) = config.providers.openai.as_mut() {
            openai.api_key = String::new();
        }
        let err = LlmClient::new(LlmProvider::OpenAI, &config, None)
            .err()
            .expect("missing key must fail");
        assert!(err.to_string().contains("Missing API key"));
    }

    #[test]
    fn test_client_model_resolution() {
        let mut config = Config::default();
        if let Some(openai) = config.providers.openai.as_mut() {
            openai.api_key = "gsk-test".into();
        }
        let client = LlmClient::new(LlmProvider::OpenAI, &config, None).unwrap();
        assert_eq!(client.model(), DEFAULT_OPENAI_MODEL);
        assert_eq!(client.provider_name(), "openai");

        let client = LlmClient::new(LlmProvider::Ollama, &config, Some("mistral")).unwrap();
        assert_eq!(client.model(), "mistral");
        assert_eq!(client.provider_name(), "ollama");
    }
}
