use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::{CompletionRequest, LlmProviderTrait};
use crate::error::FormError;

/// Any OpenAI-compatible chat completion API (Groq by default).
pub struct OpenAIProvider {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

#[derive(Serialize)]
struct OpenAIRequest<'a> {
    model: &'a str,
    messages: [Message<'a>; 2],
    max_tokens: u32,
    temperature: f32,
}

#[derive(Serialize)]
struct Message<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct OpenAIResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

impl OpenAIProvider {
    pub fn new(api_key: &str, model: &str, base_url: &str, timeout: Duration) -> Result<Self> {
        if api_key.is_empty() {
            return Err(FormError::MissingApiKey {
                provider: "openai".to_string(),
                env_var: "GROQ_API_KEY",
            }
            .into());
        }

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            api_key: api_key.to_string(),
            model: model.to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl LlmProviderTrait for OpenAIProvider {
    async fn complete(&self, request: &CompletionRequest) -> Result<String> {
        let body = OpenAIRequest {
            model: &self.model,
            messages: [
                Message {
                    role: "system",
                    content: &request.system,
                },
                Message {
                    role: "user",
                    content: &request.user,
                },
            ],
            max_tokens: request.max_tokens,
            temperature: request.temperature,
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .context("Failed to send request to the chat completion API")?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            anyhow::bail!("Chat completion API error ({}): {}", status, error_text);
        }

        let response: OpenAIResponse = response
            .json()
            .await
            .context("Failed to parse chat completion response")?;

        response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .context("No content in chat completion response")
    }

    fn name(&self) -> &'static str {
        "openai"
    }
}
