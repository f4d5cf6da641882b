//! Anthropic Messages API backend.

use super::{
    GenerationRequest, GenerationResponse, GenerationService, Message, ToolChoice, ToolDefinition,
};
use crate::config::GenerationSettings;
use crate::error::{KursError, Result};
use async_trait::async_trait;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, instrument};

const DEFAULT_API_BASE: &str = "https://api.anthropic.com";
const API_VERSION: &str = "2023-06-01";

/// Generation backend talking to Anthropic's Messages API.
pub struct AnthropicGenerator {
    http: reqwest::Client,
    api_base: String,
    api_key: String,
    model: String,
    max_tokens: u32,
    temperature: f32,
}

/// Request body; borrows everything from the [`GenerationRequest`].
#[derive(Serialize)]
struct MessagesBody<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f32,
    system: &'a str,
    messages: &'a [Message],
    #[serde(skip_serializing_if = "Option::is_none")]
    tools: Option<&'a [ToolDefinition]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_choice: Option<ToolChoice>,
}

impl AnthropicGenerator {
    /// Create a generator from settings. The API key comes from `ANTHROPIC_API_KEY`.
    pub fn from_settings(settings: &GenerationSettings) -> Result<Self> {
        let env = settings.provider.api_key_env();
        let api_key = std::env::var(env)
            .map_err(|_| KursError::Config(format!("{} not set", env)))?;

        Self::build(
            &api_key,
            &settings.model,
            settings.api_base.as_deref(),
            settings.max_tokens,
            settings.temperature,
            Duration::from_secs(settings.timeout_secs),
        )
    }

    fn build(
        api_key: &str,
        model: &str,
        api_base: Option<&str>,
        max_tokens: u32,
        temperature: f32,
        timeout: Duration,
    ) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| KursError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http,
            api_base: api_base
                .unwrap_or(DEFAULT_API_BASE)
                .trim_end_matches('/')
                .to_string(),
            api_key: api_key.to_string(),
            model: model.to_string(),
            max_tokens,
            temperature,
        })
    }
}

#[async_trait]
impl GenerationService for AnthropicGenerator {
    #[instrument(skip(self, request), fields(model = %self.model, messages = request.messages.len()))]
    async fn create(&self, request: &GenerationRequest) -> Result<GenerationResponse> {
        let body = MessagesBody {
            model: &self.model,
            max_tokens: self.max_tokens,
            temperature: self.temperature,
            system: &request.system,
            messages: &request.messages,
            tools: request.tools.as_deref(),
            tool_choice: request.tool_choice,
        };

        let response = self
            .http
            .post(format!("{}/v1/messages", self.api_base))
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(KursError::Generation(format!(
                "Anthropic API returned {}: {}",
                status, text
            )));
        }

        let parsed: GenerationResponse = response.json().await?;
        debug!(
            "Anthropic response: stop_reason={:?}, {} blocks",
            parsed.stop_reason,
            parsed.content.len()
        );

        Ok(parsed)
    }
}
