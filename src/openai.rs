//! OpenAI client construction shared by the embedder and the chat backend.

use crate::error::{KursError, Result};
use async_openai::{config::OpenAIConfig, Client};
use std::time::Duration;

/// Default timeout for OpenAI API requests (5 minutes).
pub const DEFAULT_TIMEOUT_SECS: u64 = 300;

/// Create an OpenAI client with the default timeout and API base.
pub fn create_client() -> Result<Client<OpenAIConfig>> {
    create_client_with(None, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
}

/// Create an OpenAI client with an optional API base override and a custom timeout.
///
/// The API key is read from `OPENAI_API_KEY`.
pub fn create_client_with(api_base: Option<&str>, timeout: Duration) -> Result<Client<OpenAIConfig>> {
    let http_client = reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| KursError::Config(format!("Failed to create HTTP client: {}", e)))?;

    let mut config = OpenAIConfig::default();
    if let Some(base) = api_base {
        config = config.with_api_base(base);
    }

    Ok(Client::with_config(config).with_http_client(http_client))
}
