//! Upstream model integrations

mod gemini;
mod ollama;

use async_trait::async_trait;
use thiserror::Error;

use crate::config::Config;

pub use gemini::{GeminiConfig, GeminiProvider};
pub use ollama::OllamaProvider;

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("Unknown provider: {0}")]
    UnknownProvider(String),

    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("Upstream unavailable: {0}")]
    Unavailable(String),

    #[error("Upstream request timed out")]
    Timeout,

    #[error("Request failed: {0}")]
    RequestFailed(reqwest::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl From<reqwest::Error> for ProviderError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            ProviderError::Timeout
        } else if e.is_connect() {
            ProviderError::Unavailable(e.to_string())
        } else if e.is_decode() {
            ProviderError::InvalidResponse(e.to_string())
        } else {
            ProviderError::RequestFailed(e)
        }
    }
}

/// A text-completion service: one prompt in, generated text out.
#[async_trait]
pub trait ModelGateway: Send + Sync {
    /// Send the prompt upstream and return the generated text verbatim
    async fn ask(&self, prompt: &str) -> Result<String, ProviderError>;
}

pub enum Provider {
    Gemini(GeminiProvider),
    Ollama(OllamaProvider),
}

impl Provider {
    pub fn from_config(config: &Config) -> Result<Self, ProviderError> {
        match config.provider.to_lowercase().as_str() {
            "gemini" => {
                let api_key = config
                    .gemini_api_key
                    .clone()
                    .ok_or_else(|| ProviderError::NotConfigured("GEMINI_API_KEY is not set".into()))?;
                let gemini = GeminiConfig {
                    base_url: config.gemini_url.clone(),
                    api_key,
                    model: config.gemini_model.clone(),
                    timeout_secs: config.upstream_timeout_secs,
                };
                Ok(Provider::Gemini(GeminiProvider::new(gemini)?))
            }
            "ollama" => Ok(Provider::Ollama(OllamaProvider::new(
                config.ollama_url.clone(),
                config.ollama_model.clone(),
                config.upstream_timeout_secs,
            )?)),
            other => Err(ProviderError::UnknownProvider(other.to_string())),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Provider::Gemini(_) => "gemini",
            Provider::Ollama(_) => "ollama",
        }
    }
}

#[async_trait]
impl ModelGateway for Provider {
    async fn ask(&self, prompt: &str) -> Result<String, ProviderError> {
        match self {
            Provider::Gemini(p) => p.generate(prompt).await,
            Provider::Ollama(p) => p.generate(prompt).await,
        }
    }
}
