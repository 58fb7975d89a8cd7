//! Application configuration

pub mod client;
pub mod prompts;

use std::env;

pub use client::ClientConfig;
pub use prompts::{builtin as prompts_builtin, PromptError, PromptTemplate};

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    /// The one browser origin allowed to call the API
    pub allowed_origin: String,
    /// Upstream model provider: "gemini" or "ollama"
    pub provider: String,
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
    pub gemini_url: String,
    pub ollama_url: String,
    pub ollama_model: String,
    pub upstream_timeout_secs: u64,
    /// Built-in persona name
    pub persona: String,
    /// TOML persona template, takes precedence over `persona`
    pub persona_file: Option<String>,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from any variable source, falling back to defaults
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let or = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        Self {
            host: or("HOST", "127.0.0.1"),
            port: lookup("PORT")
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            allowed_origin: or("ALLOWED_ORIGIN", "http://localhost:5173"),
            provider: or("LLM_PROVIDER", "gemini"),
            gemini_api_key: lookup("GEMINI_API_KEY").filter(|k| !k.is_empty()),
            gemini_model: or("GEMINI_MODEL", "gemini-2.5-pro"),
            gemini_url: or(
                "GEMINI_URL",
                "https://generativelanguage.googleapis.com/v1beta",
            ),
            ollama_url: or("OLLAMA_URL", "http://localhost:11434"),
            ollama_model: or("OLLAMA_MODEL", "llama3.2"),
            upstream_timeout_secs: lookup("UPSTREAM_TIMEOUT_SECS")
                .and_then(|t| t.parse().ok())
                .unwrap_or(120),
            persona: or("PERSONA", "lazy"),
            persona_file: lookup("PERSONA_FILE").filter(|p| !p.is_empty()),
        }
    }

    /// Resolve the persona preamble: template file > built-in name
    pub async fn load_persona(&self) -> Result<String, PromptError> {
        match &self.persona_file {
            Some(path) => {
                let template = PromptTemplate::load_from_file(path.as_ref()).await?;
                tracing::info!("Loaded persona '{}' from {}", template.persona.name, path);
                Ok(template.system_prompt.content)
            }
            None => prompts_builtin::by_name(&self.persona)
                .map(str::to_string)
                .ok_or_else(|| PromptError::NotFound(self.persona.clone())),
        }
    }
}
