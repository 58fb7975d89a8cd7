//! Terminal client configuration loaded from TOML files
//!
//! Tells `lazybot-chat` where the API lives and where the local
//! conversation store is kept.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Root client configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClientConfig {
    /// API endpoint settings
    #[serde(default)]
    pub server: ServerConfig,

    /// Local persistence settings
    #[serde(default)]
    pub storage: StorageConfig,
}

impl ClientConfig {
    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Load configuration from a TOML string
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        let config: ClientConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !(self.server.url.starts_with("http://") || self.server.url.starts_with("https://")) {
            return Err(ConfigError::Validation(format!(
                "server.url must be an http(s) URL, got '{}'",
                self.server.url
            )));
        }
        Ok(())
    }

    /// Full URL of the chat endpoint
    pub fn chat_url(&self) -> String {
        format!("{}/chat", self.server.url.trim_end_matches('/'))
    }
}

/// Where the chat API is served
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_url")]
    pub url: String,

    /// Per-request timeout; unset means wait for as long as the server takes
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

fn default_url() -> String {
    "http://localhost:3000".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            timeout_secs: None,
        }
    }
}

/// Local key-value store location
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_storage_path")]
    pub path: PathBuf,
}

fn default_storage_path() -> PathBuf {
    PathBuf::from("./data/lazybot-client.db")
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: default_storage_path(),
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_CONFIG: &str = r#"
[server]
url = "https://gemini-lazy-bot.example/"
timeout_secs = 30

[storage]
path = "/tmp/lazybot/client.db"
"#;

    #[test]
    fn test_parse_config() {
        let config = ClientConfig::from_str(SAMPLE_CONFIG).unwrap();

        assert_eq!(config.server.timeout_secs, Some(30));
        assert_eq!(config.storage.path, PathBuf::from("/tmp/lazybot/client.db"));
        assert_eq!(config.chat_url(), "https://gemini-lazy-bot.example/chat");
    }

    #[test]
    fn test_empty_config() {
        let config = ClientConfig::from_str("").unwrap();
        assert_eq!(config.chat_url(), "http://localhost:3000/chat");
        assert!(config.server.timeout_secs.is_none());
    }

    #[test]
    fn test_invalid_url() {
        let result = ClientConfig::from_str("[server]\nurl = \"localhost:3000\"\n");
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }
}
