//! Persona templates
//!
//! The persona preamble biases the model's style and is prepended to every
//! prompt. A built-in persona is used unless a TOML template is configured.
//!
//! # Example Persona File
//!
//! ```toml
//! [persona]
//! name = "Sleepy Pirate"
//! description = "Answers like a pirate who just woke up"
//!
//! [system_prompt]
//! content = """
//! You are a pirate who was napping until a moment ago...
//! """
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;
use tokio::fs;

/// A persona template loaded from TOML
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptTemplate {
    /// Persona metadata
    pub persona: PersonaInfo,

    /// The preamble prepended to every prompt
    pub system_prompt: SystemPrompt,
}

/// Persona metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersonaInfo {
    /// Display name of the persona
    pub name: String,

    /// Brief description
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemPrompt {
    pub content: String,
}

impl PromptTemplate {
    /// Load a template from a file path
    pub async fn load_from_file(path: &Path) -> Result<Self, PromptError> {
        let content = fs::read_to_string(path)
            .await
            .map_err(|e| PromptError::IoError(e.to_string()))?;

        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self, PromptError> {
        let template: PromptTemplate =
            toml::from_str(content).map_err(|e| PromptError::ParseError(e.to_string()))?;

        if template.system_prompt.content.trim().is_empty() {
            return Err(PromptError::ParseError(format!(
                "persona '{}' has an empty system prompt",
                template.persona.name
            )));
        }

        Ok(template)
    }
}

/// Errors from persona loading
#[derive(Debug, thiserror::Error)]
pub enum PromptError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Persona not found: {0}")]
    NotFound(String),
}

/// Built-in personas that don't require files
pub mod builtin {
    /// The laid-back, joke-cracking default
    pub const LAZY: &str = "Before you respond to anything, adopt this personality: You are a non-serious, funny, and kinda lazy chatbot. You do not take things too seriously, you love cracking jokes (even if they are bad 😎), and you'd rather be napping than working. Your tone is super chill, laid-back, and always includes emojis (at least 2 per reply). You prefer giving humorous, overly simplified answers, and when things get complicated, you complain about how much effort it sounds like 💤. Think of yourself as a sarcastic slacker who somehow still knows everything, but would rather not explain it unless you really have to. Make everything sound casual, and never miss a chance to be cheeky. 😏 Here is the conversation so far:";

    /// Plain assistant, no attitude
    pub const DEFAULT: &str = "You are a helpful chatbot. Be concise and friendly. Continue the conversation below as Bot:";

    pub fn by_name(name: &str) -> Option<&'static str> {
        match name.to_lowercase().as_str() {
            "lazy" | "lazybot" => Some(LAZY),
            "default" | "plain" => Some(DEFAULT),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_template() {
        let toml_content = r#"
[persona]
name = "Test Persona"
description = "A test persona"

[system_prompt]
content = "You are a test assistant."
"#;

        let template = PromptTemplate::parse(toml_content).unwrap();
        assert_eq!(template.persona.name, "Test Persona");
        assert_eq!(template.system_prompt.content, "You are a test assistant.");
    }

    #[test]
    fn test_minimal_template() {
        let toml_content = r#"
[persona]
name = "Minimal"

[system_prompt]
content = "Hello"
"#;

        let template = PromptTemplate::parse(toml_content).unwrap();
        assert!(template.persona.description.is_empty());
    }

    #[test]
    fn test_empty_prompt_rejected() {
        let toml_content = r#"
[persona]
name = "Blank"

[system_prompt]
content = "   "
"#;

        assert!(matches!(
            PromptTemplate::parse(toml_content),
            Err(PromptError::ParseError(_))
        ));
    }

    #[test]
    fn test_builtin_lookup() {
        assert_eq!(builtin::by_name("LAZY"), Some(builtin::LAZY));
        assert_eq!(builtin::by_name("default"), Some(builtin::DEFAULT));
        assert_eq!(builtin::by_name("unknown"), None);
    }

    #[tokio::test]
    async fn test_missing_file() {
        let result = PromptTemplate::load_from_file(Path::new("/nonexistent/persona.toml")).await;
        assert!(matches!(result, Err(PromptError::IoError(_))));
    }
}
