//! Conversation types and request normalization

mod prompt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

pub use prompt::{assemble_prompt, TRAILING_CUE};

/// A single turn in the transcript
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub sender: Sender,
    pub text: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Bot,
}

impl Sender {
    /// Speaker label used when rendering the transcript into a prompt
    pub fn label(self) -> &'static str {
        match self {
            Sender::User => "User",
            Sender::Bot => "Bot",
        }
    }
}

impl Message {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            sender: Sender::User,
            text: text.into(),
        }
    }

    pub fn bot(text: impl Into<String>) -> Self {
        Self {
            sender: Sender::Bot,
            text: text.into(),
        }
    }
}

/// Body of a `POST /chat` request.
///
/// Current clients send the whole history as `{ "messages": [...] }`.
/// Older clients sent a single `{ "message": "..." }` string, which is
/// still accepted and treated as one user turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatPayload {
    History(Vec<Message>),
    Legacy(String),
}

impl ChatPayload {
    /// Parse a raw request body without ever failing.
    ///
    /// Anything that is not a recognizable payload degrades to an empty
    /// history. Entries of `messages` that are not valid messages are skipped.
    pub fn from_slice(body: &[u8]) -> Self {
        match serde_json::from_slice::<Value>(body) {
            Ok(value) => Self::from_value(&value),
            Err(e) => {
                tracing::debug!("Chat body is not JSON, treating as empty history: {}", e);
                ChatPayload::History(Vec::new())
            }
        }
    }

    pub fn from_value(value: &Value) -> Self {
        if let Some(entries) = value.get("messages").and_then(Value::as_array) {
            let messages = entries
                .iter()
                .filter_map(|entry| serde_json::from_value::<Message>(entry.clone()).ok())
                .collect();
            return ChatPayload::History(messages);
        }

        if value.get("messages").is_none() {
            if let Some(text) = value.get("message").and_then(Value::as_str) {
                return ChatPayload::Legacy(text.to_string());
            }
        }

        ChatPayload::History(Vec::new())
    }

    /// Normalize into the canonical message sequence
    pub fn into_messages(self) -> Vec<Message> {
        match self {
            ChatPayload::History(messages) => messages,
            ChatPayload::Legacy(text) => vec![Message::user(text)],
        }
    }
}
