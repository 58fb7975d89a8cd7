//! Conversation store
//!
//! Owns the ordered transcript for one client session and mirrors it into
//! the injected key-value store after every change. The transcript is never
//! empty: a missing or unreadable copy is replaced by the greeting.

use std::sync::Arc;

use crate::conversation::Message;

use super::memory::{KeyValueStore, StorageError};

/// Storage key holding the JSON-serialized transcript
pub const CONVERSATION_KEY: &str = "chat_messages";

/// First bot message of every fresh conversation
pub const GREETING: &str = "Hello! How can I help you today?";

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

pub struct ConversationStore {
    storage: Arc<dyn KeyValueStore>,
    messages: Vec<Message>,
}

impl ConversationStore {
    /// Restore the persisted transcript, or seed a new one
    pub async fn initialize(storage: Arc<dyn KeyValueStore>) -> Self {
        let messages = match storage.get(CONVERSATION_KEY).await {
            Ok(Some(raw)) => restore(&raw),
            Ok(None) => None,
            Err(e) => {
                tracing::warn!("Could not read saved conversation: {}", e);
                None
            }
        }
        .unwrap_or_else(seed);

        tracing::debug!("Conversation initialized with {} message(s)", messages.len());

        Self { storage, messages }
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn storage(&self) -> &Arc<dyn KeyValueStore> {
        &self.storage
    }

    /// Append a message and persist the whole transcript.
    ///
    /// The in-memory transcript is updated even when persisting fails.
    pub async fn append(&mut self, message: Message) -> Result<(), StoreError> {
        self.messages.push(message);
        self.persist().await
    }

    /// Reset to the greeting and drop the persisted copy
    pub async fn clear(&mut self) -> Result<(), StoreError> {
        self.messages = seed();
        self.storage.remove(CONVERSATION_KEY).await?;
        Ok(())
    }

    async fn persist(&self) -> Result<(), StoreError> {
        let raw = serde_json::to_string(&self.messages)?;
        self.storage.set(CONVERSATION_KEY, &raw).await?;
        Ok(())
    }
}

fn seed() -> Vec<Message> {
    vec![Message::bot(GREETING)]
}

fn restore(raw: &str) -> Option<Vec<Message>> {
    if raw.trim().is_empty() {
        return None;
    }

    match serde_json::from_str::<Vec<Message>>(raw) {
        Ok(messages) if !messages.is_empty() => Some(messages),
        Ok(_) => None,
        Err(e) => {
            tracing::warn!("Saved conversation is corrupt, starting fresh: {}", e);
            None
        }
    }
}
