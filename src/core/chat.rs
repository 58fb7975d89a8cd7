//! HTTP client for the chat API
//!
//! Sends the full transcript to `POST /chat` and reads back `{ reply }`.

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::config::ClientConfig;
use crate::conversation::Message;

use super::session::{ChatSession, TurnError};

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    messages: &'a [Message],
}

#[derive(Debug, Deserialize)]
struct ChatReply {
    reply: String,
}

/// Errors talking to the chat API
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Server returned {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("Invalid response: {0}")]
    InvalidResponse(#[from] serde_json::Error),
}

pub struct ChatClient {
    client: Client,
    url: String,
}

impl ChatClient {
    pub fn new(config: &ClientConfig) -> Result<Self, ClientError> {
        let mut builder = Client::builder();
        if let Some(secs) = config.server.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        Ok(Self {
            client: builder.build()?,
            url: config.chat_url(),
        })
    }

    /// Ask the server for the next bot reply given the full history
    pub async fn ask(&self, history: &[Message]) -> Result<String, ClientError> {
        let response = self
            .client
            .post(&self.url)
            .json(&ChatRequest { messages: history })
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(ClientError::Status { status, body });
        }

        let reply: ChatReply = serde_json::from_str(&body)?;
        Ok(reply.reply)
    }

    /// Run one full turn: record the input, call the server, record the reply
    pub async fn send(&self, session: &mut ChatSession, input: &str) -> Result<(), TurnError> {
        let turn = session.begin_turn(input).await?;
        tracing::debug!("Sending {} message(s) to {}", turn.history.len(), self.url);

        let outcome = self.ask(&turn.history).await;
        session.finish_turn(turn, outcome).await;
        Ok(())
    }
}
