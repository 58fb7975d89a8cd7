//! Client session state
//!
//! Everything a chat front-end keeps between keystrokes: the transcript,
//! the theme preference and whether a reply is still pending. A turn is
//! split into `begin_turn` and `finish_turn` so the network call can happen
//! in between without the session owning an HTTP client.

use std::fmt;
use std::sync::Arc;

use crate::conversation::Message;

use super::memory::KeyValueStore;
use super::store::ConversationStore;

/// Storage key holding the theme preference
pub const THEME_KEY: &str = "theme";

/// Bot message shown when the server could not be reached
pub const CLIENT_APOLOGY: &str = "Sorry, something went wrong.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    /// Only an explicit "dark" selects the dark theme
    pub fn parse(value: Option<&str>) -> Self {
        match value {
            Some("dark") => Theme::Dark,
            _ => Theme::Light,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TurnError {
    #[error("Message is empty")]
    EmptyInput,

    #[error("Still waiting for the previous reply")]
    Busy,
}

/// A submitted message waiting for its reply.
///
/// Handed out by `begin_turn` and consumed by `finish_turn`.
#[derive(Debug)]
pub struct PendingTurn {
    generation: u64,
    /// Full transcript to send, ending with the user's message
    pub history: Vec<Message>,
}

pub struct ChatSession {
    store: ConversationStore,
    theme: Theme,
    /// Generation of the last turn handed out
    generation: u64,
    /// Generation of the turn still awaiting its reply
    in_flight: Option<u64>,
}

impl ChatSession {
    /// Restore the transcript and theme from storage
    pub async fn open(storage: Arc<dyn KeyValueStore>) -> Self {
        let theme = match storage.get(THEME_KEY).await {
            Ok(value) => Theme::parse(value.as_deref()),
            Err(e) => {
                tracing::warn!("Could not read theme preference: {}", e);
                Theme::default()
            }
        };

        Self {
            store: ConversationStore::initialize(storage).await,
            theme,
            generation: 0,
            in_flight: None,
        }
    }

    pub fn messages(&self) -> &[Message] {
        self.store.messages()
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    /// True while a reply is outstanding
    pub fn is_loading(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Record the user's message and hand back the history to send.
    ///
    /// Blank input is ignored; so is a second submission while the first is
    /// still waiting for its reply.
    pub async fn begin_turn(&mut self, input: &str) -> Result<PendingTurn, TurnError> {
        if input.trim().is_empty() {
            return Err(TurnError::EmptyInput);
        }
        if self.in_flight.is_some() {
            return Err(TurnError::Busy);
        }

        self.record(Message::user(input)).await;
        self.generation += 1;
        self.in_flight = Some(self.generation);

        Ok(PendingTurn {
            generation: self.generation,
            history: self.store.messages().to_vec(),
        })
    }

    /// Record the outcome of an outstanding request.
    ///
    /// Returns false and drops the outcome when `turn` is no longer the one
    /// in flight, e.g. because the conversation was cleared meanwhile.
    pub async fn finish_turn<E: fmt::Display>(
        &mut self,
        turn: PendingTurn,
        outcome: Result<String, E>,
    ) -> bool {
        if self.in_flight != Some(turn.generation) {
            tracing::debug!("Dropping reply for stale turn {}", turn.generation);
            return false;
        }

        let reply = match outcome {
            Ok(text) => Message::bot(text),
            Err(e) => {
                tracing::error!("Error communicating with server: {}", e);
                Message::bot(CLIENT_APOLOGY)
            }
        };

        self.record(reply).await;
        self.in_flight = None;
        true
    }

    pub async fn toggle_theme(&mut self) -> Theme {
        self.theme = self.theme.toggled();
        if let Err(e) = self.store.storage().set(THEME_KEY, self.theme.as_str()).await {
            tracing::warn!("Could not save theme preference: {}", e);
        }
        self.theme
    }

    /// Reset the transcript; a reply still in flight will be dropped
    pub async fn clear(&mut self) {
        self.in_flight = None;
        if let Err(e) = self.store.clear().await {
            tracing::warn!("Could not remove saved conversation: {}", e);
        }
    }

    async fn record(&mut self, message: Message) {
        if let Err(e) = self.store.append(message).await {
            tracing::warn!("Could not save conversation: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::memory::InMemoryKvStore;
    use crate::core::store::GREETING;

    async fn fresh() -> (Arc<InMemoryKvStore>, ChatSession) {
        let storage = Arc::new(InMemoryKvStore::new());
        let session = ChatSession::open(storage.clone()).await;
        (storage, session)
    }

    fn reply(text: &str) -> Result<String, TurnError> {
        Ok(text.to_string())
    }

    #[tokio::test]
    async fn test_open_defaults() {
        let (_, session) = fresh().await;
        assert_eq!(session.messages(), &[Message::bot(GREETING)]);
        assert_eq!(session.theme(), Theme::Light);
        assert!(!session.is_loading());
    }

    #[tokio::test]
    async fn test_blank_input_ignored() {
        let (_, mut session) = fresh().await;

        assert_eq!(session.begin_turn("").await.unwrap_err(), TurnError::EmptyInput);
        assert_eq!(session.begin_turn("  \n\t").await.unwrap_err(), TurnError::EmptyInput);
        assert_eq!(session.messages().len(), 1);
        assert!(!session.is_loading());
    }

    #[tokio::test]
    async fn test_successful_turn() {
        let (_, mut session) = fresh().await;

        let turn = session.begin_turn("hi").await.unwrap();
        assert_eq!(turn.history, vec![Message::bot(GREETING), Message::user("hi")]);
        assert!(session.is_loading());

        assert!(session.finish_turn(turn, reply("sup 😎💤")).await);
        assert!(!session.is_loading());
        assert_eq!(
            session.messages(),
            &[
                Message::bot(GREETING),
                Message::user("hi"),
                Message::bot("sup 😎💤")
            ]
        );
    }

    #[tokio::test]
    async fn test_failed_turn_apologizes() {
        let (_, mut session) = fresh().await;

        let turn = session.begin_turn("hi").await.unwrap();
        session.finish_turn(turn, Err::<String, _>("connection refused")).await;

        assert!(!session.is_loading());
        assert_eq!(session.messages().last(), Some(&Message::bot(CLIENT_APOLOGY)));
    }

    #[tokio::test]
    async fn test_second_send_while_waiting_is_rejected() {
        let (_, mut session) = fresh().await;

        let turn = session.begin_turn("first").await.unwrap();
        assert_eq!(session.begin_turn("second").await.unwrap_err(), TurnError::Busy);
        assert_eq!(session.messages().len(), 2);

        session.finish_turn(turn, reply("reply")).await;
        assert!(session.begin_turn("second").await.is_ok());
    }

    #[tokio::test]
    async fn test_clear_mid_turn_drops_late_reply() {
        let (_, mut session) = fresh().await;

        let turn = session.begin_turn("hi").await.unwrap();
        session.clear().await;

        assert!(!session.is_loading());
        assert_eq!(session.messages(), &[Message::bot(GREETING)]);

        // A new turn can start right away
        let next = session.begin_turn("hello again").await.unwrap();

        // The reply to the cleared turn never lands in the new conversation
        assert!(!session.finish_turn(turn, reply("reply to hi")).await);
        assert!(session.is_loading());
        assert_eq!(
            session.messages(),
            &[Message::bot(GREETING), Message::user("hello again")]
        );

        assert!(session.finish_turn(next, reply("oh hey 👋😴")).await);
        assert_eq!(
            session.messages(),
            &[
                Message::bot(GREETING),
                Message::user("hello again"),
                Message::bot("oh hey 👋😴")
            ]
        );
    }

    #[tokio::test]
    async fn test_finish_without_pending_turn_is_ignored() {
        let (_, mut other) = fresh().await;
        let foreign = other.begin_turn("hi").await.unwrap();

        let (_, mut session) = fresh().await;
        assert!(!session.finish_turn(foreign, reply("orphan")).await);
        assert_eq!(session.messages(), &[Message::bot(GREETING)]);
        assert!(!session.is_loading());

        let turn = session.begin_turn("hi").await.unwrap();
        session.clear().await;
        assert!(!session.finish_turn(turn, Err::<String, _>("timed out")).await);
        assert_eq!(session.messages(), &[Message::bot(GREETING)]);
    }

    #[tokio::test]
    async fn test_session_survives_reopen() {
        let (storage, mut session) = fresh().await;
        let turn = session.begin_turn("remember me").await.unwrap();
        session.finish_turn(turn, reply("nah 😴🙃")).await;
        session.toggle_theme().await;
        let transcript = session.messages().to_vec();
        drop(session);

        let reopened = ChatSession::open(storage).await;
        assert_eq!(reopened.messages(), transcript.as_slice());
        assert_eq!(reopened.theme(), Theme::Dark);
    }

    #[tokio::test]
    async fn test_toggle_theme_persists() {
        let (storage, mut session) = fresh().await;

        assert_eq!(session.toggle_theme().await, Theme::Dark);
        assert_eq!(storage.get(THEME_KEY).await.unwrap().as_deref(), Some("dark"));

        assert_eq!(session.toggle_theme().await, Theme::Light);
        assert_eq!(storage.get(THEME_KEY).await.unwrap().as_deref(), Some("light"));
    }

    #[tokio::test]
    async fn test_clear_resets_transcript() {
        let (_, mut session) = fresh().await;
        let turn = session.begin_turn("hi").await.unwrap();
        session.finish_turn(turn, reply("yo")).await;

        session.clear().await;
        assert_eq!(session.messages(), &[Message::bot(GREETING)]);
    }

    #[test]
    fn test_theme_parse() {
        assert_eq!(Theme::parse(Some("dark")), Theme::Dark);
        assert_eq!(Theme::parse(Some("light")), Theme::Light);
        assert_eq!(Theme::parse(Some("DARK")), Theme::Light);
        assert_eq!(Theme::parse(None), Theme::Light);
    }
}
