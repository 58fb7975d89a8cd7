//! Client-side chat state
//!
//! Transcript persistence, session state and the HTTP call to the server.

mod chat;
mod memory;
mod session;
mod store;

pub use chat::{ChatClient, ClientError};
pub use memory::{InMemoryKvStore, KeyValueStore, SqliteKvStore, StorageError};
pub use session::{ChatSession, PendingTurn, Theme, TurnError, CLIENT_APOLOGY, THEME_KEY};
pub use store::{ConversationStore, StoreError, CONVERSATION_KEY, GREETING};
