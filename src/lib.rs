//! LazyBot - a laid-back chatbot
//!
//! The server half flattens a chat transcript into one prompt, forwards it
//! to an upstream model and returns the reply. The client half keeps the
//! transcript, persists it locally and talks to the server.

pub mod config;
pub mod conversation;
pub mod core;
pub mod providers;
pub mod routes;

use std::sync::Arc;

use config::Config;
use providers::ModelGateway;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Persona preamble prepended to every prompt
    pub persona: Arc<str>,
    pub gateway: Arc<dyn ModelGateway>,
}

impl AppState {
    pub fn new(config: Config, persona: impl Into<Arc<str>>, gateway: Arc<dyn ModelGateway>) -> Self {
        Self {
            config,
            persona: persona.into(),
            gateway,
        }
    }
}
