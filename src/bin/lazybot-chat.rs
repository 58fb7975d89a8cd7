//! Terminal front-end for the LazyBot API
//!
//! Usage: `lazybot-chat [client.toml]`
//!
//! Commands: `/clear` resets the conversation, `/theme` toggles the saved
//! theme, `/quit` exits. Anything else is sent to the bot.

use std::path::PathBuf;
use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use lazybot::config::ClientConfig;
use lazybot::conversation::{Message, Sender};
use lazybot::core::{ChatClient, ChatSession, SqliteKvStore, TurnError};

fn render(message: &Message) -> String {
    match message.sender {
        Sender::User => format!("you > {}", message.text),
        Sender::Bot => format!("bot > {}", message.text),
    }
}

fn load_config() -> anyhow::Result<ClientConfig> {
    let path = std::env::args()
        .nth(1)
        .or_else(|| std::env::var("LAZYBOT_CLIENT_CONFIG").ok())
        .map(PathBuf::from);

    match path {
        Some(path) => Ok(ClientConfig::from_file(&path)?),
        None => Ok(ClientConfig::default()),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "lazybot=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = load_config()?;
    let storage = Arc::new(SqliteKvStore::new(&config.storage.path).await?);
    let client = ChatClient::new(&config)?;
    let mut session = ChatSession::open(storage).await;

    let mut stdout = tokio::io::stdout();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    stdout
        .write_all(format!("LazyBot 🤖 (theme: {})\n", session.theme()).as_bytes())
        .await?;
    for message in session.messages() {
        stdout.write_all(format!("{}\n", render(message)).as_bytes()).await?;
    }

    loop {
        stdout.write_all(b"> ").await?;
        stdout.flush().await?;

        let Some(line) = lines.next_line().await? else {
            break;
        };

        match line.trim() {
            "" => {}
            "/quit" | "/exit" => break,
            "/clear" => {
                session.clear().await;
                for message in session.messages() {
                    stdout.write_all(format!("{}\n", render(message)).as_bytes()).await?;
                }
            }
            "/theme" => {
                let theme = session.toggle_theme().await;
                stdout.write_all(format!("theme: {}\n", theme).as_bytes()).await?;
            }
            _ => {
                stdout.write_all(b"LazyBot is typing slowly...\n").await?;
                stdout.flush().await?;

                match client.send(&mut session, &line).await {
                    Ok(()) => {
                        if let Some(reply) = session.messages().last() {
                            stdout.write_all(format!("{}\n", render(reply)).as_bytes()).await?;
                        }
                    }
                    Err(TurnError::EmptyInput) => {}
                    Err(e) => {
                        stdout.write_all(format!("({})\n", e).as_bytes()).await?;
                    }
                }
            }
        }
    }

    Ok(())
}
