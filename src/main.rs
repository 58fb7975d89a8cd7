//! LazyBot API server
//!
//! Serves `POST /chat` for the web front-end and forwards each transcript
//! to the configured upstream model.

use std::net::SocketAddr;
use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use lazybot::config::Config;
use lazybot::providers::Provider;
use lazybot::{routes, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "lazybot=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();
    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;

    let persona = config.load_persona().await?;
    let provider = Provider::from_config(&config)?;
    tracing::info!("🤖 Upstream provider: {}", provider.name());
    tracing::info!("🌐 Allowed origin: {}", config.allowed_origin);

    let state = AppState::new(config, persona, Arc::new(provider));
    let app = routes::app(state)?;

    tracing::info!("😴 LazyBot API running at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
