//! API routes

use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderValue, Method, StatusCode},
    response::Json,
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::Instrument;

use crate::conversation::{assemble_prompt, ChatPayload};
use crate::AppState;

/// Reply sent to the caller whenever the upstream model fails
pub const SERVER_APOLOGY: &str = "Sorry, I couldn't process your request.";

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChatResponse {
    pub reply: String,
}

async fn index() -> &'static str {
    "API is running..."
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

async fn chat(State(state): State<AppState>, body: Bytes) -> (StatusCode, Json<ChatResponse>) {
    let span = tracing::info_span!("chat", request_id = %uuid::Uuid::new_v4());

    async move {
        let history = ChatPayload::from_slice(&body).into_messages();
        let prompt = assemble_prompt(&state.persona, &history);
        tracing::debug!(messages = history.len(), prompt_len = prompt.len(), "Assembled prompt");

        match state.gateway.ask(&prompt).await {
            Ok(reply) => (StatusCode::OK, Json(ChatResponse { reply })),
            Err(e) => {
                tracing::error!("Upstream model error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ChatResponse {
                        reply: SERVER_APOLOGY.to_string(),
                    }),
                )
            }
        }
    }
    .instrument(span)
    .await
}

/// CORS policy admitting only the configured front-end origin
pub fn cors_layer(origin: &str) -> anyhow::Result<CorsLayer> {
    let origin = HeaderValue::from_str(origin)?;

    Ok(CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE])
        .allow_credentials(true))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(index))
        .route("/health", get(health))
        .route("/chat", post(chat))
}

/// The complete application: routes, CORS and request tracing
pub fn app(state: AppState) -> anyhow::Result<Router> {
    let cors = cors_layer(&state.config.allowed_origin)?;

    Ok(router()
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state))
}
