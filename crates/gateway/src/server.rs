use std::sync::Arc;

use {
    axum::{
        Json, Router,
        body::Bytes,
        extract::State,
        http::StatusCode,
        response::IntoResponse,
        routing::{get, post},
    },
    botwire_botframework::BotFrameworkConfig,
    botwire_channels::{HttpClient, InboundSink, ReqwestHttpClient},
    botwire_config::BotwireConfig,
    tracing::{info, warn},
};

use crate::webhook::handle_webhook;

/// Shared, read-only state handed to every request.
#[derive(Clone)]
pub struct AppState {
    pub botframework: BotFrameworkConfig,
    pub http: Arc<dyn HttpClient>,
    pub sink: Arc<dyn InboundSink>,
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/api/botframework/webhook", post(botframework_webhook_handler))
        .with_state(state)
}

/// Decode the `channels.botframework` section, defaulting when absent.
pub fn botframework_config(config: &BotwireConfig) -> anyhow::Result<BotFrameworkConfig> {
    match &config.channels.botframework {
        Some(value) => Ok(serde_json::from_value(value.clone())?),
        None => Ok(BotFrameworkConfig::default()),
    }
}

/// Bind `bind:port` and serve the webhook until the process exits.
pub async fn start_gateway(
    bind: &str,
    port: u16,
    config: &BotwireConfig,
    sink: Arc<dyn InboundSink>,
) -> anyhow::Result<()> {
    let botframework = botframework_config(config)?;
    if !botframework.is_configured() {
        warn!("Bot Framework app_id/app_key not configured, outbound sends will fail");
    }

    let state = AppState {
        botframework,
        http: Arc::new(ReqwestHttpClient::new()),
        sink,
    };

    let listener = tokio::net::TcpListener::bind((bind, port)).await?;
    info!(addr = %listener.local_addr()?, "webhook gateway listening");
    axum::serve(listener, build_router(state)).await?;
    Ok(())
}

// ── Handlers ─────────────────────────────────────────────────────────────────

async fn health_handler() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

async fn botframework_webhook_handler(
    State(state): State<AppState>,
    body: Bytes,
) -> impl IntoResponse {
    match handle_webhook(&state, &body).await {
        Ok(outcome) => (StatusCode::OK, Json(outcome.to_json())),
        Err(e) => {
            warn!(error = %e, "failed to dispatch Bot Framework webhook");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({ "error": e.to_string() })),
            )
        },
    }
}
