use std::sync::Arc;

use {
    anyhow::Result,
    botwire_botframework::BotFrameworkDriver,
    botwire_channels::{HttpDriver, Inbound},
    serde_json::{Value, json},
    tracing::debug,
};

use crate::server::AppState;

/// What a webhook delivery turned into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WebhookOutcome {
    /// Not a Bot Framework payload, or sent by the bot itself.
    Ignored,
    Event(String),
    Messages(usize),
}

impl WebhookOutcome {
    pub fn to_json(&self) -> Value {
        match self {
            Self::Ignored => json!({ "matched": false }),
            Self::Event(name) => json!({ "matched": true, "event": name }),
            Self::Messages(count) => json!({ "matched": true, "messages": count }),
        }
    }
}

/// Classify one Bot Framework delivery and hand it to the sink.
///
/// System events take precedence: a delivery carrying an event never
/// produces chat messages.
pub async fn handle_webhook(state: &AppState, body: &[u8]) -> Result<WebhookOutcome> {
    let driver = BotFrameworkDriver::from_request_body(
        body,
        state.botframework.clone(),
        Arc::clone(&state.http),
    );

    if !driver.matches_request() {
        debug!("ignoring webhook delivery not addressed to the Bot Framework driver");
        return Ok(WebhookOutcome::Ignored);
    }

    if let Some(event) = driver.matching_event() {
        let name = event.name.clone();
        state.sink.dispatch(&driver, Inbound::Event(event)).await?;
        return Ok(WebhookOutcome::Event(name));
    }

    if driver.is_bot() {
        return Ok(WebhookOutcome::Ignored);
    }

    let mut dispatched = 0;
    for message in driver.messages() {
        let inbound = Inbound::Message {
            message: message.clone(),
            answer: driver.conversation_answer(message),
            user: driver.user(message),
        };
        state.sink.dispatch(&driver, inbound).await?;
        dispatched += 1;
    }
    Ok(WebhookOutcome::Messages(dispatched))
}
