use std::sync::Arc;

use {
    anyhow::Result,
    botwire_botframework::{
        BotFrameworkConfig, BotFrameworkDriver, activity::InboundActivity, auth::get_access_token,
    },
    botwire_channels::{
        HttpClient, HttpDriver, IncomingMessage, Outgoing, ReqwestHttpClient, ServicePayload,
    },
    secrecy::ExposeSecret,
    serde_json::{Map, json},
    tracing::info,
};

/// Fetch a token to prove the configured credentials work.
pub async fn check_token(config: &BotFrameworkConfig) -> Result<()> {
    if !config.is_configured() {
        anyhow::bail!("channels.botframework.app_id and app_key must both be set");
    }
    let token = get_access_token(&ReqwestHttpClient::new(), config).await?;
    println!(
        "Token issued for app {} ({} chars)",
        config.app_id,
        token.expose_secret().len()
    );
    Ok(())
}

/// Reply target for a conversation the bot has not heard from in this run.
fn conversation_target(service_url: &str, conversation: &str) -> IncomingMessage {
    IncomingMessage::new(
        "",
        "",
        conversation,
        json!({ "serviceUrl": service_url }),
    )
}

fn text_payload(
    driver: &BotFrameworkDriver,
    service_url: &str,
    conversation: &str,
    text: &str,
) -> Result<ServicePayload> {
    driver.build_service_payload(
        Outgoing::Text(text.to_string()),
        &conversation_target(service_url, conversation),
        &Map::new(),
    )
}

/// Post a text message into an existing conversation.
pub async fn send_text(
    config: BotFrameworkConfig,
    service_url: &str,
    conversation: &str,
    text: &str,
) -> Result<()> {
    let http: Arc<dyn HttpClient> = Arc::new(ReqwestHttpClient::new());
    let driver = BotFrameworkDriver::new(config, http, InboundActivity::default());
    let payload = text_payload(&driver, service_url, conversation, text)?;

    info!(url = %payload.url, "sending activity");
    let resp = driver.send_payload(&payload).await?;
    if !resp.is_success() {
        anyhow::bail!("send failed ({}): {}", resp.status, resp.body);
    }
    println!("Sent ({})", resp.status);
    Ok(())
}
