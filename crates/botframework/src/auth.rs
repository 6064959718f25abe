use {
    botwire_channels::{HttpClient, RequestBody},
    secrecy::{ExposeSecret, Secret},
    serde::Deserialize,
    tracing::debug,
};

use crate::{
    config::BotFrameworkConfig,
    error::{Context, Error, Result},
};

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// Exchange the app credentials for a Bot Connector bearer token.
///
/// Tokens are not cached: every outbound call fetches a fresh one.
pub async fn get_access_token(
    http: &dyn HttpClient,
    config: &BotFrameworkConfig,
) -> Result<Secret<String>> {
    let form = vec![
        ("client_id".to_string(), config.app_id.clone()),
        (
            "client_secret".to_string(),
            config.app_key.expose_secret().clone(),
        ),
        ("grant_type".to_string(), "client_credentials".to_string()),
        ("scope".to_string(), config.oauth_scope.clone()),
    ];

    let resp = http
        .post(&config.token_url(), &[], RequestBody::Form(form), &[])
        .await?;
    if !resp.is_success() {
        return Err(Error::TokenRequest {
            status: resp.status,
            body: resp.body,
        });
    }

    let body = resp
        .json::<TokenResponse>()
        .context("invalid Bot Framework token response")?;
    debug!(app_id = %config.app_id, "fetched Bot Framework access token");
    Ok(Secret::new(body.access_token))
}
