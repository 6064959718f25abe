use {
    secrecy::{ExposeSecret, Secret},
    serde::{Deserialize, Serialize},
};

/// Credentials for a Bot Framework bot registration.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BotFrameworkConfig {
    /// Microsoft App ID (bot registration client ID).
    pub app_id: String,

    /// Microsoft App Password (client secret).
    #[serde(serialize_with = "serialize_secret")]
    pub app_key: Secret<String>,

    /// OAuth tenant segment for token issuance.
    pub oauth_tenant: String,

    /// OAuth scope identifying the Bot Connector API.
    pub oauth_scope: String,
}

impl BotFrameworkConfig {
    pub fn new(app_id: impl Into<String>, app_key: impl Into<String>) -> Self {
        Self {
            app_id: app_id.into(),
            app_key: Secret::new(app_key.into()),
            ..Default::default()
        }
    }

    /// Both the app ID and the app key are set.
    pub fn is_configured(&self) -> bool {
        !self.app_id.is_empty() && !self.app_key.expose_secret().is_empty()
    }

    pub fn token_url(&self) -> String {
        format!(
            "https://login.microsoftonline.com/{}/oauth2/v2.0/token",
            self.oauth_tenant
        )
    }
}

impl std::fmt::Debug for BotFrameworkConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BotFrameworkConfig")
            .field("app_id", &self.app_id)
            .field("app_key", &"[REDACTED]")
            .field("oauth_tenant", &self.oauth_tenant)
            .field("oauth_scope", &self.oauth_scope)
            .finish()
    }
}

fn serialize_secret<S: serde::Serializer>(
    secret: &Secret<String>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(secret.expose_secret())
}

impl Default for BotFrameworkConfig {
    fn default() -> Self {
        Self {
            app_id: String::new(),
            app_key: Secret::new(String::new()),
            oauth_tenant: "botframework.com".into(),
            oauth_scope: "https://api.botframework.com/.default".into(),
        }
    }
}
