use std::sync::{Arc, OnceLock};

use {
    async_trait::async_trait,
    botwire_channels::{
        Answer, GenericEvent, HttpClient, HttpDriver, HttpResponse, IncomingMessage, Outgoing,
        RequestBody, ServicePayload, User,
    },
    secrecy::{ExposeSecret, Secret},
    serde_json::{Map, Value},
    tracing::{debug, warn},
};

use crate::{
    activity::{GENERIC_EVENTS, InboundActivity, clean_text},
    auth::get_access_token,
    config::BotFrameworkConfig,
    error::{Error, Result},
    interactive, payload,
};

pub const DRIVER_NAME: &str = "BotFramework";

/// Bot Framework driver bound to a single webhook delivery.
pub struct BotFrameworkDriver {
    config: BotFrameworkConfig,
    http: Arc<dyn HttpClient>,
    activity: InboundActivity,
    messages: OnceLock<Vec<IncomingMessage>>,
}

impl BotFrameworkDriver {
    pub fn new(
        config: BotFrameworkConfig,
        http: Arc<dyn HttpClient>,
        activity: InboundActivity,
    ) -> Self {
        Self {
            config,
            http,
            activity,
            messages: OnceLock::new(),
        }
    }

    /// Build a driver from a raw webhook body. Never fails: undecodable
    /// bodies produce a driver that matches nothing.
    pub fn from_request_body(
        body: &[u8],
        config: BotFrameworkConfig,
        http: Arc<dyn HttpClient>,
    ) -> Self {
        Self::new(config, http, InboundActivity::from_slice(body))
    }

    pub fn activity(&self) -> &InboundActivity {
        &self.activity
    }

    pub fn config(&self) -> &BotFrameworkConfig {
        &self.config
    }

    pub async fn access_token(&self) -> Result<Secret<String>> {
        get_access_token(self.http.as_ref(), &self.config).await
    }

    async fn post_authorized(&self, url: &str, body: Value) -> Result<HttpResponse> {
        let token = self.access_token().await?;
        let headers = [
            ("Content-Type".to_string(), "application/json".to_string()),
            (
                "Authorization".to_string(),
                format!("Bearer {}", token.expose_secret()),
            ),
        ];
        let resp = self
            .http
            .post(url, &[], RequestBody::Json(body), &headers)
            .await?;
        if !resp.is_success() {
            warn!(url, status = resp.status, "Bot Framework rejected request");
        }
        Ok(resp)
    }
}

#[async_trait]
impl HttpDriver for BotFrameworkDriver {
    fn name(&self) -> &str {
        DRIVER_NAME
    }

    fn matches_request(&self) -> bool {
        let matched = self.activity.has_no_real_attachments() && self.activity.is_routable();
        debug!(matched, "classified Bot Framework request");
        matched
    }

    fn matching_event(&self) -> Option<GenericEvent> {
        let name = match self.activity.event_type()? {
            Value::String(name) => name.clone(),
            other => other.to_string(),
        };
        if !GENERIC_EVENTS.contains(&name.as_str()) {
            debug!(event = %name, "unrecognized Bot Framework event type");
        }
        Some(GenericEvent::new(name, self.activity.to_value()))
    }

    fn messages(&self) -> &[IncomingMessage] {
        self.messages.get_or_init(|| {
            vec![IncomingMessage::new(
                clean_text(self.activity.text()),
                self.activity.sender_id().unwrap_or_default(),
                self.activity.conversation_id().unwrap_or_default(),
                self.activity.to_value(),
            )]
        })
    }

    fn is_bot(&self) -> bool {
        false
    }

    fn conversation_answer(&self, message: &IncomingMessage) -> Answer {
        interactive::conversation_answer(message)
    }

    /// Bot Framework users are addressed through their conversation.
    fn user(&self, message: &IncomingMessage) -> User {
        let from = message.payload.get("from").cloned().unwrap_or(Value::Null);
        User {
            id: message.recipient.clone(),
            username: from.get("name").and_then(Value::as_str).map(str::to_string),
            info: from,
            ..Default::default()
        }
    }

    fn is_configured(&self) -> bool {
        self.config.is_configured()
    }

    fn build_service_payload(
        &self,
        message: Outgoing,
        matching: &IncomingMessage,
        additional: &Map<String, Value>,
    ) -> anyhow::Result<ServicePayload> {
        Ok(payload::build_service_payload(
            message, matching, additional,
        )?)
    }

    async fn send_payload(&self, payload: &ServicePayload) -> anyhow::Result<HttpResponse> {
        Ok(self
            .post_authorized(&payload.url, payload.body.clone())
            .await?)
    }

    async fn send_request(
        &self,
        endpoint: &str,
        parameters: Map<String, Value>,
        matching: &IncomingMessage,
    ) -> anyhow::Result<HttpResponse> {
        let base = payload::service_url(&matching.payload, &parameters)
            .ok_or(Error::MissingServiceUrl)?;
        let url = format!("{}/v3/{endpoint}", base.trim_end_matches('/'));
        Ok(self.post_authorized(&url, Value::Object(parameters)).await?)
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use {super::*, serde_json::json};

    use crate::testing::RecordingHttp;

    fn driver_for(body: Value, http: Arc<RecordingHttp>) -> BotFrameworkDriver {
        BotFrameworkDriver::from_request_body(
            body.to_string().as_bytes(),
            BotFrameworkConfig::new("app-id", "app-key"),
            http,
        )
    }

    fn driver(body: Value) -> BotFrameworkDriver {
        driver_for(body, Arc::new(RecordingHttp::new()))
    }

    fn chat_activity() -> Value {
        json!({
            "type": "message",
            "text": "<at>Echo</at> hello",
            "serviceUrl": "https://smba.trafficmanager.net/amer/",
            "from": {"id": "29:user", "name": "Ada Lovelace"},
            "recipient": {"id": "28:bot", "name": "Echo"},
            "conversation": {"id": "19:chat@thread.v2"},
            "attachments": [{"contentType": "text/html", "content": "<div>hello</div>"}]
        })
    }

    #[test]
    fn matches_chat_message_with_html_rendition() {
        assert!(driver(chat_activity()).matches_request());
    }

    #[test]
    fn rejects_real_attachments() {
        let mut body = chat_activity();
        body["attachments"] = json!([{"contentType": "image/png", "contentUrl": "https://x"}]);
        assert!(!driver(body).matches_request());
    }

    #[test]
    fn rejects_payload_without_service_url() {
        let mut body = chat_activity();
        body.as_object_mut().unwrap().remove("serviceUrl");
        assert!(!driver(body).matches_request());
    }

    #[test]
    fn rejects_malformed_body() {
        let driver = BotFrameworkDriver::from_request_body(
            b"<xml/>",
            BotFrameworkConfig::default(),
            Arc::new(RecordingHttp::new()),
        );
        assert!(!driver.matches_request());
        assert!(driver.matching_event().is_none());
    }

    #[test]
    fn detects_team_event() {
        let body = json!({
            "type": "conversationUpdate",
            "channelData": {"eventType": "teamRenamed", "team": {"id": "t1"}},
            "recipient": {"id": "28:bot"},
            "serviceUrl": "https://smba.trafficmanager.net/amer/"
        });
        let event = driver(body.clone()).matching_event().unwrap();
        assert_eq!(event.name, "teamRenamed");
        assert_eq!(event.payload, body);
    }

    #[test]
    fn unknown_event_types_still_dispatch() {
        let event = driver(json!({"channelData": {"eventType": "somethingNew"}}))
            .matching_event()
            .unwrap();
        assert_eq!(event.name, "somethingNew");
    }

    #[test]
    fn no_event_without_channel_data() {
        assert!(driver(chat_activity()).matching_event().is_none());
    }

    #[test]
    fn extracts_single_cleaned_message() {
        let driver = driver(chat_activity());
        let messages = driver.messages();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].text, "hello");
        assert_eq!(messages[0].sender, "29:user");
        assert_eq!(messages[0].recipient, "19:chat@thread.v2");
        assert_eq!(messages[0].payload, chat_activity());
    }

    #[test]
    fn message_extraction_is_memoized() {
        let driver = driver(chat_activity());
        let first = driver.messages().as_ptr();
        let second = driver.messages().as_ptr();
        assert_eq!(first, second);
    }

    #[test]
    fn user_comes_from_conversation_and_sender_name() {
        let driver = driver(chat_activity());
        let message = &driver.messages()[0];
        let user = driver.user(message);
        assert_eq!(user.id, "19:chat@thread.v2");
        assert_eq!(user.username.as_deref(), Some("Ada Lovelace"));
        assert_eq!(user.info["id"], "29:user");
        assert!(!driver.is_bot());
        assert_eq!(driver.name(), "BotFramework");
    }

    #[test]
    fn conversation_answer_decodes_button_clicks() {
        let mut body = chat_activity();
        body["text"] = json!("Yes<botman value=\"yes\" />");
        let driver = driver(body);
        let answer = driver.conversation_answer(&driver.messages()[0]);
        assert!(answer.is_interactive_reply());
        assert_eq!(answer.value, "yes");
    }

    #[tokio::test]
    async fn send_payload_fetches_token_then_posts_activity() {
        let http = Arc::new(RecordingHttp::new());
        http.respond(200, r#"{"access_token":"tok-1"}"#);
        http.respond(201, r#"{"id":"activity-1"}"#);
        let driver = driver_for(chat_activity(), Arc::clone(&http));
        let matching = driver.messages()[0].clone();

        let payload = driver
            .build_service_payload("pong".into(), &matching, &Map::new())
            .unwrap();
        let resp = driver.send_payload(&payload).await.unwrap();
        assert_eq!(resp.status, 201);

        let requests = http.requests();
        assert_eq!(requests.len(), 2);
        assert!(requests[0].url.contains("login.microsoftonline.com"));
        assert_eq!(
            requests[1].url,
            "https://smba.trafficmanager.net/amer/v3/conversations/19%3Achat%40thread.v2/activities"
        );
        assert_eq!(requests[1].header("authorization"), Some("Bearer tok-1"));
        assert_eq!(requests[1].header("content-type"), Some("application/json"));
        assert_eq!(
            requests[1].body,
            RequestBody::Json(json!({"type": "message", "text": "pong"}))
        );
    }

    #[tokio::test]
    async fn send_payload_returns_rejections_as_responses() {
        let http = Arc::new(RecordingHttp::new());
        http.respond(200, r#"{"access_token":"tok-1"}"#);
        http.respond(403, "forbidden");
        let driver = driver_for(chat_activity(), Arc::clone(&http));
        let matching = driver.messages()[0].clone();

        let payload = driver
            .build_service_payload("pong".into(), &matching, &Map::new())
            .unwrap();
        let resp = driver.send_payload(&payload).await.unwrap();
        assert_eq!(resp.status, 403);
        assert_eq!(resp.body, "forbidden");
    }

    #[tokio::test]
    async fn send_payload_fails_when_token_is_refused() {
        let http = Arc::new(RecordingHttp::new());
        http.respond(400, r#"{"error":"unauthorized_client"}"#);
        let driver = driver_for(chat_activity(), Arc::clone(&http));
        let matching = driver.messages()[0].clone();

        let payload = driver
            .build_service_payload("pong".into(), &matching, &Map::new())
            .unwrap();
        let err = driver.send_payload(&payload).await.unwrap_err();
        assert!(err.to_string().contains("token request failed"));
        assert_eq!(http.requests().len(), 1);
    }

    #[tokio::test]
    async fn send_request_targets_v3_endpoint() {
        let http = Arc::new(RecordingHttp::new());
        http.respond(200, r#"{"access_token":"tok-2"}"#);
        http.respond(200, r#"{"id":"a:new"}"#);
        let driver = driver_for(chat_activity(), Arc::clone(&http));
        let matching = driver.messages()[0].clone();

        let mut parameters = Map::new();
        parameters.insert("isGroup".into(), json!(false));
        let resp = driver
            .send_request("conversations", parameters, &matching)
            .await
            .unwrap();
        assert_eq!(resp.status, 200);

        let requests = http.requests();
        assert_eq!(
            requests[1].url,
            "https://smba.trafficmanager.net/amer/v3/conversations"
        );
        assert_eq!(requests[1].header("authorization"), Some("Bearer tok-2"));
        assert_eq!(requests[1].body, RequestBody::Json(json!({"isGroup": false})));
    }

    #[tokio::test]
    async fn send_request_uses_parameter_service_url_as_fallback() {
        let http = Arc::new(RecordingHttp::new());
        http.respond(200, r#"{"access_token":"tok-3"}"#);
        let driver = driver_for(json!({}), Arc::clone(&http));
        let matching = IncomingMessage::new("", "", "", Value::Null);

        let mut parameters = Map::new();
        parameters.insert("serviceUrl".into(), json!("https://service.example.com/"));
        driver
            .send_request("conversations/a/members", parameters, &matching)
            .await
            .unwrap();

        assert_eq!(
            http.requests()[1].url,
            "https://service.example.com/v3/conversations/a/members"
        );
    }

    #[tokio::test]
    async fn send_request_without_service_url_fails_before_network() {
        let http = Arc::new(RecordingHttp::new());
        let driver = driver_for(json!({}), Arc::clone(&http));
        let matching = IncomingMessage::new("", "", "", Value::Null);

        let err = driver
            .send_request("conversations", Map::new(), &matching)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("serviceUrl"));
        assert!(http.requests().is_empty());
    }

    #[test]
    fn configured_state_follows_credentials() {
        assert!(driver(json!({})).is_configured());
        let unconfigured = BotFrameworkDriver::from_request_body(
            b"{}",
            BotFrameworkConfig::default(),
            Arc::new(RecordingHttp::new()),
        );
        assert!(!unconfigured.is_configured());
    }
}
