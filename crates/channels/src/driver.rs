use {
    anyhow::Result,
    async_trait::async_trait,
    serde_json::{Map, Value},
};

use crate::{
    http::HttpResponse,
    message::{Answer, GenericEvent, IncomingMessage, Outgoing, User},
};

/// An outbound request body together with the URL it must be posted to.
///
/// The builder computes both at once so the sender never has to remember
/// where the last payload was headed.
#[derive(Debug, Clone, PartialEq)]
pub struct ServicePayload {
    pub url: String,
    pub body: Value,
}

/// A webhook-based messaging platform driver.
///
/// Instances are request-scoped: one is built per inbound delivery from
/// the raw body, so any cached state dies with the request.
#[async_trait]
pub trait HttpDriver: Send + Sync {
    /// Driver identifier (e.g. "BotFramework").
    fn name(&self) -> &str;

    /// Whether the current request was sent by this platform.
    fn matches_request(&self) -> bool;

    /// A system event carried by the current request, if any.
    fn matching_event(&self) -> Option<GenericEvent>;

    /// Messages carried by the current request. Computed once.
    fn messages(&self) -> &[IncomingMessage];

    /// Whether the current request originates from the bot itself.
    fn is_bot(&self) -> bool {
        false
    }

    /// Resolve a message into an answer for a pending question.
    fn conversation_answer(&self, message: &IncomingMessage) -> Answer {
        Answer::new(message.text.clone()).with_message(message.clone())
    }

    /// The user who sent `message`.
    fn user(&self, message: &IncomingMessage) -> User;

    /// Whether the driver has the credentials it needs to send.
    fn is_configured(&self) -> bool;

    /// Translate an outgoing value into the platform's wire format.
    fn build_service_payload(
        &self,
        message: Outgoing,
        matching: &IncomingMessage,
        additional: &Map<String, Value>,
    ) -> Result<ServicePayload>;

    /// Deliver a payload produced by [`HttpDriver::build_service_payload`].
    async fn send_payload(&self, payload: &ServicePayload) -> Result<HttpResponse>;

    /// Call an arbitrary platform API endpoint.
    async fn send_request(
        &self,
        endpoint: &str,
        parameters: Map<String, Value>,
        matching: &IncomingMessage,
    ) -> Result<HttpResponse>;
}
