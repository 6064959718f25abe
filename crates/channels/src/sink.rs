use {anyhow::Result, async_trait::async_trait};

use crate::{
    driver::HttpDriver,
    message::{Answer, GenericEvent, IncomingMessage, User},
};

/// Traffic handed from a driver to the engine.
#[derive(Debug, Clone)]
pub enum Inbound {
    Message {
        message: IncomingMessage,
        answer: Answer,
        user: User,
    },
    Event(GenericEvent),
}

/// Receiver of matched inbound traffic. The bot engine provides the concrete
/// implementation.
#[async_trait]
pub trait InboundSink: Send + Sync {
    /// Handle one inbound item. `driver` is the request-scoped driver that
    /// produced it and can be used to reply.
    async fn dispatch(&self, driver: &dyn HttpDriver, inbound: Inbound) -> Result<()>;
}
