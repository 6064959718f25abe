use {
    anyhow::Result,
    async_trait::async_trait,
    botwire_channels::{HttpDriver, Inbound, InboundSink},
    tracing::info,
};

/// Sink that only logs what arrives. Used when no engine is attached.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

#[async_trait]
impl InboundSink for LogSink {
    async fn dispatch(&self, driver: &dyn HttpDriver, inbound: Inbound) -> Result<()> {
        match inbound {
            Inbound::Message {
                message,
                answer,
                user,
            } => info!(
                driver = driver.name(),
                sender = %message.sender,
                conversation = %message.recipient,
                username = user.username.as_deref().unwrap_or_default(),
                interactive = answer.is_interactive_reply(),
                text = %message.text,
                "inbound message"
            ),
            Inbound::Event(event) => info!(
                driver = driver.name(),
                event = %event.name,
                "inbound event"
            ),
        }
        Ok(())
    }
}
