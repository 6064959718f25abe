//! HTTP gateway hosting the Bot Framework webhook.
//!
//! Every delivery gets its own driver; matched traffic is handed to an
//! [`InboundSink`](botwire_channels::InboundSink).

pub mod server;
pub mod sink;
pub mod webhook;

pub use {
    server::{AppState, botframework_config, build_router, start_gateway},
    sink::LogSink,
    webhook::{WebhookOutcome, handle_webhook},
};
