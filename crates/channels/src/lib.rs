//! Contracts between messaging-platform drivers and the conversation engine.
//!
//! A driver (Bot Framework, ...) implements [`HttpDriver`] to turn webhook
//! payloads into generic [`IncomingMessage`]s and to turn generic
//! [`Outgoing`] values back into platform requests. The engine receives
//! matched traffic through an [`InboundSink`].

pub mod driver;
pub mod error;
pub mod http;
pub mod message;
pub mod sink;

pub use {
    driver::{HttpDriver, ServicePayload},
    error::{Error, Result},
    http::{HttpClient, HttpResponse, ReqwestHttpClient, RequestBody},
    message::{
        Answer, Attachment, Button, GenericEvent, IncomingMessage, Outgoing, OutgoingMessage,
        Question, User,
    },
    sink::{Inbound, InboundSink},
};
