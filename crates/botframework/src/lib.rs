//! Microsoft Bot Framework driver for botwire.
//!
//! Normalizes Bot Framework webhook activities into generic messages and
//! renders outgoing messages back into activities, authorizing every
//! outbound call with an OAuth client-credentials token.

pub mod activity;
pub mod auth;
pub mod config;
pub mod driver;
pub mod error;
pub mod interactive;
pub mod merge;
pub mod payload;

#[cfg(test)]
mod testing;

pub use {
    config::BotFrameworkConfig,
    driver::{BotFrameworkDriver, DRIVER_NAME},
    error::{Error, Result},
};
