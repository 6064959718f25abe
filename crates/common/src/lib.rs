//! Shared error definitions and helpers used across the botwire crates.

pub mod error;

pub use error::{Error, FromMessage, Result};
