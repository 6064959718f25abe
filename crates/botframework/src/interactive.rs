//! Button values carried through Bot Framework `imBack` replies.
//!
//! An `imBack` button makes the client post its `value` back as plain chat
//! text, so the machine-readable value is appended to the label as an
//! inline marker and recovered when the reply arrives.

use std::sync::LazyLock;

use {
    botwire_channels::{Answer, IncomingMessage},
    regex::Regex,
    tracing::debug,
};

const MARKER_PREFIX: &str = "<botman value=\"";

// Accepts the self-closing marker written by `encode_button_value` and the
// explicit `></botman>` closing form.
#[allow(clippy::expect_used)]
static MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<botman value="(.*)"(?:\s*/>|></botman>)"#).expect("valid marker regex")
});

/// Text an `imBack` button posts back: the label followed by the marker.
pub fn encode_button_value(label: &str, value: &str) -> String {
    format!("{label}{MARKER_PREFIX}{value}\" />")
}

/// The value embedded in `text`, if it carries a well-formed marker.
pub fn decode_button_value(text: &str) -> Option<&str> {
    if !text.contains(MARKER_PREFIX) {
        return None;
    }
    let value = MARKER
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str());
    if value.is_none() {
        debug!(text, "ignoring malformed button value marker");
    }
    value
}

/// Resolve a message into an [`Answer`], flagging button clicks.
///
/// Messages with a malformed marker resolve as plain typed answers.
pub fn conversation_answer(message: &IncomingMessage) -> Answer {
    let answer = Answer::new(message.text.clone()).with_message(message.clone());
    match decode_button_value(&message.text) {
        Some(value) => answer.interactive(value),
        None => answer,
    }
}
