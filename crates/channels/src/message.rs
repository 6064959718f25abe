use {
    serde::{Deserialize, Serialize},
    serde_json::{Map, Value},
};

use crate::error::{Error, Result};

// ── Inbound ─────────────────────────────────────────────────────────────────

/// A platform message normalized for the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncomingMessage {
    pub text: String,
    /// Platform ID of whoever sent the message.
    pub sender: String,
    /// Where replies go (a conversation or chat ID, platform dependent).
    pub recipient: String,
    /// The raw decoded webhook body, kept for routing replies.
    pub payload: Value,
}

impl IncomingMessage {
    pub fn new(
        text: impl Into<String>,
        sender: impl Into<String>,
        recipient: impl Into<String>,
        payload: Value,
    ) -> Self {
        Self {
            text: text.into(),
            sender: sender.into(),
            recipient: recipient.into(),
            payload,
        }
    }
}

/// A platform system notification (member added, channel renamed, ...).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenericEvent {
    pub name: String,
    pub payload: Value,
}

impl GenericEvent {
    pub fn new(name: impl Into<String>, payload: Value) -> Self {
        Self {
            name: name.into(),
            payload,
        }
    }
}

/// The engine's view of a reply to a pending question.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Answer {
    pub text: String,
    /// Machine-readable value of the clicked button, empty for typed replies.
    pub value: String,
    pub interactive_reply: bool,
    pub message: Option<IncomingMessage>,
}

impl Answer {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }

    #[must_use]
    pub fn with_message(mut self, message: IncomingMessage) -> Self {
        self.message = Some(message);
        self
    }

    /// Mark the answer as a button click carrying `value`.
    #[must_use]
    pub fn interactive(mut self, value: impl Into<String>) -> Self {
        self.interactive_reply = true;
        self.value = value.into();
        self
    }

    pub fn is_interactive_reply(&self) -> bool {
        self.interactive_reply
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct User {
    pub id: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub username: Option<String>,
    /// Raw platform-specific user data.
    pub info: Value,
}

impl User {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }
}

// ── Outbound ────────────────────────────────────────────────────────────────

/// Media attached to an outgoing message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Attachment {
    Image { url: String },
    Video { url: String },
    Audio { url: String },
    File { url: String },
    Location { latitude: f64, longitude: f64 },
}

impl Attachment {
    pub fn url(&self) -> Option<&str> {
        match self {
            Self::Image { url } | Self::Video { url } | Self::Audio { url } | Self::File { url } => {
                Some(url)
            },
            Self::Location { .. } => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct OutgoingMessage {
    pub text: String,
    pub attachment: Option<Attachment>,
}

impl OutgoingMessage {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            attachment: None,
        }
    }

    #[must_use]
    pub fn with_attachment(mut self, attachment: Attachment) -> Self {
        self.attachment = Some(attachment);
        self
    }
}

/// A reply option offered with a [`Question`].
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Button {
    /// Label shown to the user.
    pub text: String,
    /// Value handed back to the engine when the button is clicked.
    pub value: String,
    /// Extra platform fields merged into the rendered button.
    #[serde(default)]
    pub additional: Map<String, Value>,
}

impl Button {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }

    #[must_use]
    pub fn value(mut self, value: impl Into<String>) -> Self {
        self.value = value.into();
        self
    }

    #[must_use]
    pub fn additional(mut self, additional: Map<String, Value>) -> Self {
        self.additional = additional;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Question {
    pub text: String,
    pub buttons: Vec<Button>,
}

impl Question {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            buttons: Vec::new(),
        }
    }

    #[must_use]
    pub fn add_button(mut self, button: Button) -> Self {
        self.buttons.push(button);
        self
    }

    #[must_use]
    pub fn add_buttons(mut self, buttons: impl IntoIterator<Item = Button>) -> Self {
        self.buttons.extend(buttons);
        self
    }
}

/// Anything the engine can ask a driver to send.
#[derive(Debug, Clone, PartialEq)]
pub enum Outgoing {
    Question(Question),
    Message(OutgoingMessage),
    /// A platform-native payload, passed through almost untouched.
    Raw(Map<String, Value>),
    Text(String),
}

impl From<Question> for Outgoing {
    fn from(question: Question) -> Self {
        Self::Question(question)
    }
}

impl From<OutgoingMessage> for Outgoing {
    fn from(message: OutgoingMessage) -> Self {
        Self::Message(message)
    }
}

impl From<Map<String, Value>> for Outgoing {
    fn from(raw: Map<String, Value>) -> Self {
        Self::Raw(raw)
    }
}

impl From<String> for Outgoing {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<&str> for Outgoing {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl TryFrom<Value> for Outgoing {
    type Error = Error;

    /// Strings become [`Outgoing::Text`], objects become [`Outgoing::Raw`].
    fn try_from(value: Value) -> Result<Self> {
        match value {
            Value::String(text) => Ok(Self::Text(text)),
            Value::Object(raw) => Ok(Self::Raw(raw)),
            other => Err(Error::invalid_input(format!(
                "cannot send a JSON {} as a message",
                json_kind(&other)
            ))),
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
