use std::sync::LazyLock;

use {
    regex::Regex,
    serde_json::{Map, Value},
    tracing::debug,
};

/// Teams system events the driver knows about.
pub const GENERIC_EVENTS: &[&str] = &[
    "channelCreated",
    "channelRenamed",
    "channelDeleted",
    "teamRenamed",
    "teamMemberAdded",
    "teamMemberRemoved",
];

/// Content type of the HTML copy Teams attaches to plain text messages.
const PLAIN_HTML: &str = "text/html";

// Mention of the bot in a web Skype group chat, plus trailing junk bytes.
#[allow(clippy::expect_used)]
static SKYPE_MENTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<at id=(.*?)at>[^\x20-\x7F\n]*\s*").expect("valid mention regex")
});

// Mention of the bot in a Teams group chat.
#[allow(clippy::expect_used)]
static TEAMS_MENTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<at(.*?)at>[^\x20-\x7F\n]*\s*").expect("valid mention regex")
});

/// A decoded Bot Framework webhook body.
///
/// Kept as a loose JSON object: channels differ in which fields they send
/// and every read is defensive.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InboundActivity(Map<String, Value>);

impl InboundActivity {
    /// Decode a webhook body. Anything that is not a JSON object yields an
    /// empty activity, which no classifier accepts.
    pub fn from_slice(body: &[u8]) -> Self {
        match serde_json::from_slice::<Value>(body) {
            Ok(Value::Object(map)) => Self(map),
            Ok(other) => {
                debug!(kind = ?other, "webhook body is not a JSON object");
                Self::default()
            },
            Err(e) => {
                debug!(error = %e, "webhook body is not valid JSON");
                Self::default()
            },
        }
    }

    /// Field lookup that treats `null` like a missing key.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key).filter(|v| !v.is_null())
    }

    pub fn text(&self) -> &str {
        self.get("text").and_then(Value::as_str).unwrap_or_default()
    }

    pub fn sender_id(&self) -> Option<&str> {
        self.get("from")?.get("id")?.as_str()
    }

    pub fn sender_name(&self) -> Option<&str> {
        self.get("from")?.get("name")?.as_str()
    }

    pub fn conversation_id(&self) -> Option<&str> {
        self.get("conversation")?.get("id")?.as_str()
    }

    pub fn service_url(&self) -> Option<&str> {
        self.get("serviceUrl")?.as_str()
    }

    /// `channelData.eventType`, when it holds a truthy value.
    pub fn event_type(&self) -> Option<&Value> {
        self.get("channelData")?
            .get("eventType")
            .filter(|v| is_truthy(v))
    }

    /// No attachments, or only the HTML rendition Teams adds to text.
    pub fn has_no_real_attachments(&self) -> bool {
        match self.get("attachments") {
            None => true,
            Some(Value::Array(items)) => match items.as_slice() {
                [] => true,
                [only] => only.get("contentType").and_then(Value::as_str) == Some(PLAIN_HTML),
                _ => false,
            },
            Some(Value::Object(map)) => map.is_empty(),
            Some(_) => false,
        }
    }

    /// Both `recipient` and `serviceUrl` are present, so a reply can be routed.
    pub fn is_routable(&self) -> bool {
        self.get("recipient").is_some() && self.get("serviceUrl").is_some()
    }

    pub fn to_value(&self) -> Value {
        Value::Object(self.0.clone())
    }
}

impl From<Map<String, Value>> for InboundActivity {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

/// Strip bot mention markup (`<at id=…>…</at>` and `<at>…</at>`).
pub fn clean_text(text: &str) -> String {
    let text = SKYPE_MENTION.replace_all(text, "");
    TEAMS_MENTION.replace_all(&text, "").into_owned()
}

/// Loose truthiness: empty strings, `"0"`, zero, `false`, `null` and empty
/// containers are false.
pub(crate) fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty() && s != "0",
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}
