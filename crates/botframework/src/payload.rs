use {
    botwire_channels::{
        Attachment, Button, IncomingMessage, Outgoing, OutgoingMessage, Question, ServicePayload,
    },
    serde_json::{Map, Value, json},
    tracing::debug,
};

use crate::{
    error::{Error, Result},
    interactive::encode_button_value,
    merge::{merge_recursive, replace_recursive},
};

pub const HERO_CARD: &str = "application/vnd.microsoft.card.hero";

/// Service URLs of the embedded Web Chat channel contain this.
const WEBCHAT_MARKER: &str = "webchat.botframework";

/// Render `message` as a Bot Framework activity addressed to the
/// conversation `matching` came from.
pub fn build_service_payload(
    message: Outgoing,
    matching: &IncomingMessage,
    additional: &Map<String, Value>,
) -> Result<ServicePayload> {
    let mut parameters = base_parameters();
    merge_recursive(&mut parameters, additional);

    match message {
        Outgoing::Question(question) => {
            parameters.insert("attachments".into(), json!([hero_card(&question)]));
        },
        Outgoing::Message(message) => render_message(&mut parameters, message),
        Outgoing::Raw(raw) => {
            let mut replaced = base_parameters();
            replace_recursive(&mut replaced, &raw);
            replace_recursive(&mut replaced, additional);
            parameters = replaced;
        },
        Outgoing::Text(text) => {
            parameters.insert("text".into(), Value::String(nl2br(&text)));
        },
    }

    // Originated messages carry no recipient; reply to the sender instead.
    let recipient = if matching.recipient.is_empty() {
        &matching.sender
    } else {
        &matching.recipient
    };
    let service_url =
        service_url(&matching.payload, additional).ok_or(Error::MissingServiceUrl)?;
    let url = format!(
        "{}/v3/conversations/{}/activities",
        service_url.trim_end_matches('/'),
        urlencoding::encode(recipient)
    );

    if url.contains(WEBCHAT_MARKER) {
        let bot_id = matching
            .payload
            .pointer("/recipient/id")
            .cloned()
            .unwrap_or(Value::Null);
        parameters.insert("from".into(), json!({ "id": bot_id }));
    }

    debug!(url, "built Bot Framework activity");
    Ok(ServicePayload {
        url,
        body: Value::Object(parameters),
    })
}

/// The `serviceUrl` of the inbound activity, else the one in `fallback`.
pub(crate) fn service_url<'a>(
    payload: &'a Value,
    fallback: &'a Map<String, Value>,
) -> Option<&'a str> {
    [payload.get("serviceUrl"), fallback.get("serviceUrl")]
        .into_iter()
        .flatten()
        .filter_map(Value::as_str)
        .find(|url| !url.is_empty())
}

fn base_parameters() -> Map<String, Value> {
    let mut parameters = Map::new();
    parameters.insert("type".into(), Value::String("message".into()));
    parameters
}

fn render_message(parameters: &mut Map<String, Value>, message: OutgoingMessage) {
    parameters.insert("text".into(), Value::String(message.text));
    let media = match message.attachment {
        Some(Attachment::Image { url }) => Some(("image/png", url)),
        Some(Attachment::Video { url }) => Some(("video/mp4", url)),
        Some(other) => {
            debug!(attachment = ?other, "attachment kind not supported by Bot Framework driver");
            None
        },
        None => None,
    };
    if let Some((content_type, url)) = media {
        parameters.insert(
            "attachments".into(),
            json!([{ "contentType": content_type, "contentUrl": url }]),
        );
    }
}

fn hero_card(question: &Question) -> Value {
    let buttons: Vec<Value> = question.buttons.iter().map(render_button).collect();
    json!({
        "contentType": HERO_CARD,
        "content": {
            "text": question.text,
            "buttons": buttons,
        },
    })
}

fn render_button(button: &Button) -> Value {
    let mut rendered = Map::new();
    rendered.insert("type".into(), Value::String("imBack".into()));
    rendered.insert("title".into(), Value::String(button.text.clone()));
    rendered.insert(
        "value".into(),
        Value::String(encode_button_value(&button.text, &button.value)),
    );
    for (key, value) in &button.additional {
        rendered.insert(key.clone(), value.clone());
    }
    Value::Object(rendered)
}

/// Insert `<br />` before every line break (`\r\n`, `\n\r`, `\n` or `\r`).
pub fn nl2br(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(ch) = chars.next() {
        if ch != '\n' && ch != '\r' {
            out.push(ch);
            continue;
        }
        out.push_str("<br />");
        out.push(ch);
        let pair = if ch == '\n' { '\r' } else { '\n' };
        if chars.peek() == Some(&pair) {
            out.push(pair);
            chars.next();
        }
    }
    out
}
