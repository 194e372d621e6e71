//! Message normalization: raw stored/inbound payloads to uniform parts.
//!
//! Message rows carry two raw JSON payloads: `parts` (the typed content) and
//! `attachments` (a legacy projection that older rows used as the only file
//! record). Normalization merges them into one ordered part sequence: native
//! parts first, then file parts synthesized from legacy attachment records.
//!
//! Malformed elements in either payload are dropped, not errors -- historical
//! data is tolerated, never trusted.

use serde_json::Value;

use tidechat_types::chat::{IncomingMessage, MessageRecord, UiMessage};
use tidechat_types::llm::{MessageRole, ModelMessage};
use tidechat_types::part::Part;

/// Merge raw part and attachment payloads into one typed part sequence.
///
/// The attachments column is a redundant projection of the file parts, so an
/// upgraded attachment already present verbatim among the native parts is
/// skipped. Pure and idempotent: a normalized message has an empty
/// attachments payload, so normalizing it again returns the same parts.
pub fn normalize_parts(raw_parts: &[Value], raw_attachments: &[Value]) -> Vec<Part> {
    let mut parts: Vec<Part> = raw_parts
        .iter()
        .filter_map(|v| serde_json::from_value(v.clone()).ok())
        .collect();

    let native_count = parts.len();
    for part in raw_attachments.iter().filter_map(upgrade_attachment) {
        if !parts[..native_count].contains(&part) {
            parts.push(part);
        }
    }
    parts
}

/// Upgrade one attachment value to a file part, or drop it.
///
/// Accepts either a part already tagged as the file variant (persisted
/// directly by the current writer) or the legacy
/// `{ url, contentType, name? }` record. `url` and `contentType` must be
/// strings; `name` is optional.
fn upgrade_attachment(value: &Value) -> Option<Part> {
    let obj = value.as_object()?;

    if obj.get("type").and_then(Value::as_str) == Some("file") {
        return serde_json::from_value(value.clone()).ok();
    }

    if obj.contains_key("url") {
        let url = obj.get("url")?.as_str()?;
        let media_type = obj.get("contentType")?.as_str()?;
        let filename = obj
            .get("name")
            .and_then(Value::as_str)
            .map(str::to_owned);
        return Some(Part::File {
            url: url.to_string(),
            media_type: media_type.to_string(),
            filename,
        });
    }

    None
}

/// Normalize stored message records into the uniform in-memory shape.
pub fn records_to_ui_messages(records: &[MessageRecord]) -> Vec<UiMessage> {
    records
        .iter()
        .map(|record| UiMessage {
            id: record.id,
            role: record.role,
            parts: normalize_parts(&record.parts, &record.attachments),
        })
        .collect()
}

/// Normalize inbound wire messages into the uniform in-memory shape.
pub fn incoming_to_ui_messages(messages: &[IncomingMessage]) -> Vec<UiMessage> {
    messages
        .iter()
        .map(|message| UiMessage {
            id: message.id,
            role: message.role,
            parts: normalize_parts(&message.parts, &message.attachments),
        })
        .collect()
}

/// The most recent user message, if any.
pub fn most_recent_user_message(messages: &[UiMessage]) -> Option<&UiMessage> {
    messages.iter().rev().find(|m| m.role == MessageRole::User)
}

/// Concatenated text content of a message's parts.
pub fn text_content(message: &UiMessage) -> String {
    let texts: Vec<&str> = message
        .parts
        .iter()
        .filter_map(|part| match part {
            Part::Text { text } => Some(text.as_str()),
            _ => None,
        })
        .collect();
    texts.join("\n")
}

/// Flatten normalized history into provider messages, ids stripped.
///
/// Providers here take text-only content: text parts are joined per message,
/// reasoning and file parts are not sent upstream. Messages with no text are
/// skipped.
pub fn to_model_messages(messages: &[UiMessage]) -> Vec<ModelMessage> {
    messages
        .iter()
        .filter_map(|message| {
            let content = text_content(message);
            if content.is_empty() {
                None
            } else {
                Some(ModelMessage {
                    role: message.role,
                    content,
                })
            }
        })
        .collect()
}
