//! Conversation and message types for Tidechat.
//!
//! Three message shapes appear here, one per lifecycle stage:
//! [`IncomingMessage`] as deserialized off the wire (raw part payloads),
//! [`MessageRecord`] as read back from storage (raw part payloads), and
//! [`UiMessage`] as the normalized in-memory shape both are converted into.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::part::Part;

// Re-export MessageRole from the llm module (used in both chat and llm contexts).
pub use crate::llm::MessageRole;

/// A conversation between a user and the assistant.
///
/// The id is client-supplied so retried creation requests are idempotent.
/// Every conversation has exactly one owner; only the owner may read,
/// mutate, or delete it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Conversation {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub created_at: DateTime<Utc>,
}

/// Client-declared intent for a chat request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Trigger {
    #[serde(rename = "submit-message")]
    SubmitMessage,
    #[serde(rename = "regenerate-message")]
    RegenerateMessage,
}

impl Default for Trigger {
    fn default() -> Self {
        Trigger::SubmitMessage
    }
}

/// A message as received from the client, parts left unparsed.
///
/// `parts` and `attachments` are raw JSON payloads; the normalizer upgrades
/// them into typed [`Part`]s, tolerating malformed historical data.
#[derive(Debug, Clone, Deserialize)]
pub struct IncomingMessage {
    pub id: Uuid,
    pub role: MessageRole,
    #[serde(default)]
    pub parts: Vec<Value>,
    #[serde(default)]
    pub attachments: Vec<Value>,
}

/// A message as read back from storage, parts left unparsed.
#[derive(Debug, Clone)]
pub struct MessageRecord {
    pub id: Uuid,
    pub conversation_id: Uuid,
    pub role: MessageRole,
    pub parts: Vec<Value>,
    pub attachments: Vec<Value>,
    pub created_at: DateTime<Utc>,
}

/// The uniform in-memory message shape: one merged, ordered part sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UiMessage {
    pub id: Uuid,
    pub role: MessageRole,
    pub parts: Vec<Part>,
}

/// A message row to be written: typed parts plus the file projection.
#[derive(Debug, Clone)]
pub struct NewMessage {
    pub id: Uuid,
    pub conversation_id: Uuid,
    pub role: MessageRole,
    pub parts: Vec<Part>,
    pub attachments: Vec<Part>,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trigger_serde() {
        let json = serde_json::to_string(&Trigger::RegenerateMessage).unwrap();
        assert_eq!(json, "\"regenerate-message\"");
        let parsed: Trigger = serde_json::from_str("\"submit-message\"").unwrap();
        assert_eq!(parsed, Trigger::SubmitMessage);
    }

    #[test]
    fn test_trigger_default() {
        assert_eq!(Trigger::default(), Trigger::SubmitMessage);
    }

    #[test]
    fn test_incoming_message_defaults_empty_payloads() {
        let json = format!(
            r#"{{"id":"{}","role":"user"}}"#,
            Uuid::now_v7()
        );
        let msg: IncomingMessage = serde_json::from_str(&json).unwrap();
        assert_eq!(msg.role, MessageRole::User);
        assert!(msg.parts.is_empty());
        assert!(msg.attachments.is_empty());
    }

    #[test]
    fn test_conversation_serialize() {
        let conversation = Conversation {
            id: Uuid::now_v7(),
            user_id: Uuid::now_v7(),
            title: "Planning a trip to Rome".to_string(),
            created_at: Utc::now(),
        };
        let json = serde_json::to_string(&conversation).unwrap();
        assert!(json.contains("\"title\":\"Planning a trip to Rome\""));
    }

    #[test]
    fn test_ui_message_roundtrip() {
        let msg = UiMessage {
            id: Uuid::now_v7(),
            role: MessageRole::Assistant,
            parts: vec![Part::reasoning("hm"), Part::text("Hello!")],
        };
        let json = serde_json::to_string(&msg).unwrap();
        let parsed: UiMessage = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, msg);
    }
}
