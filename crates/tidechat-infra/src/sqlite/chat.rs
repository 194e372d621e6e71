//! SQLite chat repository implementation.
//!
//! Implements `ChatRepository` from `tidechat-core` using sqlx with split
//! read/write pools: raw queries, private Row structs, reader for lookups,
//! writer for mutations. Message parts and the attachments projection are
//! JSON arrays in TEXT columns, parsed leniently on read.

use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::Row;
use uuid::Uuid;

use tidechat_core::chat::repository::ChatRepository;
use tidechat_types::chat::{Conversation, MessageRecord, NewMessage};
use tidechat_types::error::RepositoryError;
use tidechat_types::llm::MessageRole;
use tidechat_types::part::Part;

use super::pool::DatabasePool;

/// SQLite-backed implementation of `ChatRepository`.
pub struct SqliteChatRepository {
    pool: DatabasePool,
}

impl SqliteChatRepository {
    /// Create a new repository backed by the given database pool.
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

// ---------------------------------------------------------------------------
// Private Row types for SQLite-to-domain mapping
// ---------------------------------------------------------------------------

struct ConversationRow {
    id: String,
    user_id: String,
    title: String,
    created_at: String,
}

impl ConversationRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            user_id: row.try_get("user_id")?,
            title: row.try_get("title")?,
            created_at: row.try_get("created_at")?,
        })
    }

    fn into_conversation(self) -> Result<Conversation, RepositoryError> {
        let id = parse_uuid(&self.id, "conversation id")?;
        let user_id = parse_uuid(&self.user_id, "user_id")?;
        let created_at = parse_datetime(&self.created_at)?;

        Ok(Conversation {
            id,
            user_id,
            title: self.title,
            created_at,
        })
    }
}

struct MessageRow {
    id: String,
    conversation_id: String,
    role: String,
    parts: String,
    attachments: String,
    created_at: String,
}

impl MessageRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            conversation_id: row.try_get("conversation_id")?,
            role: row.try_get("role")?,
            parts: row.try_get("parts")?,
            attachments: row.try_get("attachments")?,
            created_at: row.try_get("created_at")?,
        })
    }

    fn into_record(self) -> Result<MessageRecord, RepositoryError> {
        let id = parse_uuid(&self.id, "message id")?;
        let conversation_id = parse_uuid(&self.conversation_id, "conversation_id")?;
        let role: MessageRole = self
            .role
            .parse()
            .map_err(|e: String| RepositoryError::Query(e))?;
        let created_at = parse_datetime(&self.created_at)?;

        Ok(MessageRecord {
            id,
            conversation_id,
            role,
            parts: parse_json_array(&self.parts),
            attachments: parse_json_array(&self.attachments),
            created_at,
        })
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn parse_uuid(s: &str, field: &str) -> Result<Uuid, RepositoryError> {
    Uuid::parse_str(s).map_err(|e| RepositoryError::Query(format!("invalid {field}: {e}")))
}

fn parse_datetime(s: &str) -> Result<DateTime<Utc>, RepositoryError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| RepositoryError::Query(format!("invalid datetime: {e}")))
}

fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339()
}

/// Historical rows may hold anything in the JSON columns; unparseable
/// payloads read back as empty rather than failing the whole query.
fn parse_json_array(s: &str) -> Vec<Value> {
    serde_json::from_str(s).unwrap_or_default()
}

fn to_json_array(parts: &[Part]) -> Result<String, RepositoryError> {
    serde_json::to_string(parts).map_err(|e| RepositoryError::Query(e.to_string()))
}

// ---------------------------------------------------------------------------
// ChatRepository implementation
// ---------------------------------------------------------------------------

impl ChatRepository for SqliteChatRepository {
    async fn get_conversation(&self, id: &Uuid) -> Result<Conversation, RepositoryError> {
        let row = sqlx::query("SELECT * FROM conversations WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        match row {
            Some(row) => {
                let conversation_row = ConversationRow::from_row(&row)
                    .map_err(|e| RepositoryError::Query(e.to_string()))?;
                conversation_row.into_conversation()
            }
            None => Err(RepositoryError::NotFound),
        }
    }

    async fn create_conversation(
        &self,
        conversation: &Conversation,
    ) -> Result<(), RepositoryError> {
        sqlx::query(
            "INSERT INTO conversations (id, user_id, title, created_at) VALUES (?, ?, ?, ?)",
        )
        .bind(conversation.id.to_string())
        .bind(conversation.user_id.to_string())
        .bind(&conversation.title)
        .bind(format_datetime(&conversation.created_at))
        .execute(&self.pool.writer)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(())
    }

    async fn delete_conversation(&self, id: &Uuid) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM conversations WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool.writer)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    async fn save_messages(&self, messages: &[NewMessage]) -> Result<(), RepositoryError> {
        for message in messages {
            sqlx::query(
                r#"INSERT INTO messages (id, conversation_id, role, parts, attachments, created_at)
                   VALUES (?, ?, ?, ?, ?, ?)
                   ON CONFLICT(id) DO UPDATE SET parts = excluded.parts, attachments = excluded.attachments"#,
            )
            .bind(message.id.to_string())
            .bind(message.conversation_id.to_string())
            .bind(message.role.to_string())
            .bind(to_json_array(&message.parts)?)
            .bind(to_json_array(&message.attachments)?)
            .bind(format_datetime(&message.created_at))
            .execute(&self.pool.writer)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;
        }

        Ok(())
    }

    async fn get_messages(
        &self,
        conversation_id: &Uuid,
    ) -> Result<Vec<MessageRecord>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT * FROM messages WHERE conversation_id = ? ORDER BY created_at ASC",
        )
        .bind(conversation_id.to_string())
        .fetch_all(&self.pool.reader)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        let mut messages = Vec::with_capacity(rows.len());
        for row in &rows {
            let message_row =
                MessageRow::from_row(row).map_err(|e| RepositoryError::Query(e.to_string()))?;
            messages.push(message_row.into_record()?);
        }

        Ok(messages)
    }
}
