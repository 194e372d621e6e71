//! ChatRepository trait definition.
//!
//! Storage port for conversations and messages. Implementations live in
//! tidechat-infra (e.g. `SqliteChatRepository`). Uses native async fn in
//! traits (RPITIT, Rust 2024 edition).

use tidechat_types::chat::{Conversation, MessageRecord, NewMessage};
use tidechat_types::error::RepositoryError;
use uuid::Uuid;

/// Repository trait for conversation and message persistence.
///
/// `get_conversation` and `delete_conversation` fail with
/// [`RepositoryError::NotFound`] when the id is unknown; the resolver keys
/// on that kind to create missing conversations.
pub trait ChatRepository: Send + Sync {
    /// Look up a conversation by its id.
    fn get_conversation(
        &self,
        id: &Uuid,
    ) -> impl std::future::Future<Output = Result<Conversation, RepositoryError>> + Send;

    /// Create a new conversation.
    fn create_conversation(
        &self,
        conversation: &Conversation,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Delete a conversation and its messages.
    fn delete_conversation(
        &self,
        id: &Uuid,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Append message rows. Ids are caller-supplied; a repeated id replaces
    /// the previous row's payload (idempotent retry).
    fn save_messages(
        &self,
        messages: &[NewMessage],
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Get a conversation's messages, ordered by created_at ASC.
    fn get_messages(
        &self,
        conversation_id: &Uuid,
    ) -> impl std::future::Future<Output = Result<Vec<MessageRecord>, RepositoryError>> + Send;
}
