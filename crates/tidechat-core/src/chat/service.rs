//! Chat service sequencing resolution, ownership checks, and persistence.
//!
//! Every mutating path runs the same guarded sequence: resolve (or create)
//! the conversation, verify the requesting principal owns it, then write.
//! The ownership check runs strictly after resolution and strictly before
//! the first write.

use chrono::Utc;
use std::future::Future;
use tracing::info;
use uuid::Uuid;

use tidechat_types::chat::{Conversation, NewMessage, UiMessage};
use tidechat_types::error::{ChatError, RepositoryError};
use tidechat_types::llm::MessageRole;
use tidechat_types::part::{file_parts, Part};

use crate::chat::normalize::records_to_ui_messages;
use crate::chat::repository::ChatRepository;

/// Reject unless the principal owns the conversation.
pub fn ensure_owner(conversation: &Conversation, principal: Uuid) -> Result<(), ChatError> {
    if conversation.user_id != principal {
        return Err(ChatError::Forbidden);
    }
    Ok(())
}

/// Orchestrates conversation lifecycle and message persistence.
///
/// Generic over [`ChatRepository`] so the core crate never depends on the
/// storage implementation.
pub struct ChatService<R: ChatRepository> {
    repo: R,
}

impl<R: ChatRepository> ChatService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Access the repository.
    pub fn repo(&self) -> &R {
        &self.repo
    }

    /// Resolve a conversation by id, creating it when missing.
    ///
    /// An existing conversation is returned unchanged -- no title
    /// regeneration, no re-creation. Only the distinguishable not-found
    /// kind triggers creation; any other lookup failure is fatal for the
    /// request. `make_title` is invoked lazily, on the creation path only.
    pub async fn resolve_or_create<F, Fut>(
        &self,
        id: Uuid,
        owner: Uuid,
        make_title: F,
    ) -> Result<Conversation, ChatError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = String>,
    {
        match self.repo.get_conversation(&id).await {
            Ok(conversation) => Ok(conversation),
            Err(RepositoryError::NotFound) => {
                let title = make_title().await;
                let conversation = Conversation {
                    id,
                    user_id: owner,
                    title,
                    created_at: Utc::now(),
                };
                self.repo.create_conversation(&conversation).await?;
                info!(conversation_id = %id, "Conversation created");
                Ok(conversation)
            }
            Err(other) => Err(other.into()),
        }
    }

    /// Persist one user message, extracting the file-attachment projection.
    pub async fn save_user_message(
        &self,
        conversation_id: Uuid,
        message: &UiMessage,
    ) -> Result<(), ChatError> {
        let row = build_row(conversation_id, message.id, message.role, message.parts.clone());
        self.repo.save_messages(&[row]).await?;
        Ok(())
    }

    /// Persist one assistant message, extracting the file-attachment projection.
    pub async fn save_assistant_message(
        &self,
        conversation_id: Uuid,
        id: Uuid,
        parts: Vec<Part>,
    ) -> Result<(), ChatError> {
        let row = build_row(conversation_id, id, MessageRole::Assistant, parts);
        self.repo.save_messages(&[row]).await?;
        Ok(())
    }

    /// Resolve, check ownership, delete.
    pub async fn delete(&self, id: &Uuid, principal: Uuid) -> Result<(), ChatError> {
        let conversation = self.repo.get_conversation(id).await?;
        ensure_owner(&conversation, principal)?;
        self.repo.delete_conversation(id).await?;
        info!(conversation_id = %id, "Conversation deleted");
        Ok(())
    }

    /// Resolve, check ownership, return the normalized message history.
    pub async fn history(&self, id: &Uuid, principal: Uuid) -> Result<Vec<UiMessage>, ChatError> {
        let conversation = self.repo.get_conversation(id).await?;
        ensure_owner(&conversation, principal)?;
        let records = self.repo.get_messages(id).await?;
        Ok(records_to_ui_messages(&records))
    }
}

fn build_row(
    conversation_id: Uuid,
    id: Uuid,
    role: MessageRole,
    parts: Vec<Part>,
) -> NewMessage {
    let attachments = file_parts(&parts);
    NewMessage {
        id,
        conversation_id,
        role,
        parts,
        attachments,
        created_at: Utc::now(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use tidechat_types::chat::MessageRecord;

    /// In-memory repository recording every write.
    #[derive(Default)]
    struct FakeRepo {
        conversations: Mutex<Vec<Conversation>>,
        messages: Mutex<Vec<NewMessage>>,
        fail_lookups: bool,
    }

    impl ChatRepository for FakeRepo {
        async fn get_conversation(&self, id: &Uuid) -> Result<Conversation, RepositoryError> {
            if self.fail_lookups {
                return Err(RepositoryError::Query("storage unavailable".to_string()));
            }
            self.conversations
                .lock()
                .unwrap()
                .iter()
                .find(|c| c.id == *id)
                .cloned()
                .ok_or(RepositoryError::NotFound)
        }

        async fn create_conversation(
            &self,
            conversation: &Conversation,
        ) -> Result<(), RepositoryError> {
            self.conversations.lock().unwrap().push(conversation.clone());
            Ok(())
        }

        async fn delete_conversation(&self, id: &Uuid) -> Result<(), RepositoryError> {
            let mut conversations = self.conversations.lock().unwrap();
            let before = conversations.len();
            conversations.retain(|c| c.id != *id);
            if conversations.len() == before {
                return Err(RepositoryError::NotFound);
            }
            Ok(())
        }

        async fn save_messages(&self, messages: &[NewMessage]) -> Result<(), RepositoryError> {
            self.messages.lock().unwrap().extend_from_slice(messages);
            Ok(())
        }

        async fn get_messages(
            &self,
            conversation_id: &Uuid,
        ) -> Result<Vec<MessageRecord>, RepositoryError> {
            Ok(self
                .messages
                .lock()
                .unwrap()
                .iter()
                .filter(|m| m.conversation_id == *conversation_id)
                .map(|m| MessageRecord {
                    id: m.id,
                    conversation_id: m.conversation_id,
                    role: m.role,
                    parts: m
                        .parts
                        .iter()
                        .map(|p| serde_json::to_value(p).unwrap())
                        .collect(),
                    attachments: m
                        .attachments
                        .iter()
                        .map(|p| serde_json::to_value(p).unwrap())
                        .collect(),
                    created_at: m.created_at,
                })
                .collect())
        }
    }

    fn user_message(text: &str) -> UiMessage {
        UiMessage {
            id: Uuid::now_v7(),
            role: MessageRole::User,
            parts: vec![Part::text(text)],
        }
    }

    #[tokio::test]
    async fn test_resolve_creates_missing_conversation_with_title() {
        let service = ChatService::new(FakeRepo::default());
        let id = Uuid::now_v7();
        let owner = Uuid::now_v7();

        let conversation = service
            .resolve_or_create(id, owner, || async { "Planning a trip to Rome".to_string() })
            .await
            .unwrap();

        assert_eq!(conversation.id, id);
        assert_eq!(conversation.user_id, owner);
        assert_eq!(conversation.title, "Planning a trip to Rome");
        assert_eq!(service.repo().conversations.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_resolve_returns_existing_without_title_call() {
        let service = ChatService::new(FakeRepo::default());
        let id = Uuid::now_v7();
        let owner = Uuid::now_v7();
        service
            .resolve_or_create(id, owner, || async { "Original title".to_string() })
            .await
            .unwrap();

        let found = service
            .resolve_or_create(id, owner, || async { "Replacement title".to_string() })
            .await
            .unwrap();

        assert_eq!(found.title, "Original title");
        assert_eq!(service.repo().conversations.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_resolve_propagates_storage_failure() {
        let repo = FakeRepo {
            fail_lookups: true,
            ..FakeRepo::default()
        };
        let service = ChatService::new(repo);

        let result = service
            .resolve_or_create(Uuid::now_v7(), Uuid::now_v7(), || async {
                "Never used".to_string()
            })
            .await;

        assert!(matches!(result, Err(ChatError::Storage(_))));
    }

    #[tokio::test]
    async fn test_foreign_conversation_is_forbidden_and_writes_nothing() {
        let service = ChatService::new(FakeRepo::default());
        let id = Uuid::now_v7();
        let owner = Uuid::now_v7();
        let stranger = Uuid::now_v7();
        service
            .resolve_or_create(id, owner, || async { "Title".to_string() })
            .await
            .unwrap();

        let conversation = service
            .resolve_or_create(id, stranger, || async { "Never used".to_string() })
            .await
            .unwrap();
        assert!(matches!(
            ensure_owner(&conversation, stranger),
            Err(ChatError::Forbidden)
        ));

        let delete = service.delete(&id, stranger).await;
        assert!(matches!(delete, Err(ChatError::Forbidden)));
        assert_eq!(service.repo().conversations.lock().unwrap().len(), 1);
        assert!(service.repo().messages.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_save_user_message_extracts_attachments() {
        let service = ChatService::new(FakeRepo::default());
        let conversation_id = Uuid::now_v7();
        let mut message = user_message("see attached");
        message.parts.push(Part::File {
            url: "https://x/a.png".to_string(),
            media_type: "image/png".to_string(),
            filename: None,
        });

        service
            .save_user_message(conversation_id, &message)
            .await
            .unwrap();

        let rows = service.repo().messages.lock().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].parts.len(), 2);
        assert_eq!(rows[0].attachments.len(), 1);
        assert!(rows[0].attachments[0].is_file());
    }

    #[tokio::test]
    async fn test_delete_own_conversation_then_missing() {
        let service = ChatService::new(FakeRepo::default());
        let id = Uuid::now_v7();
        let owner = Uuid::now_v7();
        service
            .resolve_or_create(id, owner, || async { "Title".to_string() })
            .await
            .unwrap();

        service.delete(&id, owner).await.unwrap();
        let again = service.delete(&id, owner).await;
        assert!(matches!(again, Err(ChatError::NotFound)));
    }

    #[tokio::test]
    async fn test_history_normalizes_and_checks_ownership() {
        let service = ChatService::new(FakeRepo::default());
        let id = Uuid::now_v7();
        let owner = Uuid::now_v7();
        service
            .resolve_or_create(id, owner, || async { "Title".to_string() })
            .await
            .unwrap();
        service
            .save_user_message(id, &user_message("hello"))
            .await
            .unwrap();

        let history = service.history(&id, owner).await.unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].parts, vec![Part::text("hello")]);

        let stranger = service.history(&id, Uuid::now_v7()).await;
        assert!(matches!(stranger, Err(ChatError::Forbidden)));
    }
}
