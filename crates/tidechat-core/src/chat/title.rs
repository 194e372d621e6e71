//! Conversation title derivation.
//!
//! New conversations get a short title derived from the first user message.
//! The primary path is an LLM call against the registry's title model; when
//! that fails the title falls back to a word-boundary truncation of the user
//! text, so a title-model outage never fails conversation creation.

use tracing::warn;

use tidechat_types::llm::{CompletionRequest, MessageRole, ModelMessage};

use crate::llm::box_provider::BoxLlmProvider;

const TITLE_SYSTEM_PROMPT: &str = "Generate a short title (at most 80 characters) summarizing \
     what the user is asking about. Do not use quotes or colons. Return ONLY the title text.";

const MAX_TITLE_CHARS: usize = 80;

/// Derive a conversation title from the first user message.
#[tracing::instrument(name = "generate_title", skip(provider, user_text))]
pub async fn generate_title(provider: &BoxLlmProvider, user_text: &str) -> String {
    let request = CompletionRequest {
        model: String::new(),
        messages: vec![ModelMessage {
            role: MessageRole::User,
            content: user_text.to_string(),
        }],
        system: Some(TITLE_SYSTEM_PROMPT.to_string()),
        max_tokens: 50,
        temperature: Some(0.3),
        stream: false,
    };

    match provider.complete(&request).await {
        Ok(response) => {
            let title = response
                .content
                .trim()
                .trim_matches('"')
                .trim_matches('\'')
                .trim()
                .to_string();
            if title.is_empty() {
                fallback_title(user_text)
            } else {
                title
            }
        }
        Err(e) => {
            warn!(error = %e, "Title generation failed, falling back to truncation");
            fallback_title(user_text)
        }
    }
}

/// Truncate the user text to a short title at a word boundary.
pub fn fallback_title(text: &str) -> String {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return "New conversation".to_string();
    }
    if trimmed.chars().count() <= MAX_TITLE_CHARS {
        return trimmed.to_string();
    }

    let cut: String = trimmed.chars().take(MAX_TITLE_CHARS).collect();
    let head = match cut.rfind(char::is_whitespace) {
        Some(idx) if idx > 0 => &cut[..idx],
        _ => cut.as_str(),
    };
    format!("{}…", head.trim_end())
}
