//! Chat endpoints.
//!
//! POST /api/chat -- continue (or create) a conversation and stream the
//! model response as Server-Sent Events. Guard order: principal ->
//! selected-model cookie -> user message -> resolve/ownership/persist ->
//! stream. Early failures are plain status responses; once the stream is
//! committed, failures become an inline `error` event.
//!
//! SSE event types:
//! - `start` -- initial event with `{ "message_id": "..." }`
//! - `text_delta` -- incremental answer text: `{ "text": "..." }`
//! - `reasoning_delta` -- incremental reasoning text: `{ "text": "..." }`
//! - `error` -- generic inline error: `{ "message": "..." }`
//! - `done` -- stream complete: `{}`
//!
//! DELETE /api/chat -- resolve, ownership-check, delete.
//! GET /api/chat/{id} -- normalized message history.

use std::convert::Infallible;
use std::time::Duration;

use axum::extract::{Path, State};
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::Json;
use axum_extra::extract::cookie::CookieJar;
use futures_util::StreamExt;
use serde::Deserialize;
use tokio_stream::Stream;
use uuid::Uuid;

use tidechat_core::chat::normalize::{
    incoming_to_ui_messages, most_recent_user_message, text_content, to_model_messages,
};
use tidechat_core::chat::service::ensure_owner;
use tidechat_core::chat::title::{fallback_title, generate_title};
use tidechat_core::llm::prompts::system_prompt;
use tidechat_core::llm::reasoning::extract_reasoning;
use tidechat_core::llm::smooth::smooth_words;
use tidechat_observe::genai_attrs;
use tidechat_types::chat::{IncomingMessage, Trigger, UiMessage};
use tidechat_types::llm::{CompletionRequest, StreamEvent};
use tidechat_types::part::Part;

use crate::http::error::AppError;
use crate::http::extractors::auth::{MaybePrincipal, Principal};
use crate::state::AppState;

/// Request body for the streaming chat endpoint.
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    /// Client-generated conversation id; created on first use.
    pub id: Uuid,
    #[serde(default)]
    pub messages: Vec<IncomingMessage>,
    #[serde(default)]
    pub trigger: Trigger,
}

/// Request body for the delete endpoint.
#[derive(Debug, Deserialize)]
pub struct DeleteChatRequest {
    pub id: Uuid,
}

/// Whether stream completion should persist the assistant message.
///
/// Anonymous requests are never persisted; a regenerate trigger means the
/// caller already captured and replaced the history.
fn should_persist(principal: Option<&Principal>, trigger: Trigger) -> bool {
    principal.is_some() && trigger != Trigger::RegenerateMessage
}

/// POST /api/chat -- SSE streaming chat.
pub async fn post_chat(
    State(state): State<AppState>,
    MaybePrincipal(principal): MaybePrincipal,
    jar: CookieJar,
    Json(body): Json<ChatRequest>,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, AppError> {
    if principal.is_none() && !state.config.allow_anonymous_chats {
        return Err(AppError::Unauthorized);
    }

    let selected_model = jar
        .get("selected-model")
        .map(|c| c.value().to_string())
        .ok_or_else(|| AppError::Validation("No chat model selected".to_string()))?;

    let messages = incoming_to_ui_messages(&body.messages);
    let user_message = most_recent_user_message(&messages)
        .cloned()
        .ok_or_else(|| AppError::Validation("No user message found".to_string()))?;

    if let Some(principal) = principal {
        if body.trigger != Trigger::RegenerateMessage {
            let user_text = text_content(&user_message);
            let title_state = state.clone();

            let conversation = state
                .chat_service
                .resolve_or_create(body.id, principal.user_id, move || async move {
                    match title_state.models.resolve("title-model") {
                        Some(model) => {
                            tracing::debug!(
                                gen_ai.operation.name = genai_attrs::OP_GENERATE_TITLE,
                                "deriving conversation title"
                            );
                            generate_title(&model.provider, &user_text).await
                        }
                        None => fallback_title(&user_text),
                    }
                })
                .await?;

            ensure_owner(&conversation, principal.user_id)?;

            state
                .chat_service
                .save_user_message(body.id, &user_message)
                .await?;
        }
    }

    let model = state
        .models
        .resolve(&selected_model)
        .ok_or_else(|| AppError::Validation("Unknown chat model".to_string()))?;

    let request = CompletionRequest {
        model: String::new(),
        messages: to_model_messages(&messages),
        system: Some(system_prompt(&selected_model)),
        max_tokens: model.provider.capabilities().max_output_tokens,
        temperature: None,
        stream: true,
    };

    let mut llm_stream = genai_attrs::stream_text_span(model.provider.name(), &selected_model)
        .in_scope(|| model.provider.stream(request));
    if let Some(tag) = &model.reasoning_tag {
        llm_stream = extract_reasoning(llm_stream, tag);
    }
    let llm_stream = smooth_words(llm_stream);

    let assistant_id = Uuid::now_v7();
    let persist = should_persist(principal.as_ref(), body.trigger);
    let chat_service = state.chat_service.clone();
    let conversation_id = body.id;

    let sse_stream = async_stream::stream! {
        let start = serde_json::json!({ "message_id": assistant_id.to_string() });
        yield Ok::<_, Infallible>(Event::default().event("start").data(start.to_string()));

        let mut text = String::new();
        let mut reasoning = String::new();
        let mut had_error = false;

        let mut llm_stream = std::pin::pin!(llm_stream);

        while let Some(event_result) = llm_stream.next().await {
            match event_result {
                Ok(StreamEvent::TextDelta { text: delta }) => {
                    let data = serde_json::json!({ "text": delta });
                    yield Ok(Event::default().event("text_delta").data(data.to_string()));
                    text.push_str(&delta);
                }
                Ok(StreamEvent::ReasoningDelta { text: delta }) => {
                    let data = serde_json::json!({ "text": delta });
                    yield Ok(Event::default().event("reasoning_delta").data(data.to_string()));
                    reasoning.push_str(&delta);
                }
                Ok(StreamEvent::Usage(usage)) => {
                    tracing::debug!(
                        gen_ai.operation.name = genai_attrs::OP_STREAM_TEXT,
                        gen_ai.usage.input_tokens = usage.input_tokens,
                        gen_ai.usage.output_tokens = usage.output_tokens,
                        "generation usage"
                    );
                }
                Ok(StreamEvent::Done) => break,
                Ok(_) => {}
                Err(e) => {
                    tracing::error!(error = %e, "text generation failed");
                    let data = serde_json::json!({ "message": "Oops!" });
                    yield Ok(Event::default().event("error").data(data.to_string()));
                    had_error = true;
                    break;
                }
            }
        }

        if !had_error && persist && !(text.is_empty() && reasoning.is_empty()) {
            let mut parts = Vec::new();
            if !reasoning.is_empty() {
                parts.push(Part::reasoning(std::mem::take(&mut reasoning)));
            }
            parts.push(Part::text(std::mem::take(&mut text)));

            if let Err(e) = chat_service
                .save_assistant_message(conversation_id, assistant_id, parts)
                .await
            {
                tracing::error!(error = %e, "failed to persist assistant message");
            }
        }

        yield Ok(Event::default().event("done").data("{}"));
    };

    Ok(Sse::new(sse_stream).keep_alive(KeepAlive::new().interval(Duration::from_secs(15))))
}

/// DELETE /api/chat -- delete a conversation and its messages.
pub async fn delete_chat(
    State(state): State<AppState>,
    MaybePrincipal(principal): MaybePrincipal,
    Json(body): Json<DeleteChatRequest>,
) -> Result<&'static str, AppError> {
    let principal = principal.ok_or(AppError::Unauthorized)?;

    state
        .chat_service
        .delete(&body.id, principal.user_id)
        .await?;

    Ok("Chat deleted")
}

/// GET /api/chat/{id} -- normalized message history for a conversation.
pub async fn get_chat(
    State(state): State<AppState>,
    MaybePrincipal(principal): MaybePrincipal,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<UiMessage>>, AppError> {
    let principal = principal.ok_or(AppError::Unauthorized)?;

    let messages = state.chat_service.history(&id, principal.user_id).await?;
    Ok(Json(messages))
}
