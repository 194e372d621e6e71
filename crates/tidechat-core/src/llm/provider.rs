//! LlmProvider trait definition.
//!
//! The core abstraction every provider backend implements. Uses RPITIT for
//! `complete`, and `Pin<Box<dyn Stream>>` for `stream` (streams need to be
//! object-safe for the BoxLlmProvider wrapper).

use std::pin::Pin;

use futures_util::Stream;

use tidechat_types::llm::{
    CompletionRequest, CompletionResponse, LlmError, ProviderCapabilities, StreamEvent,
};

/// Trait for LLM provider backends.
///
/// Implementations live in tidechat-infra (e.g. `OpenAiCompatibleProvider`).
pub trait LlmProvider: Send + Sync {
    /// Human-readable provider name (e.g. "xai", "groq").
    fn name(&self) -> &str;

    /// What this provider supports.
    fn capabilities(&self) -> &ProviderCapabilities;

    /// Send a completion request and receive the full response.
    fn complete(
        &self,
        request: &CompletionRequest,
    ) -> impl std::future::Future<Output = Result<CompletionResponse, LlmError>> + Send;

    /// Send a streaming completion request. Returns a stream of events.
    fn stream(
        &self,
        request: CompletionRequest,
    ) -> Pin<Box<dyn Stream<Item = Result<StreamEvent, LlmError>> + Send + 'static>>;
}
