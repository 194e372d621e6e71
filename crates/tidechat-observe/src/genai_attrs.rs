//! OpenTelemetry GenAI Semantic Convention helpers.
//!
//! LLM calls are instrumented with dotted `gen_ai.*` fields per the OTel
//! GenAI semantic conventions; the operation name values live here so the
//! call sites stay consistent.

/// Streaming chat completion operation.
pub const OP_STREAM_TEXT: &str = "stream_text";

/// Auto-title generation for a new conversation.
pub const OP_GENERATE_TITLE: &str = "generate_title";

/// Span for one streaming generation call.
///
/// Fields follow the GenAI conventions: `gen_ai.operation.name`,
/// `gen_ai.provider.name`, `gen_ai.request.model`.
pub fn stream_text_span(provider: &str, model: &str) -> tracing::Span {
    tracing::info_span!(
        "stream_text",
        gen_ai.operation.name = OP_STREAM_TEXT,
        gen_ai.provider.name = %provider,
        gen_ai.request.model = %model,
    )
}
