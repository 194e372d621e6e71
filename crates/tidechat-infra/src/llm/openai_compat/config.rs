//! Configuration and per-provider defaults for OpenAI-compatible providers.
//!
//! Each vendor speaking the OpenAI chat completions protocol gets a factory
//! function returning an [`OpenAiCompatConfig`] with the correct base URL
//! and capabilities.

use secrecy::SecretString;

use tidechat_types::llm::ProviderCapabilities;

/// Configuration for an OpenAI-compatible LLM provider.
pub struct OpenAiCompatConfig {
    /// Human-readable provider name (e.g. "xai", "groq").
    pub provider_name: String,
    /// Base URL for the API (e.g. "https://api.x.ai/v1").
    pub base_url: String,
    /// API key for authentication.
    pub api_key: SecretString,
    /// Upstream model name (e.g. "grok-2-1212").
    pub model: String,
    /// What this provider supports.
    pub capabilities: ProviderCapabilities,
}

/// xAI default configuration.
///
/// Base URL: `https://api.x.ai/v1`
pub fn xai_defaults(api_key: SecretString, model: &str) -> OpenAiCompatConfig {
    OpenAiCompatConfig {
        provider_name: "xai".into(),
        base_url: "https://api.x.ai/v1".into(),
        api_key,
        model: model.into(),
        capabilities: ProviderCapabilities {
            streaming: true,
            reasoning: false,
            max_context_tokens: 131_072,
            max_output_tokens: 8_192,
        },
    }
}

/// Groq default configuration (OpenAI-compatible endpoint).
///
/// Base URL: `https://api.groq.com/openai/v1`
pub fn groq_defaults(api_key: SecretString, model: &str) -> OpenAiCompatConfig {
    OpenAiCompatConfig {
        provider_name: "groq".into(),
        base_url: "https://api.groq.com/openai/v1".into(),
        api_key,
        model: model.into(),
        capabilities: ProviderCapabilities {
            streaming: true,
            reasoning: true,
            max_context_tokens: 128_000,
            max_output_tokens: 16_384,
        },
    }
}
