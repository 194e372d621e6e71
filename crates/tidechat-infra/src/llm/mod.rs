//! LLM provider implementations.
//!
//! Concrete implementations of the [`LlmProvider`] trait defined in
//! `tidechat-core`. Every configured vendor speaks the OpenAI chat
//! completions protocol, so one provider type covers them all; the factory
//! here picks base URL and capabilities per [`ProviderKind`].

pub mod openai_compat;

use secrecy::SecretString;

use tidechat_core::llm::box_provider::BoxLlmProvider;
use tidechat_types::config::{ModelConfig, ProviderKind};
use tidechat_types::llm::ProviderCapabilities;

use self::openai_compat::config::OpenAiCompatConfig;
use self::openai_compat::OpenAiCompatibleProvider;

/// Create a [`BoxLlmProvider`] from a registry entry and its resolved API key.
pub fn create_provider(config: &ModelConfig, api_key: SecretString) -> BoxLlmProvider {
    let provider = match config.provider {
        ProviderKind::Xai => OpenAiCompatibleProvider::xai(api_key, &config.model),
        ProviderKind::Groq => OpenAiCompatibleProvider::groq(api_key, &config.model),
        ProviderKind::OpenAiCompatible => {
            let base_url = config
                .base_url
                .clone()
                .unwrap_or_else(|| "https://api.openai.com/v1".to_string());
            OpenAiCompatibleProvider::new(OpenAiCompatConfig {
                provider_name: "openai_compatible".to_string(),
                base_url,
                api_key,
                model: config.model.clone(),
                capabilities: ProviderCapabilities {
                    streaming: true,
                    reasoning: config.reasoning_tag.is_some(),
                    max_context_tokens: 128_000,
                    max_output_tokens: 16_384,
                },
            })
        }
    };
    BoxLlmProvider::new(provider)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(provider: ProviderKind, model: &str) -> ModelConfig {
        ModelConfig {
            id: "chat-model".to_string(),
            provider,
            model: model.to_string(),
            reasoning_tag: None,
            base_url: None,
            api_key_env: None,
        }
    }

    #[test]
    fn test_create_provider_xai() {
        let provider = create_provider(
            &entry(ProviderKind::Xai, "grok-2-1212"),
            SecretString::from("xai-test"),
        );
        assert_eq!(provider.name(), "xai");
    }

    #[test]
    fn test_create_provider_groq() {
        let provider = create_provider(
            &entry(ProviderKind::Groq, "deepseek-r1-distill-llama-70b"),
            SecretString::from("gsk-test"),
        );
        assert_eq!(provider.name(), "groq");
    }

    #[test]
    fn test_create_provider_custom_base_url() {
        let config = ModelConfig {
            base_url: Some("https://llm.internal.example/v1".to_string()),
            ..entry(ProviderKind::OpenAiCompatible, "local-model")
        };
        let provider = create_provider(&config, SecretString::from("key"));
        assert_eq!(provider.name(), "openai_compatible");
    }
}
