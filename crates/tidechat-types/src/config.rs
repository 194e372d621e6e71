//! Application configuration types for Tidechat.
//!
//! `AppConfig` represents the top-level `config.toml`: the anonymous-chat
//! switch and the model registry entries. All fields have defaults so the
//! server boots with no config file at all.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Top-level configuration, loaded once at startup and immutable afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Whether requests without an authenticated principal are accepted.
    #[serde(default)]
    pub allow_anonymous_chats: bool,

    /// Model registry entries, keyed by the id the client selects.
    #[serde(default = "default_models")]
    pub models: Vec<ModelConfig>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            allow_anonymous_chats: false,
            models: default_models(),
        }
    }
}

/// One entry in the model registry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// The id the client selects (e.g. "chat-model", "chat-model-reasoning").
    pub id: String,
    /// Which provider backend serves this model.
    pub provider: ProviderKind,
    /// Upstream model name (e.g. "grok-2-1212").
    pub model: String,
    /// Tag the model wraps chain-of-thought in (e.g. "think"), if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reasoning_tag: Option<String>,
    /// Override the provider's default base URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// Env var holding the API key; defaults per provider kind.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key_env: Option<String>,
}

/// Provider backend for a registry entry. All speak the OpenAI protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderKind {
    Xai,
    Groq,
    OpenAiCompatible,
}

impl ProviderKind {
    /// Default env var for this provider's API key.
    pub fn default_api_key_env(&self) -> &'static str {
        match self {
            ProviderKind::Xai => "XAI_API_KEY",
            ProviderKind::Groq => "GROQ_API_KEY",
            ProviderKind::OpenAiCompatible => "OPENAI_API_KEY",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderKind::Xai => write!(f, "xai"),
            ProviderKind::Groq => write!(f, "groq"),
            ProviderKind::OpenAiCompatible => write!(f, "openai_compatible"),
        }
    }
}

impl FromStr for ProviderKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "xai" => Ok(ProviderKind::Xai),
            "groq" => Ok(ProviderKind::Groq),
            "openai_compatible" => Ok(ProviderKind::OpenAiCompatible),
            other => Err(format!("invalid provider kind: '{other}'")),
        }
    }
}

fn default_models() -> Vec<ModelConfig> {
    vec![
        ModelConfig {
            id: "chat-model".to_string(),
            provider: ProviderKind::Xai,
            model: "grok-2-1212".to_string(),
            reasoning_tag: None,
            base_url: None,
            api_key_env: None,
        },
        ModelConfig {
            id: "chat-model-reasoning".to_string(),
            provider: ProviderKind::Groq,
            model: "deepseek-r1-distill-llama-70b".to_string(),
            reasoning_tag: Some("think".to_string()),
            base_url: None,
            api_key_env: None,
        },
        ModelConfig {
            id: "title-model".to_string(),
            provider: ProviderKind::Xai,
            model: "grok-2-1212".to_string(),
            reasoning_tag: None,
            base_url: None,
            api_key_env: None,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_config_default_values() {
        let config = AppConfig::default();
        assert!(!config.allow_anonymous_chats);
        assert_eq!(config.models.len(), 3);
        assert!(config.models.iter().any(|m| m.id == "chat-model"));
        assert!(config.models.iter().any(|m| m.id == "title-model"));
    }

    #[test]
    fn test_app_config_deserialize_empty_toml_uses_defaults() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert!(!config.allow_anonymous_chats);
        assert_eq!(config.models.len(), 3);
    }

    #[test]
    fn test_app_config_deserialize_with_values() {
        let toml_str = r#"
allow_anonymous_chats = true

[[models]]
id = "chat-model"
provider = "xai"
model = "grok-2-1212"

[[models]]
id = "chat-model-reasoning"
provider = "groq"
model = "deepseek-r1-distill-llama-70b"
reasoning_tag = "think"
"#;
        let config: AppConfig = toml::from_str(toml_str).unwrap();
        assert!(config.allow_anonymous_chats);
        assert_eq!(config.models.len(), 2);
        assert_eq!(
            config.models[1].reasoning_tag.as_deref(),
            Some("think")
        );
    }

    #[test]
    fn test_provider_kind_roundtrip() {
        for kind in [
            ProviderKind::Xai,
            ProviderKind::Groq,
            ProviderKind::OpenAiCompatible,
        ] {
            let s = kind.to_string();
            let parsed: ProviderKind = s.parse().unwrap();
            assert_eq!(kind, parsed);
        }
    }

    #[test]
    fn test_default_api_key_env() {
        assert_eq!(ProviderKind::Xai.default_api_key_env(), "XAI_API_KEY");
        assert_eq!(ProviderKind::Groq.default_api_key_env(), "GROQ_API_KEY");
    }
}
