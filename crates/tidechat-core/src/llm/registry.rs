//! Model registry for per-request model lookup.
//!
//! A name-indexed map from the model ids clients select (e.g. "chat-model",
//! "chat-model-reasoning", "title-model") to configured providers. Built
//! once at startup from configuration and immutable afterwards; shared
//! across requests behind an `Arc`.

use std::collections::HashMap;

use super::box_provider::BoxLlmProvider;

/// A registered model: the provider serving it plus per-model behavior.
pub struct ChatModel {
    pub provider: BoxLlmProvider,
    /// Tag the model wraps chain-of-thought in (e.g. "think"), if any.
    /// Tagged spans are re-emitted on the reasoning channel.
    pub reasoning_tag: Option<String>,
}

/// Registry of available models, indexed by the client-selected id.
pub struct ModelRegistry {
    models: HashMap<String, ChatModel>,
}

impl ModelRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            models: HashMap::new(),
        }
    }

    /// Register a model under the given id.
    ///
    /// A model already registered under this id is replaced.
    pub fn register(&mut self, id: impl Into<String>, model: ChatModel) {
        self.models.insert(id.into(), model);
    }

    /// Resolve a model by the client-selected id.
    pub fn resolve(&self, id: &str) -> Option<&ChatModel> {
        self.models.get(id)
    }

    /// List all registered model ids.
    pub fn ids(&self) -> Vec<&str> {
        self.models.keys().map(|s| s.as_str()).collect()
    }
}

impl Default for ModelRegistry {
    fn default() -> Self {
        Self::new()
    }
}
