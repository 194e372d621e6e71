//! Configuration loading and registry assembly.
//!
//! Reads `config.toml` from the data directory and builds the immutable
//! [`ModelRegistry`] handed to the API at startup. Falls back to the
//! default configuration when the file is missing or malformed. API keys
//! come from the environment and are held as [`SecretString`]s.

use std::path::{Path, PathBuf};

use secrecy::SecretString;
use tracing::{debug, warn};

use tidechat_core::llm::registry::{ChatModel, ModelRegistry};
use tidechat_types::config::{AppConfig, ModelConfig};

use crate::llm::create_provider;

/// Resolve the data directory: `TIDECHAT_DATA_DIR`, else `~/.tidechat`.
pub fn resolve_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("TIDECHAT_DATA_DIR") {
        return PathBuf::from(dir);
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".tidechat")
}

/// Load configuration from `{data_dir}/config.toml`.
///
/// - Missing file: returns [`AppConfig::default()`].
/// - Unparseable file: logs a warning and returns the default.
pub async fn load_app_config(data_dir: &Path) -> AppConfig {
    let config_path = data_dir.join("config.toml");

    let content = match tokio::fs::read_to_string(&config_path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            debug!("No config.toml found at {}, using defaults", config_path.display());
            return AppConfig::default();
        }
        Err(err) => {
            warn!("Failed to read {}: {err}, using defaults", config_path.display());
            return AppConfig::default();
        }
    };

    match toml::from_str::<AppConfig>(&content) {
        Ok(config) => config,
        Err(err) => {
            warn!(
                "Failed to parse {}: {err}, using defaults",
                config_path.display()
            );
            AppConfig::default()
        }
    }
}

/// Build the model registry from configuration.
///
/// Entries whose API key env var is unset are skipped with a warning, so
/// the server boots with whatever vendors are actually configured; a
/// request selecting a skipped model gets the unknown-model client error.
pub fn build_registry(config: &AppConfig) -> ModelRegistry {
    let mut registry = ModelRegistry::new();

    for entry in &config.models {
        match resolve_api_key(entry) {
            Some(api_key) => {
                let provider = create_provider(entry, api_key);
                registry.register(
                    entry.id.clone(),
                    ChatModel {
                        provider,
                        reasoning_tag: entry.reasoning_tag.clone(),
                    },
                );
            }
            None => {
                warn!(
                    model = %entry.id,
                    env = %key_env(entry),
                    "API key env var unset, model not registered"
                );
            }
        }
    }

    registry
}

fn key_env(entry: &ModelConfig) -> String {
    entry
        .api_key_env
        .clone()
        .unwrap_or_else(|| entry.provider.default_api_key_env().to_string())
}

fn resolve_api_key(entry: &ModelConfig) -> Option<SecretString> {
    std::env::var(key_env(entry))
        .ok()
        .filter(|key| !key.is_empty())
        .map(SecretString::from)
}
