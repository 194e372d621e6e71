//! LLM provider abstractions for Tidechat.
//!
//! - `LlmProvider`: RPITIT trait for concrete provider implementations
//! - `BoxLlmProvider`: object-safe wrapper for runtime model selection
//! - `ModelRegistry`: immutable model-id to provider map built at startup
//! - `prompts`: system prompt variants keyed on the selected model id
//! - `reasoning` / `smooth`: pure stream transforms applied between the
//!   provider stream and the client transport

pub mod box_provider;
pub mod prompts;
pub mod provider;
pub mod reasoning;
pub mod registry;
pub mod smooth;
