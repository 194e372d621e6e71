//! Infrastructure layer for Tidechat.
//!
//! Contains implementations of the ports defined in `tidechat-core`:
//! SQLite storage over sqlx, OpenAI-compatible LLM providers, and the
//! configuration loader that assembles the model registry at startup.

pub mod config;
pub mod llm;
pub mod sqlite;
