//! Business logic and repository trait definitions for Tidechat.
//!
//! This crate defines the "ports" (repository and provider traits) that the
//! infrastructure layer implements, plus the pure pieces of the request
//! pipeline: message normalization, conversation resolution with ownership
//! checks, title derivation, and the stream transforms (reasoning-tag
//! extraction, word smoothing). It depends only on `tidechat-types` -- never
//! on `tidechat-infra` or any database/IO crate.

pub mod chat;
pub mod llm;
