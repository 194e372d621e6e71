//! Shared domain types for Tidechat.
//!
//! Conversation and message records, typed content parts, LLM
//! request/response shapes, error enums, and configuration types.
//! This crate has no IO dependencies.

pub mod chat;
pub mod config;
pub mod error;
pub mod llm;
pub mod part;
