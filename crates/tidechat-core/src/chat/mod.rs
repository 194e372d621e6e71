//! Conversation and message handling for Tidechat.
//!
//! The `ChatRepository` trait is the storage port; `normalize` upgrades raw
//! message payloads into the uniform part shape; `service` sequences
//! resolution, ownership checks, and persistence; `title` derives
//! conversation titles.

pub mod normalize;
pub mod repository;
pub mod service;
pub mod title;
