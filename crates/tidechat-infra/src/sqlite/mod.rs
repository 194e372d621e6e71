//! SQLite persistence for Tidechat.

pub mod chat;
pub mod pool;
